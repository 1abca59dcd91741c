//! Account and device identifiers.

use std::fmt;

use uuid::Uuid;

use crate::error::{ConstructionError, require_path_segment};

/// Identifier of a remote account.
///
/// Either the account's service UUID or its E.164 phone number. The
/// identifier is opaque to request construction and is inserted into paths
/// and bodies exactly as given.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceAddress {
    identifier: String,
}

impl ServiceAddress {
    /// Wrap an already formatted service identifier.
    ///
    /// Fails if the identifier is empty or could not be used as a single path
    /// segment.
    pub fn new<S: Into<String>>(identifier: S) -> Result<Self, ConstructionError> {
        let identifier = identifier.into();
        require_path_segment("address", &identifier)?;
        Ok(Self { identifier })
    }

    /// Address an account by E.164 phone number (`+` followed by digits).
    pub fn phone_number<S: Into<String>>(e164: S) -> Result<Self, ConstructionError> {
        let e164 = e164.into();
        let digits = e164
            .strip_prefix('+')
            .ok_or_else(|| ConstructionError::invalid("phone number", "must start with '+'"))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConstructionError::invalid(
                "phone number",
                "must contain only digits after '+'",
            ));
        }
        Ok(Self { identifier: e164 })
    }

    pub fn as_str(&self) -> &str {
        &self.identifier
    }
}

impl From<Uuid> for ServiceAddress {
    fn from(uuid: Uuid) -> Self {
        Self {
            identifier: uuid.hyphenated().to_string(),
        }
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// A device linked to the local account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceRecord {
    id: u32,
}

impl DeviceRecord {
    /// The primary device of every account.
    pub const PRIMARY: DeviceRecord = DeviceRecord { id: 1 };

    /// Fails for id 0, which the service never assigns.
    pub fn new(id: u32) -> Result<Self, ConstructionError> {
        if id == 0 {
            return Err(ConstructionError::invalid("device id", "must be at least 1"));
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Which of a recipient's devices a prekey fetch targets.
///
/// A single device is named through [`DeviceRecord`], so id 0 cannot be
/// selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceSelector {
    /// Every registered device (`*`).
    All,
    Device(DeviceRecord),
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSelector::All => f.write_str("*"),
            DeviceSelector::Device(device) => write!(f, "{}", device.id),
        }
    }
}

impl From<DeviceRecord> for DeviceSelector {
    fn from(device: DeviceRecord) -> Self {
        DeviceSelector::Device(device)
    }
}
