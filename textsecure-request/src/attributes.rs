//! Account attributes and device capabilities.
//!
//! These are the JSON documents the service stores per device. They are sent
//! when a primary device registers or updates its attributes, and (in part)
//! when a secondary device links.

use serde::Serialize;
use textsecure_request_core::encoding::serialize_base64_opt;

/// Features a device advertises to the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeviceCapabilities {
    /// Supports groups v2.
    pub gv2: bool,
    /// Supports the storage service.
    pub storage: bool,
    /// Supports device-to-device transfer.
    pub transfer: bool,
}

/// Attributes of the local account's primary device.
///
/// Serialized camelCase. `voice` and `video` are always sent as `true`;
/// absent optional values are omitted from the body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    pub registration_id: u32,
    pub fetches_messages: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_lock: Option<String>,
    #[serde(
        serialize_with = "serialize_base64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub unidentified_access_key: Option<Vec<u8>>,
    pub unrestricted_unidentified_access: bool,
    pub discoverable_by_phone_number: bool,
    pub capabilities: DeviceCapabilities,
}

/// Wire form of [`AccountAttributes`] with the fixed call flags added.
#[derive(Serialize)]
pub(crate) struct AccountAttributesBody<'a> {
    voice: bool,
    video: bool,
    #[serde(flatten)]
    attributes: &'a AccountAttributes,
}

impl<'a> From<&'a AccountAttributes> for AccountAttributesBody<'a> {
    fn from(attributes: &'a AccountAttributes) -> Self {
        Self {
            voice: true,
            video: true,
            attributes,
        }
    }
}
