//! Prekeys and sealed-sender access keys.

use serde::Serialize;

use crate::encoding::{encode_base64, serialize_base64};
use crate::error::{ConstructionError, require_non_empty};

/// A one-time prekey as uploaded to the service.
///
/// Serializes as `{"keyId": n, "publicKey": "<base64>"}`. The public key is
/// the serialized key exactly as the caller supplied it, type byte included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreKeyRecord {
    key_id: u32,
    #[serde(serialize_with = "serialize_base64")]
    public_key: Vec<u8>,
}

impl PreKeyRecord {
    pub fn new(key_id: u32, public_key: Vec<u8>) -> Result<Self, ConstructionError> {
        require_non_empty("prekey public key", &public_key)?;
        Ok(Self { key_id, public_key })
    }

    pub fn key_id(&self) -> u32 {
        self.key_id
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

/// A signed prekey: a prekey plus the identity key's signature over it.
///
/// Serializes as `{"keyId", "publicKey", "signature"}` with both byte fields
/// in base64.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPreKeyRecord {
    key_id: u32,
    #[serde(serialize_with = "serialize_base64")]
    public_key: Vec<u8>,
    #[serde(serialize_with = "serialize_base64")]
    signature: Vec<u8>,
}

impl SignedPreKeyRecord {
    pub fn new(
        key_id: u32,
        public_key: Vec<u8>,
        signature: Vec<u8>,
    ) -> Result<Self, ConstructionError> {
        require_non_empty("signed prekey public key", &public_key)?;
        require_non_empty("signed prekey signature", &signature)?;
        Ok(Self {
            key_id,
            public_key,
            signature,
        })
    }

    pub fn key_id(&self) -> u32 {
        self.key_id
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// Sealed-sender access key for a recipient.
///
/// Presenting this key authorizes delivery without identifying the sender, so
/// a request carrying it must not also carry session credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct UdAccessKey {
    key: [u8; UdAccessKey::LEN],
}

impl UdAccessKey {
    /// Length of an access key in bytes.
    pub const LEN: usize = 16;

    pub fn new(bytes: &[u8]) -> Result<Self, ConstructionError> {
        require_non_empty("access key", bytes)?;
        let key: [u8; Self::LEN] = bytes.try_into().map_err(|_| {
            ConstructionError::invalid(
                "access key",
                format!("expected {} bytes, got {}", Self::LEN, bytes.len()),
            )
        })?;
        Ok(Self { key })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Value of the `Unidentified-Access-Key` header.
    pub fn header_value(&self) -> String {
        encode_base64(&self.key)
    }
}

impl std::fmt::Debug for UdAccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UdAccessKey(<redacted>)")
    }
}
