//! Base64 helpers for binary request fields.
//!
//! Every binary value that travels in a JSON body or a header (public keys,
//! signatures, enclave ciphertext, access keys) is encoded with standard,
//! padded base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serializer;

/// Encode bytes as standard padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `serialize_with` adapter for a byte field.
pub fn serialize_base64<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// `serialize_with` adapter for an optional byte field.
///
/// Pair with `skip_serializing_if = "Option::is_none"` to drop absent values.
pub fn serialize_base64_opt<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bytes {
        Some(b) => serializer.serialize_str(&STANDARD.encode(b)),
        None => serializer.serialize_none(),
    }
}
