//! Secure enclave request parameters.
//!
//! Enclave calls are two-phase: an auth call on the main API yields
//! short-lived credentials, and the attestation handshake yields session
//! cookies. Both are bundled into an [`EnclaveSession`] by the caller and
//! replayed verbatim on every enclave request. Request construction never
//! chains the phases itself.

use serde::Serialize;

use crate::descriptor::BasicAuth;
use crate::encoding::serialize_base64;
use crate::error::{
    ConstructionError, require_basic_username, require_non_empty, require_path_segment,
};

/// A cookie set by an enclave host during attestation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnclaveCookie {
    name: String,
    value: String,
}

impl EnclaveCookie {
    pub fn new<N, V>(name: N, value: V) -> Result<Self, ConstructionError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        require_non_empty("cookie name", &name)?;
        if name.contains(['=', ';']) || name.chars().any(char::is_whitespace) {
            return Err(ConstructionError::invalid(
                "cookie name",
                "must not contain '=', ';' or whitespace",
            ));
        }
        if value.contains(';') {
            return Err(ConstructionError::invalid("cookie value", "must not contain ';'"));
        }
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Render cookies as a single `Cookie` header value, preserving order.
///
/// Returns `None` for an empty list so no header is emitted at all.
pub fn cookie_header(cookies: &[EnclaveCookie]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let pairs: Vec<String> = cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect();
    Some(pairs.join("; "))
}

/// Credentials and cookies for talking to one named enclave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnclaveSession {
    enclave_name: String,
    auth: BasicAuth,
    cookies: Vec<EnclaveCookie>,
}

impl EnclaveSession {
    /// An empty cookie list is accepted; supplying the cookies from the
    /// attestation response is the caller's responsibility.
    pub fn new<S: Into<String>>(
        enclave_name: S,
        auth: BasicAuth,
        cookies: Vec<EnclaveCookie>,
    ) -> Result<Self, ConstructionError> {
        let enclave_name = enclave_name.into();
        require_path_segment("enclave name", &enclave_name)?;
        require_basic_username("enclave auth username", auth.username())?;
        Ok(Self {
            enclave_name,
            auth,
            cookies,
        })
    }

    pub fn enclave_name(&self) -> &str {
        &self.enclave_name
    }

    pub fn auth(&self) -> &BasicAuth {
        &self.auth
    }

    pub fn cookies(&self) -> &[EnclaveCookie] {
        &self.cookies
    }
}

/// An encrypted, authenticated enclave payload.
///
/// Serializes as `{"requestId", "data", "iv", "mac"}` with every field in
/// base64.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnclavePayload {
    #[serde(serialize_with = "serialize_base64")]
    request_id: Vec<u8>,
    #[serde(serialize_with = "serialize_base64")]
    data: Vec<u8>,
    #[serde(serialize_with = "serialize_base64")]
    iv: Vec<u8>,
    #[serde(serialize_with = "serialize_base64")]
    mac: Vec<u8>,
}

impl EnclavePayload {
    pub fn new(
        request_id: Vec<u8>,
        data: Vec<u8>,
        iv: Vec<u8>,
        mac: Vec<u8>,
    ) -> Result<Self, ConstructionError> {
        require_non_empty("enclave request id", &request_id)?;
        require_non_empty("enclave data", &data)?;
        require_non_empty("enclave iv", &iv)?;
        require_non_empty("enclave mac", &mac)?;
        Ok(Self {
            request_id,
            data,
            iv,
            mac,
        })
    }

    pub fn request_id(&self) -> &[u8] {
        &self.request_id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn mac(&self) -> &[u8] {
        &self.mac
    }
}

/// Key-vault operation carried by a key backup enclave request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KbsRequestType {
    Backup,
    Restore,
    Delete,
}

impl KbsRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KbsRequestType::Backup => "backup",
            KbsRequestType::Restore => "restore",
            KbsRequestType::Delete => "delete",
        }
    }
}

/// Phase-two request to the contact discovery enclave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdsEnclaveRequest {
    pub session: EnclaveSession,
    pub payload: EnclavePayload,
    /// Number of addresses sealed in the payload.
    pub address_count: u32,
}

/// Phase-two request to the key backup enclave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KbsEnclaveRequest {
    pub session: EnclaveSession,
    pub payload: EnclavePayload,
    pub request_type: KbsRequestType,
}
