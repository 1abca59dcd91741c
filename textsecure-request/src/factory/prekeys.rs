//! Prekey distribution.

use http::Method;
use serde::Serialize;
use textsecure_request_core::encoding::serialize_base64;
use textsecure_request_core::{
    ConstructionError, DeviceSelector, PreKeyRecord, RequestDescriptor, ServiceAddress,
    SignedPreKeyRecord, UdAccessKey, require_non_empty,
};

use super::{DescriptorBuilderExt, RequestFactory};

const KEYS: &str = "/v2/keys";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPreKeysBody<'a> {
    pre_keys: &'a [PreKeyRecord],
    signed_pre_key: &'a SignedPreKeyRecord,
    #[serde(serialize_with = "serialize_base64")]
    identity_key: &'a [u8],
}

impl RequestFactory {
    /// Count of one-time prekeys the service still holds for this device.
    pub fn available_prekeys_count() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{KEYS}/")).build())
    }

    pub fn current_signed_prekey() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{KEYS}/signed")).build())
    }

    /// Fetch a recipient's prekey bundle for one device or all of them.
    pub fn recipient_prekey(
        recipient: &ServiceAddress,
        device: DeviceSelector,
        ud_access_key: Option<&UdAccessKey>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        Ok(
            RequestDescriptor::builder(Method::GET, format!("{KEYS}/{recipient}/{device}"))
                .sealed_sender(ud_access_key)?
                .build(),
        )
    }

    pub fn register_signed_prekey(
        signed_prekey: &SignedPreKeyRecord,
    ) -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::PUT, format!("{KEYS}/signed"))
            .json_body(signed_prekey)?
            .build())
    }

    /// Upload a batch of one-time prekeys together with the identity key and
    /// current signed prekey.
    pub fn register_prekeys(
        prekeys: &[PreKeyRecord],
        identity_key: &[u8],
        signed_prekey: &SignedPreKeyRecord,
    ) -> Result<RequestDescriptor, ConstructionError> {
        if prekeys.is_empty() {
            return Err(ConstructionError::empty("prekeys"));
        }
        require_non_empty("identity key", identity_key)?;
        Ok(RequestDescriptor::builder(Method::PUT, format!("{KEYS}/"))
            .json_body(&RegisterPreKeysBody {
                pre_keys: prekeys,
                signed_pre_key: signed_prekey,
                identity_key,
            })?
            .build())
    }
}
