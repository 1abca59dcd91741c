//! Verification codes and device verification.

use http::Method;
use serde::Serialize;
use textsecure_request_core::encoding::serialize_base64;
use textsecure_request_core::{
    BasicAuth, ConstructionError, RequestDescriptor, require_basic_username, require_non_empty,
    require_path_segment,
};

use super::RequestFactory;
use crate::attributes::{AccountAttributes, AccountAttributesBody, DeviceCapabilities};

/// Value of the `client` query parameter on verification code requests.
const CLIENT_NAME: &str = "ios";

/// How the service delivers a verification code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerificationTransport {
    Voice,
    Sms,
}

impl VerificationTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationTransport::Voice => "voice",
            VerificationTransport::Sms => "sms",
        }
    }
}

/// Parameters for linking this device as a secondary device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecondaryDeviceVerification {
    pub verification_code: String,
    pub phone_number: String,
    pub auth_key: String,
    /// Device name encrypted to the account's identity key.
    pub encrypted_device_name: Vec<u8>,
    pub registration_id: u32,
    pub capabilities: DeviceCapabilities,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SecondaryDeviceBody<'a> {
    #[serde(serialize_with = "serialize_base64")]
    name: &'a [u8],
    fetches_messages: bool,
    registration_id: u32,
    capabilities: &'a DeviceCapabilities,
}

impl RequestFactory {
    /// Ask the service to send a verification code to `phone_number`.
    ///
    /// Sent before the account exists, so no session credentials are attached.
    /// `preauth_challenge` and `captcha_token` are forwarded as query
    /// parameters only when present.
    pub fn request_verification_code(
        phone_number: &str,
        preauth_challenge: Option<&str>,
        captcha_token: Option<&str>,
        transport: VerificationTransport,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_path_segment("phone number", phone_number)?;
        if let Some(challenge) = preauth_challenge {
            require_non_empty("preauth challenge", challenge)?;
        }
        if let Some(captcha) = captcha_token {
            require_non_empty("captcha token", captcha)?;
        }
        Ok(RequestDescriptor::builder(
            Method::GET,
            format!("/v1/accounts/{}/code/{}", transport.as_str(), phone_number),
        )
        .query("client", CLIENT_NAME)
        .query_opt("challenge", preauth_challenge)
        .query_opt("captcha", captcha_token)
        .unauthenticated()
        .build())
    }

    /// Complete registration of a primary device.
    ///
    /// Authenticates with the phone number and the freshly generated auth key
    /// instead of a session. A registration-lock `pin`, when given, replaces
    /// whatever lock value `attributes` carries.
    pub fn verify_primary_device(
        verification_code: &str,
        phone_number: &str,
        auth_key: &str,
        pin: Option<&str>,
        attributes: &AccountAttributes,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_path_segment("verification code", verification_code)?;
        require_basic_username("phone number", phone_number)?;
        require_non_empty("auth key", auth_key)?;

        let mut attributes = attributes.clone();
        if let Some(pin) = pin {
            require_non_empty("pin", pin)?;
            attributes.registration_lock = Some(pin.to_owned());
        }

        Ok(RequestDescriptor::builder(
            Method::PUT,
            format!("/v1/accounts/code/{verification_code}"),
        )
        .json_body(&AccountAttributesBody::from(&attributes))?
        .auth_override(BasicAuth::new(phone_number, auth_key))
        .build())
    }

    /// Link this device to an existing account.
    pub fn verify_secondary_device(
        params: &SecondaryDeviceVerification,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_path_segment("verification code", &params.verification_code)?;
        require_basic_username("phone number", &params.phone_number)?;
        require_non_empty("auth key", &params.auth_key)?;
        require_non_empty("encrypted device name", &params.encrypted_device_name)?;

        Ok(RequestDescriptor::builder(
            Method::PUT,
            format!("/v1/devices/{}", params.verification_code),
        )
        .json_body(&SecondaryDeviceBody {
            name: &params.encrypted_device_name,
            fetches_messages: true,
            registration_id: params.registration_id,
            capabilities: &params.capabilities,
        })?
        .auth_override(BasicAuth::new(
            params.phone_number.as_str(),
            params.auth_key.as_str(),
        ))
        .build())
    }
}
