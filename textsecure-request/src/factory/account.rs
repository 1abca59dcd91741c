//! Account and auth management, push registration.

use http::Method;
use serde::Serialize;
use textsecure_request_core::{
    ConstructionError, RequestDescriptor, require_non_empty, require_path_segment,
};

use super::RequestFactory;
use crate::attributes::{AccountAttributes, AccountAttributesBody};

const ACCOUNTS: &str = "/v1/accounts";

#[derive(Serialize)]
struct PinBody<'a> {
    pin: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationLockBody<'a> {
    registration_lock: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRegistrationBody<'a> {
    apn_registration_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voip_registration_id: Option<&'a str>,
}

impl RequestFactory {
    /// Enable the legacy registration-lock PIN.
    pub fn enable_2fa(pin: &str) -> Result<RequestDescriptor, ConstructionError> {
        require_non_empty("pin", pin)?;
        Ok(RequestDescriptor::builder(Method::PUT, format!("{ACCOUNTS}/pin"))
            .json_body(&PinBody { pin })?
            .build())
    }

    pub fn disable_2fa() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::DELETE, format!("{ACCOUNTS}/pin")).build())
    }

    /// Enable registration lock v2 with a token derived from the KBS master key.
    pub fn enable_registration_lock_v2(
        token: &str,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_non_empty("registration lock token", token)?;
        Ok(
            RequestDescriptor::builder(Method::PUT, format!("{ACCOUNTS}/registration_lock"))
                .json_body(&RegistrationLockBody {
                    registration_lock: token,
                })?
                .build(),
        )
    }

    pub fn disable_registration_lock_v2() -> Result<RequestDescriptor, ConstructionError> {
        Ok(
            RequestDescriptor::builder(Method::DELETE, format!("{ACCOUNTS}/registration_lock"))
                .build(),
        )
    }

    /// Unregister the account by removing its push registration.
    pub fn unregister_account() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::DELETE, format!("{ACCOUNTS}/apn")).build())
    }

    pub fn account_who_am_i() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{ACCOUNTS}/whoami")).build())
    }

    pub fn update_primary_device_attributes(
        attributes: &AccountAttributes,
    ) -> Result<RequestDescriptor, ConstructionError> {
        Ok(
            RequestDescriptor::builder(Method::PUT, format!("{ACCOUNTS}/attributes/"))
                .json_body(&AccountAttributesBody::from(attributes))?
                .build(),
        )
    }

    /// Register push tokens for the local device.
    ///
    /// The VoIP token is only sent when present.
    pub fn register_for_push(
        push_identifier: &str,
        voip_identifier: Option<&str>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_non_empty("push identifier", push_identifier)?;
        if let Some(voip) = voip_identifier {
            require_non_empty("voip identifier", voip)?;
        }
        Ok(RequestDescriptor::builder(Method::PUT, format!("{ACCOUNTS}/apn"))
            .json_body(&PushRegistrationBody {
                apn_registration_id: push_identifier,
                voip_registration_id: voip_identifier,
            })?
            .build())
    }

    /// Ask the service to push a preauth challenge to `push_token`.
    ///
    /// Sent before registration, so no session exists yet.
    pub fn preauth_challenge(
        recipient_id: &str,
        push_token: &str,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_path_segment("recipient id", recipient_id)?;
        require_path_segment("push token", push_token)?;
        Ok(RequestDescriptor::builder(
            Method::GET,
            format!("{ACCOUNTS}/apn/preauth/{push_token}/{recipient_id}"),
        )
        .unauthenticated()
        .build())
    }
}
