//! Fixed fetches and legacy contact intersection.

use http::Method;
use serde::Serialize;
use textsecure_request_core::{ConstructionError, RequestDescriptor, require_non_empty};

use super::RequestFactory;

#[derive(Serialize)]
struct ContactsBody<'a> {
    contacts: &'a [String],
}

impl RequestFactory {
    pub fn remote_config() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, "/v1/config/").build())
    }

    pub fn turn_server_info() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, "/v1/accounts/turn").build())
    }

    /// Credentials for the storage service.
    pub fn storage_auth() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, "/v1/storage/auth").build())
    }

    /// Sender certificate for sealed-sender messages, with the UUID included.
    pub fn ud_sender_certificate() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, "/v1/certificate/delivery")
            .query("includeUuid", "true")
            .build())
    }

    /// Upload form for a new attachment.
    pub fn allocate_attachment() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, "/v2/attachments/form/upload").build())
    }

    /// Group v2 auth credentials for each day in `from..=to`.
    ///
    /// Days are counted since the Unix epoch.
    pub fn group_authentication_credential(
        from_redemption_day: u32,
        to_redemption_day: u32,
    ) -> Result<RequestDescriptor, ConstructionError> {
        if from_redemption_day > to_redemption_day {
            return Err(ConstructionError::invalid(
                "redemption days",
                format!(
                    "start day {} is after end day {}",
                    from_redemption_day, to_redemption_day
                ),
            ));
        }
        Ok(RequestDescriptor::builder(
            Method::GET,
            format!("/v1/certificate/group/{from_redemption_day}/{to_redemption_day}"),
        )
        .build())
    }

    /// Intersect hashed contact tokens with registered accounts.
    pub fn contacts_intersection(
        hashes: &[String],
    ) -> Result<RequestDescriptor, ConstructionError> {
        if hashes.is_empty() {
            return Err(ConstructionError::empty("contact hashes"));
        }
        for hash in hashes {
            require_non_empty("contact hash", hash)?;
        }
        Ok(RequestDescriptor::builder(Method::PUT, "/v1/directory/tokens")
            .json_body(&ContactsBody { contacts: hashes })?
            .build())
    }
}
