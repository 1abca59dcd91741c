//! Device lifecycle and provisioning.

use http::Method;
use serde::Serialize;
use textsecure_request_core::encoding::serialize_base64;
use textsecure_request_core::{
    ConstructionError, DeviceRecord, RequestDescriptor, require_non_empty, require_path_segment,
};

use super::RequestFactory;
use crate::attributes::DeviceCapabilities;

const DEVICES: &str = "/v1/devices";

#[derive(Serialize)]
struct ProvisioningBody<'a> {
    #[serde(serialize_with = "serialize_base64")]
    body: &'a [u8],
}

impl RequestFactory {
    pub fn get_devices() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{DEVICES}/")).build())
    }

    pub fn delete_device(device: &DeviceRecord) -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::DELETE, format!("{DEVICES}/{}", device.id())).build())
    }

    /// Fetch a one-time code for linking a new device.
    pub fn device_provisioning_code() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{DEVICES}/provisioning/code")).build())
    }

    /// Deliver an encrypted provisioning message to a device being linked.
    ///
    /// `ephemeral_device_id` is the provisioning address the new device
    /// displayed; `message_body` is the already encrypted envelope.
    pub fn device_provisioning(
        message_body: &[u8],
        ephemeral_device_id: &str,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_non_empty("provisioning message body", message_body)?;
        require_path_segment("ephemeral device id", ephemeral_device_id)?;
        Ok(RequestDescriptor::builder(
            Method::PUT,
            format!("/v1/provisioning/{ephemeral_device_id}"),
        )
        .json_body(&ProvisioningBody { body: message_body })?
        .build())
    }

    pub fn update_secondary_device_capabilities(
        capabilities: &DeviceCapabilities,
    ) -> Result<RequestDescriptor, ConstructionError> {
        Ok(
            RequestDescriptor::builder(Method::PUT, format!("{DEVICES}/capabilities"))
                .json_body(capabilities)?
                .build(),
        )
    }
}
