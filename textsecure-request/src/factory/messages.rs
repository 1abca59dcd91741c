//! Message retrieval, delivery acknowledgement and submission.

use http::Method;
use serde::Serialize;
use textsecure_request_core::{
    ConstructionError, RequestDescriptor, ServiceAddress, UdAccessKey, require_non_empty,
    require_path_segment,
};

use super::{DescriptorBuilderExt, RequestFactory};

const MESSAGES: &str = "/v1/messages";

/// Identifies a received message to acknowledge.
///
/// Older envelopes are identified by sender and timestamp, newer ones by the
/// GUID the service assigned. Exactly one form is used per acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryAck {
    BySender {
        address: ServiceAddress,
        timestamp: u64,
    },
    ByServerGuid(String),
}

/// One already-encrypted ciphertext addressed to a single recipient device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingDeviceMessage {
    /// Envelope type (ciphertext, prekey bundle, unidentified sender, ...).
    #[serde(rename = "type")]
    pub message_type: u32,
    pub destination_device_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_registration_id: Option<u32>,
    /// Base64 ciphertext.
    pub content: String,
}

#[derive(Serialize)]
struct SubmitMessageBody<'a> {
    messages: &'a [OutgoingDeviceMessage],
    timestamp: u64,
}

impl RequestFactory {
    pub fn get_messages() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{MESSAGES}/")).build())
    }

    /// Acknowledge delivery of a message so the service can drop it.
    pub fn acknowledge_message_delivery(
        ack: &DeliveryAck,
    ) -> Result<RequestDescriptor, ConstructionError> {
        let path = match ack {
            DeliveryAck::BySender { address, timestamp } => {
                format!("{MESSAGES}/{address}/{timestamp}")
            }
            DeliveryAck::ByServerGuid(guid) => {
                require_path_segment("server guid", guid)?;
                format!("{MESSAGES}/uuid/{guid}")
            }
        };
        Ok(RequestDescriptor::builder(Method::DELETE, path).build())
    }

    /// Submit per-device ciphertexts for one recipient.
    ///
    /// With an access key the message is sent sealed-sender: the key rides in
    /// `Unidentified-Access-Key` and no session credentials are attached.
    pub fn submit_message(
        recipient: &ServiceAddress,
        messages: &[OutgoingDeviceMessage],
        timestamp: u64,
        ud_access_key: Option<&UdAccessKey>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        if messages.is_empty() {
            return Err(ConstructionError::empty("messages"));
        }
        for message in messages {
            require_non_empty("message content", &message.content)?;
        }
        Ok(
            RequestDescriptor::builder(Method::POST, format!("{MESSAGES}/{recipient}"))
                .json_body(&SubmitMessageBody {
                    messages,
                    timestamp,
                })?
                .sealed_sender(ud_access_key)?
                .build(),
        )
    }
}
