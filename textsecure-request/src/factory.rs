//! The request factory.
//!
//! [`RequestFactory`] has one associated function per service operation. Each
//! takes typed parameters, validates them, and returns a
//! [`RequestDescriptor`](textsecure_request_core::RequestDescriptor). Nothing
//! is cached between calls: the same inputs always yield an equal descriptor.
//!
//! Operations are grouped by area:
//! - account and auth management, push registration (`account`)
//! - device lifecycle and provisioning (`devices`)
//! - message retrieval, acknowledgement and submission (`messages`)
//! - profiles and usernames (`profile`)
//! - prekeys (`prekeys`)
//! - remote attestation, contact discovery and key backup (`enclave`)
//! - verification codes and device verification (`verification`)
//! - fixed fetches: config, TURN, certificates, storage auth (`misc`)

mod account;
mod devices;
mod enclave;
mod messages;
mod misc;
mod prekeys;
mod profile;
mod verification;

pub use enclave::{CdsFeedbackStatus, RemoteAttestationService};
pub use messages::{DeliveryAck, OutgoingDeviceMessage};
pub use verification::{SecondaryDeviceVerification, VerificationTransport};

use http::header::{COOKIE, HeaderName};
use textsecure_request_core::{
    ConstructionError, DescriptorBuilder, EnclaveCookie, UdAccessKey, cookie_header,
};

/// Header carrying a sealed-sender access key in place of session credentials.
pub const UNIDENTIFIED_ACCESS_KEY_HEADER: HeaderName =
    HeaderName::from_static("unidentified-access-key");

/// Builds request descriptors for every service operation.
///
/// Stateless; all functions are associated functions.
///
/// # Example
///
/// ```
/// use textsecure_request::RequestFactory;
/// use textsecure_request::ServiceAddress;
///
/// let address = ServiceAddress::new("UUID-1234")?;
/// let request = RequestFactory::get_unversioned_profile(&address, None)?;
///
/// assert_eq!(request.path(), "/v1/profile/UUID-1234");
/// assert!(request.uses_session_auth());
/// # Ok::<(), textsecure_request::ConstructionError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFactory;

/// Request-shaping steps shared by several operation groups.
pub(crate) trait DescriptorBuilderExt: Sized {
    /// Switch to sealed-sender delivery when an access key is present.
    ///
    /// With a key the request carries `Unidentified-Access-Key` and no session
    /// credentials. Without one it is left on session auth.
    fn sealed_sender(self, access_key: Option<&UdAccessKey>) -> Result<Self, ConstructionError>;

    /// Attach enclave cookies as one `Cookie` header, in order.
    fn cookies(self, cookies: &[EnclaveCookie]) -> Result<Self, ConstructionError>;
}

impl DescriptorBuilderExt for DescriptorBuilder {
    fn sealed_sender(self, access_key: Option<&UdAccessKey>) -> Result<Self, ConstructionError> {
        match access_key {
            Some(key) => Ok(self
                .header(UNIDENTIFIED_ACCESS_KEY_HEADER, &key.header_value())?
                .unauthenticated()),
            None => Ok(self),
        }
    }

    fn cookies(self, cookies: &[EnclaveCookie]) -> Result<Self, ConstructionError> {
        match cookie_header(cookies) {
            Some(value) => self.header(COOKIE, &value),
            None => Ok(self),
        }
    }
}
