//! Request descriptors for every TextSecure service endpoint.
//!
//! This crate turns typed parameters into fully specified HTTP request
//! descriptions. It performs no I/O: a [`RequestDescriptor`] says which
//! method, path, query, headers, body and auth mode a call needs, and any
//! HTTP client can execute it.
//!
//! ## Features
//!
//! - One [`RequestFactory`] function per service operation
//! - Sealed-sender delivery via unidentified access keys
//! - Contact discovery and key backup enclave requests with explicit
//!   credentials and cookies
//! - Rendering into [`http::Request`] against a [`ServiceConfiguration`]
//! - Optional `tracing` instrumentation
//!
//! ## Example
//!
//! ```
//! use textsecure_request::{
//!     BasicAuth, RequestFactory, ServiceAddress, ServiceConfiguration, UdAccessKey, render,
//! };
//!
//! let recipient = ServiceAddress::new("UUID-1234")?;
//! let access_key = UdAccessKey::new(&[7u8; 16])?;
//!
//! // Sealed sender: the access key replaces session credentials.
//! let descriptor = RequestFactory::get_unversioned_profile(&recipient, Some(&access_key))?;
//! assert!(descriptor.requires_unauthenticated());
//!
//! let session = BasicAuth::new("+15551234567", "password");
//! let request = render(&descriptor, &ServiceConfiguration::default(), Some(&session))?;
//! assert!(request.headers().get(http::header::AUTHORIZATION).is_none());
//! # Ok::<(), textsecure_request::ConstructionError>(())
//! ```
//!
//! ## Modules
//!
//! - [`factory`]: The request factory and its operation-specific types
//! - [`attributes`]: Account attributes and device capabilities
//! - [`config`]: Service hosts and client identity
//! - [`transport`]: Rendering descriptors into HTTP requests

pub mod attributes;
pub mod config;
pub mod factory;
pub mod transport;

// Re-export core types
pub use textsecure_request_core::*;

pub use attributes::{AccountAttributes, DeviceCapabilities};
pub use config::ServiceConfiguration;
pub use factory::{
    CdsFeedbackStatus, DeliveryAck, OutgoingDeviceMessage, RemoteAttestationService,
    RequestFactory, SecondaryDeviceVerification, UNIDENTIFIED_ACCESS_KEY_HEADER,
    VerificationTransport,
};
pub use transport::{render, request_url};
