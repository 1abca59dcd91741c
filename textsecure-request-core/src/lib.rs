//! Core value types for TextSecure request construction.
//!
//! This crate provides the types shared by the request factory
//! (`textsecure-request`) and any transport that executes its output.
//!
//! ## Modules
//!
//! - [`descriptor`]: The request descriptor and its builder
//! - [`error`]: The construction error type
//! - [`address`]: Account and device identifiers
//! - [`keys`]: Prekeys and sealed-sender access keys
//! - [`enclave`]: Secure enclave sessions and payloads
//! - [`encoding`]: Base64 helpers for binary fields

pub mod address;
pub mod descriptor;
pub mod enclave;
pub mod encoding;
pub mod error;
pub mod keys;

pub use address::*;
pub use descriptor::*;
pub use enclave::*;
pub use error::*;
pub use keys::*;
