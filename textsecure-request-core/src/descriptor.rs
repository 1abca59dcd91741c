//! Request descriptors.
//!
//! A [`RequestDescriptor`] is the fully specified shape of one service call:
//! method, path, query, headers, JSON body and the auth mode the transport
//! must apply. Descriptors are immutable; they are assembled through
//! [`DescriptorBuilder`] and handed to a transport as-is.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde::Serialize;

use crate::encoding::encode_base64;
use crate::error::ConstructionError;

/// Host category a request must be sent to.
///
/// The transport maps each target to a configured base URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ServiceTarget {
    /// The main account and messaging API.
    #[default]
    Main,
    /// The contact discovery enclave host.
    ContactDiscovery,
    /// The key backup enclave host.
    KeyBackup,
}

impl ServiceTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTarget::Main => "main",
            ServiceTarget::ContactDiscovery => "contact_discovery",
            ServiceTarget::KeyBackup => "key_backup",
        }
    }
}

/// Username and password for HTTP basic auth.
///
/// Used both for the session credentials the transport attaches by default and
/// for the explicit overrides carried by enclave and verification requests.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Render the `Authorization` header value.
    ///
    /// The returned value is marked sensitive so it is hidden from `Debug`
    /// output of a [`HeaderMap`].
    pub fn header_value(&self) -> Result<HeaderValue, ConstructionError> {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = encode_base64(credentials.as_bytes());
        let mut value = HeaderValue::try_from(format!("Basic {}", encoded))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A fully specified service request, ready for a transport to execute.
///
/// Auth resolution for the transport:
/// - [`auth_override`](Self::auth_override) set: use it and nothing else;
/// - [`requires_unauthenticated`](Self::requires_unauthenticated): attach no
///   session credentials;
/// - otherwise: attach the session credentials.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    headers: HeaderMap,
    body: Option<Bytes>,
    auth_override: Option<BasicAuth>,
    requires_unauthenticated: bool,
    target: ServiceTarget,
}

impl RequestDescriptor {
    /// Start building a descriptor for `method` and an absolute `path`.
    pub fn builder<P: Into<String>>(method: Method, path: P) -> DescriptorBuilder {
        DescriptorBuilder::new(method, path)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The JSON-encoded body, if the request carries one.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn auth_override(&self) -> Option<&BasicAuth> {
        self.auth_override.as_ref()
    }

    pub fn requires_unauthenticated(&self) -> bool {
        self.requires_unauthenticated
    }

    pub fn target(&self) -> ServiceTarget {
        self.target
    }

    /// Whether the transport should attach the session credentials.
    pub fn uses_session_auth(&self) -> bool {
        !self.requires_unauthenticated && self.auth_override.is_none()
    }
}

/// Builder for [`RequestDescriptor`].
///
/// # Example
///
/// ```
/// use http::Method;
/// use textsecure_request_core::RequestDescriptor;
///
/// let descriptor = RequestDescriptor::builder(Method::PUT, "/v1/accounts/pin")
///     .json_body(&serde_json::json!({ "pin": "1234" }))?
///     .build();
///
/// assert_eq!(descriptor.path(), "/v1/accounts/pin");
/// assert!(descriptor.uses_session_auth());
/// # Ok::<(), textsecure_request_core::ConstructionError>(())
/// ```
#[derive(Debug)]
pub struct DescriptorBuilder {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    headers: HeaderMap,
    body: Option<Bytes>,
    auth_override: Option<BasicAuth>,
    requires_unauthenticated: bool,
    target: ServiceTarget,
}

impl DescriptorBuilder {
    fn new<P: Into<String>>(method: Method, path: P) -> Self {
        let path = path.into();
        // Relative paths are anchored so the transport can join them onto any base.
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        Self {
            method,
            path,
            query: BTreeMap::new(),
            headers: HeaderMap::new(),
            body: None,
            auth_override: None,
            requires_unauthenticated: false,
            target: ServiceTarget::Main,
        }
    }

    /// Add a query parameter. A later value for the same key replaces the earlier one.
    pub fn query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter only when `value` is present.
    pub fn query_opt<K: Into<String>, V: Into<String>>(self, key: K, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Set a header, replacing any previous value with the same name.
    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self, ConstructionError> {
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Serialize `body` as the JSON request body.
    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ConstructionError> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Replace session auth with explicit credentials.
    pub fn auth_override(mut self, auth: BasicAuth) -> Self {
        self.auth_override = Some(auth);
        self
    }

    /// Mark the request as one the transport must send without session credentials.
    pub fn unauthenticated(mut self) -> Self {
        self.requires_unauthenticated = true;
        self
    }

    pub fn target(mut self, target: ServiceTarget) -> Self {
        self.target = target;
        self
    }

    pub fn build(self) -> RequestDescriptor {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            method = %self.method,
            path = %self.path,
            service = self.target.as_str(),
            has_body = self.body.is_some(),
            "built request descriptor"
        );

        RequestDescriptor {
            method: self.method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            body: self.body,
            auth_override: self.auth_override,
            requires_unauthenticated: self.requires_unauthenticated,
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::COOKIE;

    #[test]
    fn test_builder_defaults() {
        let d = RequestDescriptor::builder(Method::GET, "/v1/devices/").build();
        assert_eq!(d.method(), &Method::GET);
        assert_eq!(d.path(), "/v1/devices/");
        assert!(d.query().is_empty());
        assert!(d.headers().is_empty());
        assert!(d.body().is_none());
        assert!(d.auth_override().is_none());
        assert!(!d.requires_unauthenticated());
        assert_eq!(d.target(), ServiceTarget::Main);
        assert!(d.uses_session_auth());
    }

    #[test]
    fn test_builder_anchors_relative_path() {
        let d = RequestDescriptor::builder(Method::GET, "v1/config/").build();
        assert_eq!(d.path(), "/v1/config/");
    }

    #[test]
    fn test_builder_query_opt() {
        let d = RequestDescriptor::builder(Method::GET, "/x")
            .query("client", "ios")
            .query_opt("captcha", None::<String>)
            .query_opt("challenge", Some("abc"))
            .build();
        assert_eq!(d.query().len(), 2);
        assert_eq!(d.query().get("client").map(String::as_str), Some("ios"));
        assert_eq!(d.query().get("challenge").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_builder_rejects_invalid_header_value() {
        let result = RequestDescriptor::builder(Method::GET, "/x").header(COOKIE, "a=b\nc");
        assert!(matches!(result, Err(ConstructionError::InvalidHeader(_))));
    }

    #[test]
    fn test_auth_modes() {
        let unauth = RequestDescriptor::builder(Method::GET, "/x")
            .unauthenticated()
            .build();
        assert!(!unauth.uses_session_auth());

        let overridden = RequestDescriptor::builder(Method::GET, "/x")
            .auth_override(BasicAuth::new("user", "pass"))
            .build();
        assert!(!overridden.uses_session_auth());
        assert_eq!(overridden.auth_override().unwrap().username(), "user");
    }

    #[test]
    fn test_basic_auth_header_value() {
        let auth = BasicAuth::new("+15551234567", "secret");
        let value = auth.header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "Basic KzE1NTUxMjM0NTY3OnNlY3JldA==");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_basic_auth_debug_redacts_password() {
        let debug = format!("{:?}", BasicAuth::new("user", "hunter2"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_json_body() {
        let d = RequestDescriptor::builder(Method::PUT, "/v1/accounts/pin")
            .json_body(&serde_json::json!({ "pin": "1234" }))
            .unwrap()
            .build();
        assert_eq!(d.body().unwrap().as_ref(), br#"{"pin":"1234"}"#);
    }
}
