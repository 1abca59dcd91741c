//! Rendering descriptors into HTTP requests.
//!
//! This module bridges a [`RequestDescriptor`] and whatever HTTP client
//! executes it. [`render`] resolves the host, default headers and auth mode
//! into a plain [`http::Request`]; it does not open connections, retry, or
//! read responses.
//!
//! # Example
//!
//! ```
//! use textsecure_request::{BasicAuth, RequestFactory, ServiceConfiguration, render};
//!
//! let config = ServiceConfiguration::default();
//! let session = BasicAuth::new("+15551234567", "password");
//!
//! let descriptor = RequestFactory::get_devices()?;
//! let request = render(&descriptor, &config, Some(&session))?;
//!
//! assert_eq!(
//!     request.uri(),
//!     "https://textsecure-service.whispersystems.org/v1/devices/"
//! );
//! assert!(request.headers().contains_key(http::header::AUTHORIZATION));
//! # Ok::<(), textsecure_request::ConstructionError>(())
//! ```

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT};
use http::{HeaderMap, Request};
use textsecure_request_core::{BasicAuth, ConstructionError, RequestDescriptor};
use url::Url;

use crate::config::ServiceConfiguration;

/// Content type of every request body.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Render `descriptor` into an executable request.
///
/// Auth is resolved in order: the descriptor's override, then `session`
/// unless the descriptor requires an unauthenticated request. Descriptor
/// headers are applied last and are copied verbatim.
pub fn render(
    descriptor: &RequestDescriptor,
    config: &ServiceConfiguration,
    session: Option<&BasicAuth>,
) -> Result<Request<Bytes>, ConstructionError> {
    let url = request_url(descriptor, config)?;

    // 1. Default headers
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
    if descriptor.body().is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }

    // 2. Auth
    let auth = match (descriptor.auth_override(), session) {
        (Some(explicit), _) => Some(explicit),
        (None, Some(session)) if !descriptor.requires_unauthenticated() => Some(session),
        _ => None,
    };
    if let Some(auth) = auth {
        headers.insert(AUTHORIZATION, auth.header_value()?);
    }

    // 3. Descriptor headers
    for (name, value) in descriptor.headers() {
        headers.insert(name.clone(), value.clone());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        method = %descriptor.method(),
        path = %descriptor.path(),
        service = descriptor.target().as_str(),
        authenticated = auth.is_some(),
        "rendered request"
    );

    let mut builder = Request::builder()
        .method(descriptor.method().clone())
        .uri(url.as_str());
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }

    Ok(builder.body(descriptor.body().cloned().unwrap_or_default())?)
}

/// Absolute URL for `descriptor`: the target's base, the path, then the query.
///
/// A path prefix on the base URL is kept. Paths the URL parser would
/// normalize into a different route (dot segments, `\`, control characters)
/// are rejected.
pub fn request_url(
    descriptor: &RequestDescriptor,
    config: &ServiceConfiguration,
) -> Result<Url, ConstructionError> {
    check_path(descriptor.path())?;
    let base = config.url_for(descriptor.target())?;
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), descriptor.path());
    let mut url = Url::parse(&joined)
        .map_err(|e| ConstructionError::InvalidUrl(format!("{:?}: {}", joined, e)))?;

    if !descriptor.query().is_empty() {
        url.query_pairs_mut().extend_pairs(descriptor.query());
    }
    Ok(url)
}

fn check_path(path: &str) -> Result<(), ConstructionError> {
    for segment in path.split('/') {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        if decoded == "." || decoded == ".." {
            return Err(ConstructionError::InvalidUrl(format!(
                "{:?} contains a dot segment",
                path
            )));
        }
        if segment.contains('\\') || segment.chars().any(char::is_control) {
            return Err(ConstructionError::InvalidUrl(format!(
                "{:?} contains a character that changes the route",
                path
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{
        RemoteAttestationService, RequestFactory, UNIDENTIFIED_ACCESS_KEY_HEADER,
        VerificationTransport,
    };
    use http::Method;
    use http::header::COOKIE;
    use textsecure_request_core::{
        EnclaveCookie, EnclavePayload, EnclaveSession, KbsEnclaveRequest, KbsRequestType,
        ServiceAddress, UdAccessKey,
    };

    fn config() -> ServiceConfiguration {
        ServiceConfiguration::new()
            .main_url("https://main.test")
            .contact_discovery_url("https://cds.test")
            .key_backup_url("https://kbs.test/prefix/")
            .user_agent("tests/1")
    }

    fn session() -> BasicAuth {
        BasicAuth::new("+15550000000", "session-pass")
    }

    #[test]
    fn test_render_session_auth() {
        let d = RequestFactory::enable_2fa("1234").unwrap();
        let req = render(&d, &config(), Some(&session())).unwrap();
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.uri(), "https://main.test/v1/accounts/pin");
        assert_eq!(req.headers()[USER_AGENT], "tests/1");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            req.headers()[AUTHORIZATION],
            session().header_value().unwrap()
        );
        assert_eq!(req.body().as_ref(), br#"{"pin":"1234"}"#);
    }

    #[test]
    fn test_render_without_body_has_no_content_type() {
        let d = RequestFactory::get_devices().unwrap();
        let req = render(&d, &config(), None).unwrap();
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.body().is_empty());
    }

    #[test]
    fn test_render_sealed_sender_drops_session() {
        let address = ServiceAddress::new("UUID-1234").unwrap();
        let key = UdAccessKey::new(&[1u8; 16]).unwrap();
        let d = RequestFactory::get_unversioned_profile(&address, Some(&key)).unwrap();
        let req = render(&d, &config(), Some(&session())).unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert!(req.headers().contains_key(UNIDENTIFIED_ACCESS_KEY_HEADER));
    }

    #[test]
    fn test_render_override_wins_over_session() {
        let d = RequestFactory::remote_attestation(
            RemoteAttestationService::ContactDiscovery,
            &[5, 1],
            "enclave",
            BasicAuth::new("cds-user", "cds-pass"),
        )
        .unwrap();
        let req = render(&d, &config(), Some(&session())).unwrap();
        assert_eq!(req.uri(), "https://cds.test/v1/attestation/enclave");
        assert_eq!(
            req.headers()[AUTHORIZATION],
            BasicAuth::new("cds-user", "cds-pass").header_value().unwrap()
        );
    }

    #[test]
    fn test_render_keeps_base_path_prefix_and_cookies() {
        let session_cookies = vec![
            EnclaveCookie::new("a", "1").unwrap(),
            EnclaveCookie::new("b", "2").unwrap(),
        ];
        let request = KbsEnclaveRequest {
            session: EnclaveSession::new("vault", BasicAuth::new("u", "p"), session_cookies)
                .unwrap(),
            payload: EnclavePayload::new(vec![1], vec![2], vec![3], vec![4]).unwrap(),
            request_type: KbsRequestType::Restore,
        };
        let d = RequestFactory::kbs_enclave(&request).unwrap();
        let req = render(&d, &config(), None).unwrap();
        assert_eq!(req.uri(), "https://kbs.test/prefix/v1/backup/vault");
        assert_eq!(req.headers()[COOKIE], "a=1; b=2");
    }

    #[test]
    fn test_render_query_parameters() {
        let d = RequestFactory::request_verification_code(
            "+15551234567",
            None,
            Some("captcha-token"),
            VerificationTransport::Voice,
        )
        .unwrap();
        let req = render(&d, &config(), Some(&session())).unwrap();
        assert_eq!(
            req.uri(),
            "https://main.test/v1/accounts/voice/code/+15551234567?captcha=captcha-token&client=ios"
        );
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_render_rejects_bad_configuration() {
        let d = RequestFactory::get_devices().unwrap();
        let bad = config().main_url("not a url");
        assert!(matches!(
            render(&d, &bad, None),
            Err(ConstructionError::InvalidUrl(_))
        ));

        let bad_agent = config().user_agent("bad\nagent");
        assert!(matches!(
            render(&d, &bad_agent, None),
            Err(ConstructionError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_render_rejects_route_changing_parameters() {
        assert!(RequestFactory::username_set("..").is_err());
        assert!(RequestFactory::username_set("a\\..\\..\\pin").is_err());
        assert!(RequestFactory::get_profile_by_username(".").is_err());
        assert!(ServiceAddress::new("..").is_err());
        assert!(RequestFactory::preauth_challenge("+15551234567", "..").is_err());
        assert!(RequestFactory::device_provisioning(b"sealed", "a\\b").is_err());
    }

    #[test]
    fn test_render_rejects_dot_segments_in_raw_paths() {
        for path in [
            "/v1/accounts/username/..",
            "/v1/profile/./x",
            "/v1/profile/%2E%2e",
            "/v1/accounts/a\\..\\pin",
            "/v1/accounts/a\tb",
        ] {
            let d = RequestDescriptor::builder(Method::PUT, path).build();
            assert!(
                matches!(
                    render(&d, &config(), Some(&session())),
                    Err(ConstructionError::InvalidUrl(_))
                ),
                "{:?} should be rejected",
                path
            );
        }

        let d = RequestDescriptor::builder(Method::GET, "/v1/profile/name/%2B%2F8%3D").build();
        let req = render(&d, &config(), None).unwrap();
        assert_eq!(req.uri(), "https://main.test/v1/profile/name/%2B%2F8%3D");
    }
}
