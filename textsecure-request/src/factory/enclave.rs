//! Remote attestation, contact discovery and key backup.
//!
//! Enclave traffic has two phases. Phase one runs against the main API and
//! returns short-lived enclave credentials ([`RequestFactory::remote_attestation_auth`]);
//! the attestation handshake ([`RequestFactory::remote_attestation`]) then
//! returns session cookies. Phase two requests carry a sealed payload, the
//! enclave credentials as basic auth, and those cookies. Threading the
//! credentials and cookies from one phase into the next is up to the caller.

use http::Method;
use serde::Serialize;
use textsecure_request_core::encoding::serialize_base64;
use textsecure_request_core::{
    BasicAuth, CdsEnclaveRequest, ConstructionError, DescriptorBuilder, EnclavePayload,
    EnclaveSession, KbsEnclaveRequest, RequestDescriptor, ServiceTarget, require_basic_username,
    require_non_empty, require_path_segment,
};

use super::{DescriptorBuilderExt, RequestFactory};

/// Longest feedback reason the service accepts, in characters.
const MAX_FEEDBACK_REASON_CHARS: usize = 1000;

/// Enclave-backed service a remote attestation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemoteAttestationService {
    ContactDiscovery,
    KeyBackup,
}

impl RemoteAttestationService {
    /// Host category of the enclave itself.
    pub fn target(&self) -> ServiceTarget {
        match self {
            RemoteAttestationService::ContactDiscovery => ServiceTarget::ContactDiscovery,
            RemoteAttestationService::KeyBackup => ServiceTarget::KeyBackup,
        }
    }

    fn auth_path(&self) -> &'static str {
        match self {
            RemoteAttestationService::ContactDiscovery => "/v1/directory/auth",
            RemoteAttestationService::KeyBackup => "/v1/backup/auth",
        }
    }
}

/// Outcome of a contact discovery run, reported back to the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CdsFeedbackStatus {
    Ok,
    Mismatch,
    AttestationError,
    UnexpectedError,
}

impl CdsFeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CdsFeedbackStatus::Ok => "ok",
            CdsFeedbackStatus::Mismatch => "mismatch",
            CdsFeedbackStatus::AttestationError => "attestation-error",
            CdsFeedbackStatus::UnexpectedError => "unexpected-error",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttestationBody<'a> {
    #[serde(serialize_with = "serialize_base64")]
    client_public: &'a [u8],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CdsBody<'a> {
    address_count: u32,
    #[serde(flatten)]
    payload: &'a EnclavePayload,
}

#[derive(Serialize)]
struct KbsBody<'a> {
    #[serde(flatten)]
    payload: &'a EnclavePayload,
    #[serde(rename = "type")]
    request_type: &'static str,
}

#[derive(Serialize)]
struct FeedbackBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl RequestFactory {
    /// Phase one: request enclave credentials for `service`.
    ///
    /// Sent to the main API with session auth.
    pub fn remote_attestation_auth(
        service: RemoteAttestationService,
    ) -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, service.auth_path()).build())
    }

    /// Attestation handshake with the enclave, presenting the client's
    /// ephemeral public key.
    pub fn remote_attestation(
        service: RemoteAttestationService,
        client_public_key: &[u8],
        enclave_name: &str,
        auth: BasicAuth,
    ) -> Result<RequestDescriptor, ConstructionError> {
        require_non_empty("client public key", client_public_key)?;
        require_path_segment("enclave name", enclave_name)?;
        require_basic_username("enclave auth username", auth.username())?;
        Ok(
            RequestDescriptor::builder(Method::PUT, format!("/v1/attestation/{enclave_name}"))
                .json_body(&AttestationBody {
                    client_public: client_public_key,
                })?
                .auth_override(auth)
                .target(service.target())
                .build(),
        )
    }

    /// Phase two: submit sealed, hashed contacts to the discovery enclave.
    pub fn cds_enclave(
        request: &CdsEnclaveRequest,
    ) -> Result<RequestDescriptor, ConstructionError> {
        if request.address_count == 0 {
            return Err(ConstructionError::invalid("address count", "must be at least 1"));
        }
        let session = &request.session;
        let builder = RequestDescriptor::builder(
            Method::PUT,
            format!("/v1/discovery/{}", session.enclave_name()),
        )
        .json_body(&CdsBody {
            address_count: request.address_count,
            payload: &request.payload,
        })?;
        enclave_session(builder, session, ServiceTarget::ContactDiscovery)
    }

    /// Report the outcome of a discovery run.
    ///
    /// Reasons longer than 1000 characters are truncated.
    pub fn cds_feedback(
        status: CdsFeedbackStatus,
        reason: Option<&str>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        let reason = reason.map(|r| r.chars().take(MAX_FEEDBACK_REASON_CHARS).collect());
        Ok(RequestDescriptor::builder(
            Method::PUT,
            format!("/v1/directory/feedback-v3/{}", status.as_str()),
        )
        .json_body(&FeedbackBody { reason })?
        .build())
    }

    /// Fetch a key backup token from the enclave.
    pub fn kbs_enclave_token(
        session: &EnclaveSession,
    ) -> Result<RequestDescriptor, ConstructionError> {
        enclave_session(
            RequestDescriptor::builder(
                Method::GET,
                format!("/v1/token/{}", session.enclave_name()),
            ),
            session,
            ServiceTarget::KeyBackup,
        )
    }

    /// Phase two: submit a sealed backup, restore or delete request to the
    /// key backup enclave.
    pub fn kbs_enclave(
        request: &KbsEnclaveRequest,
    ) -> Result<RequestDescriptor, ConstructionError> {
        let session = &request.session;
        let builder = RequestDescriptor::builder(
            Method::PUT,
            format!("/v1/backup/{}", session.enclave_name()),
        )
        .json_body(&KbsBody {
            payload: &request.payload,
            request_type: request.request_type.as_str(),
        })?;
        enclave_session(builder, session, ServiceTarget::KeyBackup)
    }
}

/// Apply enclave credentials, cookies and host to a phase-two request.
fn enclave_session(
    builder: DescriptorBuilder,
    session: &EnclaveSession,
    target: ServiceTarget,
) -> Result<RequestDescriptor, ConstructionError> {
    Ok(builder
        .auth_override(session.auth().clone())
        .cookies(session.cookies())?
        .target(target)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{AUTHORIZATION, COOKIE};
    use serde_json::{Value, json};
    use textsecure_request_core::{EnclaveCookie, KbsRequestType};

    fn payload() -> EnclavePayload {
        EnclavePayload::new(vec![1], vec![2, 2], vec![3; 12], vec![4; 16]).unwrap()
    }

    fn session(cookies: Vec<EnclaveCookie>) -> EnclaveSession {
        EnclaveSession::new("abc123", BasicAuth::new("enclave-user", "enclave-pass"), cookies)
            .unwrap()
    }

    fn cookies() -> Vec<EnclaveCookie> {
        vec![
            EnclaveCookie::new("AWSALB", "one").unwrap(),
            EnclaveCookie::new("AWSALBCORS", "two").unwrap(),
            EnclaveCookie::new("session", "three").unwrap(),
        ]
    }

    fn body_json(d: &RequestDescriptor) -> Value {
        serde_json::from_slice(d.body().unwrap()).unwrap()
    }

    #[test]
    fn test_remote_attestation_auth() {
        let d = RequestFactory::remote_attestation_auth(RemoteAttestationService::ContactDiscovery)
            .unwrap();
        assert_eq!((d.method(), d.path()), (&Method::GET, "/v1/directory/auth"));
        assert_eq!(d.target(), ServiceTarget::Main);
        assert!(d.uses_session_auth());

        let d = RequestFactory::remote_attestation_auth(RemoteAttestationService::KeyBackup)
            .unwrap();
        assert_eq!(d.path(), "/v1/backup/auth");
        assert_eq!(d.target(), ServiceTarget::Main);
    }

    #[test]
    fn test_remote_attestation() {
        let d = RequestFactory::remote_attestation(
            RemoteAttestationService::KeyBackup,
            &[5, 6, 7],
            "abc123",
            BasicAuth::new("u", "p"),
        )
        .unwrap();
        assert_eq!((d.method(), d.path()), (&Method::PUT, "/v1/attestation/abc123"));
        assert_eq!(d.target(), ServiceTarget::KeyBackup);
        assert_eq!(d.auth_override().unwrap().username(), "u");
        assert!(!d.uses_session_auth());
        assert_eq!(body_json(&d), json!({ "clientPublic": "BQYH" }));
    }

    #[test]
    fn test_remote_attestation_validation() {
        let auth = BasicAuth::new("u", "p");
        let service = RemoteAttestationService::ContactDiscovery;
        assert_eq!(
            RequestFactory::remote_attestation(service, &[], "e", auth.clone()),
            Err(ConstructionError::empty("client public key"))
        );
        assert_eq!(
            RequestFactory::remote_attestation(service, &[1], "", auth),
            Err(ConstructionError::empty("enclave name"))
        );
        assert!(matches!(
            RequestFactory::remote_attestation(service, &[1], "e", BasicAuth::new("u:v", "p")),
            Err(ConstructionError::InvalidField { field: "enclave auth username", .. })
        ));
    }

    #[test]
    fn test_cds_enclave() {
        let request = CdsEnclaveRequest {
            session: session(cookies()),
            payload: payload(),
            address_count: 3,
        };
        let d = RequestFactory::cds_enclave(&request).unwrap();
        assert_eq!((d.method(), d.path()), (&Method::PUT, "/v1/discovery/abc123"));
        assert_eq!(d.target(), ServiceTarget::ContactDiscovery);
        assert_eq!(d.auth_override().unwrap().password(), "enclave-pass");
        assert_eq!(
            d.headers().get(COOKIE).unwrap(),
            "AWSALB=one; AWSALBCORS=two; session=three"
        );
        assert!(d.headers().get(AUTHORIZATION).is_none());
        assert_eq!(
            body_json(&d),
            json!({
                "addressCount": 3,
                "requestId": "AQ==",
                "data": "AgI=",
                "iv": "AwMDAwMDAwMDAwMD",
                "mac": "BAQEBAQEBAQEBAQEBAQEBA=="
            })
        );
    }

    #[test]
    fn test_cds_enclave_without_cookies() {
        let request = CdsEnclaveRequest {
            session: session(vec![]),
            payload: payload(),
            address_count: 1,
        };
        let d = RequestFactory::cds_enclave(&request).unwrap();
        assert!(d.headers().get(COOKIE).is_none());
        assert!(d.auth_override().is_some());
    }

    #[test]
    fn test_cds_enclave_rejects_zero_addresses() {
        let request = CdsEnclaveRequest {
            session: session(vec![]),
            payload: payload(),
            address_count: 0,
        };
        assert!(matches!(
            RequestFactory::cds_enclave(&request),
            Err(ConstructionError::InvalidField { field: "address count", .. })
        ));
    }

    #[test]
    fn test_cds_feedback() {
        let d = RequestFactory::cds_feedback(CdsFeedbackStatus::AttestationError, Some("quote"))
            .unwrap();
        assert_eq!(
            (d.method(), d.path()),
            (&Method::PUT, "/v1/directory/feedback-v3/attestation-error")
        );
        assert_eq!(body_json(&d), json!({ "reason": "quote" }));

        let d = RequestFactory::cds_feedback(CdsFeedbackStatus::Ok, None).unwrap();
        assert_eq!(d.path(), "/v1/directory/feedback-v3/ok");
        assert_eq!(body_json(&d), json!({}));
    }

    #[test]
    fn test_cds_feedback_truncates_reason() {
        let long = "é".repeat(1500);
        let d = RequestFactory::cds_feedback(CdsFeedbackStatus::Mismatch, Some(&long)).unwrap();
        let body = body_json(&d);
        assert_eq!(body["reason"].as_str().unwrap().chars().count(), 1000);
    }

    #[test]
    fn test_kbs_enclave_token() {
        let d = RequestFactory::kbs_enclave_token(&session(cookies())).unwrap();
        assert_eq!((d.method(), d.path()), (&Method::GET, "/v1/token/abc123"));
        assert_eq!(d.target(), ServiceTarget::KeyBackup);
        assert!(d.body().is_none());
        assert!(d.headers().contains_key(COOKIE));
        assert!(!d.uses_session_auth());
    }

    #[test]
    fn test_kbs_enclave_request_types() {
        for (request_type, name) in [
            (KbsRequestType::Backup, "backup"),
            (KbsRequestType::Restore, "restore"),
            (KbsRequestType::Delete, "delete"),
        ] {
            let request = KbsEnclaveRequest {
                session: session(cookies()),
                payload: payload(),
                request_type,
            };
            let d = RequestFactory::kbs_enclave(&request).unwrap();
            assert_eq!((d.method(), d.path()), (&Method::PUT, "/v1/backup/abc123"));
            assert_eq!(d.target(), ServiceTarget::KeyBackup);
            let body = body_json(&d);
            assert_eq!(body["type"], name);
            assert_eq!(body["requestId"], "AQ==");
        }
    }
}
