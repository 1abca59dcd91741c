//! Contact Discovery
//!
//! Walks the two-phase contact discovery handshake: enclave auth from the main
//! API, attestation with the enclave, then the sealed discovery request with
//! the attestation cookies. Service hosts come from an optional JSON
//! configuration file.
//!
//! Usage:
//!   cargo run --bin contact-discovery
//!
//!   # Or with a configuration file:
//!   cargo run --bin contact-discovery -- service.json
//!
//! Example service.json:
//!   { "contact_discovery_url": "https://cds.staging.example.org" }

use std::env;
use std::fs;

use anyhow::Context;
use textsecure_request::{
    BasicAuth, CdsEnclaveRequest, CdsFeedbackStatus, EnclaveCookie, EnclavePayload,
    EnclaveSession, RemoteAttestationService, RequestFactory, ServiceConfiguration, render,
};
use textsecure_request_demos::{init_tracing, print_request};

const ENCLAVE_NAME: &str = "c98e00a4e3ff977a56afefe7362a27e4961e4f19e211febfbb19b897e6b80b15";

fn load_config() -> anyhow::Result<ServiceConfiguration> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read configuration file {}", path))?;
            ServiceConfiguration::from_json(&json)
                .with_context(|| format!("invalid configuration file {}", path))
        }
        None => Ok(ServiceConfiguration::default()),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config()?;
    let session = BasicAuth::new("+15551234567", "session-password");

    println!("=== Contact Discovery ===");
    println!("Discovery host: {}", config.contact_discovery_url);
    println!();

    // Phase one: enclave credentials from the main API.
    let auth = RequestFactory::remote_attestation_auth(RemoteAttestationService::ContactDiscovery)?;
    print_request("enclave auth", &render(&auth, &config, Some(&session))?);

    // Pretend the service answered with these credentials.
    let enclave_auth = BasicAuth::new("enclave-username", "enclave-password");

    let attestation = RequestFactory::remote_attestation(
        RemoteAttestationService::ContactDiscovery,
        &[0x05; 32],
        ENCLAVE_NAME,
        enclave_auth.clone(),
    )?;
    print_request(
        "remote attestation",
        &render(&attestation, &config, Some(&session))?,
    );

    // Phase two: cookies from the attestation response travel with the payload.
    let cookies = vec![
        EnclaveCookie::new("AWSALB", "attestation-balancer")?,
        EnclaveCookie::new("AWSALBCORS", "attestation-balancer")?,
    ];
    let request = CdsEnclaveRequest {
        session: EnclaveSession::new(ENCLAVE_NAME, enclave_auth, cookies)?,
        payload: EnclavePayload::new(vec![1; 16], vec![2; 64], vec![3; 12], vec![4; 16])?,
        address_count: 2,
    };
    let discovery = RequestFactory::cds_enclave(&request)?;
    print_request(
        "discovery request",
        &render(&discovery, &config, Some(&session))?,
    );

    let feedback = RequestFactory::cds_feedback(CdsFeedbackStatus::Ok, None)?;
    print_request(
        "discovery feedback",
        &render(&feedback, &config, Some(&session))?,
    );

    println!("=== Done ===");
    Ok(())
}
