//! Registration Flow
//!
//! Builds every request a new primary device sends while registering:
//! verification code, device verification, attributes, prekeys and push
//! registration. Each descriptor is rendered against the default hosts and
//! printed; nothing is sent.
//!
//! Usage:
//!   cargo run --bin registration
//!
//!   # Or with a specific phone number:
//!   cargo run --bin registration -- +15557654321

use std::env;

use textsecure_request::{
    AccountAttributes, BasicAuth, DeviceCapabilities, PreKeyRecord, RequestFactory,
    ServiceConfiguration, SignedPreKeyRecord, VerificationTransport, render,
};
use textsecure_request_demos::{init_tracing, print_request};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let phone_number = env::args()
        .nth(1)
        .unwrap_or_else(|| "+15551234567".to_string());
    let auth_key = "generated-auth-key";
    let config = ServiceConfiguration::default();

    println!("=== Registration for {} ===", phone_number);
    println!();

    // Step 1: ask for a code. No session exists yet.
    let code_request = RequestFactory::request_verification_code(
        &phone_number,
        None,
        None,
        VerificationTransport::Sms,
    )?;
    print_request(
        "request verification code",
        &render(&code_request, &config, None)?,
    );

    // Step 2: verify with the code, authenticating with the new auth key.
    let attributes = AccountAttributes {
        registration_id: 4242,
        fetches_messages: false,
        unidentified_access_key: Some(vec![0x11; 16]),
        discoverable_by_phone_number: true,
        capabilities: DeviceCapabilities {
            gv2: true,
            storage: true,
            transfer: false,
        },
        ..Default::default()
    };
    let verify = RequestFactory::verify_primary_device(
        "123456",
        &phone_number,
        auth_key,
        None,
        &attributes,
    )?;
    print_request("verify primary device", &render(&verify, &config, None)?);

    // From here on the session credentials are the phone number and auth key.
    let session = BasicAuth::new(phone_number.as_str(), auth_key);

    let signed = SignedPreKeyRecord::new(1, vec![0x05; 33], vec![0xAB; 64])?;
    let prekeys = (1..=3)
        .map(|id| PreKeyRecord::new(id, vec![0x05, id as u8]))
        .collect::<Result<Vec<_>, _>>()?;
    let register_prekeys = RequestFactory::register_prekeys(&prekeys, &[0x05; 33], &signed)?;
    print_request(
        "register prekeys",
        &render(&register_prekeys, &config, Some(&session))?,
    );

    let push = RequestFactory::register_for_push("apns-token", Some("voip-token"))?;
    print_request(
        "register for push",
        &render(&push, &config, Some(&session))?,
    );

    let whoami = RequestFactory::account_who_am_i()?;
    print_request("who am i", &render(&whoami, &config, Some(&session))?);

    println!("=== Done ===");
    Ok(())
}
