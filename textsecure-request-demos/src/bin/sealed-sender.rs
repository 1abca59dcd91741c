//! Sealed Sender
//!
//! Builds the same message submission twice, once with session auth and once
//! sealed-sender with an unidentified access key, and prints both rendered
//! requests so the difference in auth headers is visible.
//!
//! Usage:
//!   cargo run --bin sealed-sender

use http::header::AUTHORIZATION;
use textsecure_request::{
    BasicAuth, OutgoingDeviceMessage, RequestFactory, ServiceAddress, ServiceConfiguration,
    UNIDENTIFIED_ACCESS_KEY_HEADER, UdAccessKey, render,
};
use textsecure_request_demos::{init_tracing, print_request};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServiceConfiguration::default();
    let session = BasicAuth::new("+15551234567", "session-password");
    let recipient = ServiceAddress::new("UUID-1234")?;
    let access_key = UdAccessKey::new(&[0x42; 16])?;

    let messages = [OutgoingDeviceMessage {
        message_type: 6,
        destination_device_id: 1,
        destination_registration_id: Some(4242),
        content: "c2VhbGVkIGNpcGhlcnRleHQ=".to_string(),
    }];
    let timestamp = 1_700_000_000_000;

    println!("=== Sealed Sender ===");
    println!();

    let identified = RequestFactory::submit_message(&recipient, &messages, timestamp, None)?;
    let identified = render(&identified, &config, Some(&session))?;
    print_request("session auth", &identified);

    let sealed =
        RequestFactory::submit_message(&recipient, &messages, timestamp, Some(&access_key))?;
    let sealed = render(&sealed, &config, Some(&session))?;
    print_request("sealed sender", &sealed);

    anyhow::ensure!(
        identified.headers().contains_key(AUTHORIZATION),
        "session request is missing credentials"
    );
    anyhow::ensure!(
        !sealed.headers().contains_key(AUTHORIZATION)
            && sealed.headers().contains_key(UNIDENTIFIED_ACCESS_KEY_HEADER),
        "sealed request still identifies the sender"
    );

    // Profile and prekey fetches switch the same way.
    let profile = RequestFactory::get_unversioned_profile(&recipient, Some(&access_key))?;
    print_request(
        "sealed profile fetch",
        &render(&profile, &config, Some(&session))?,
    );

    println!("=== Done ===");
    Ok(())
}
