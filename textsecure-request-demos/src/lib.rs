//! Shared helpers for the demo binaries.

use http::Request;

/// Install a `fmt` subscriber that shows descriptor construction and rendering.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .init();
}

/// Print a rendered request the way it would go over the wire.
///
/// Sensitive header values are masked.
pub fn print_request<B: AsRef<[u8]>>(label: &str, request: &Request<B>) {
    println!("--- {} ---", label);
    println!("{} {}", request.method(), request.uri());
    for (name, value) in request.headers() {
        if value.is_sensitive() {
            println!("{}: <redacted>", name);
        } else {
            println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }
    let body = request.body().as_ref();
    if !body.is_empty() {
        println!();
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(json) => println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            ),
            Err(_) => println!("{}", String::from_utf8_lossy(body)),
        }
    }
    println!();
}
