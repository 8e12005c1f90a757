//! Example: Polling a tag table on several PLCs
//!
//! Run with: cargo run --example read_tags -- 192.168.0.10 192.168.0.11
//!
//! Set RUST_LOG=ge_srtp=trace to see every frame.
//!
//! This example demonstrates:
//! - Opening one session per PLC
//! - Reading named tags, including two-register values
//! - Telling per-read failures apart from connection failures

use std::net::IpAddr;

use ge_srtp::{Session, SessionConfig, SrtpError};
use tracing_subscriber::EnvFilter;

const TAGS: &[(&str, &str)] = &[
    ("T1 Body", "R20000:2"),
    ("T1 Seq", "R20002:2"),
    ("T2 Body", "R20004:2"),
    ("T2 Seq", "R20006:2"),
    ("Moving", "Q00065"),
    ("Andon", "MB03521"),
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ips: Vec<IpAddr> = std::env::args()
        .skip(1)
        .filter_map(|arg| match arg.parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                eprintln!("skipping invalid IP '{arg}'");
                None
            }
        })
        .collect();

    if ips.is_empty() {
        eprintln!("usage: read_tags <plc-ip>...");
        return;
    }

    for ip in ips {
        println!("=== {ip} ===");
        if let Err(e) = poll_plc(ip) {
            println!("  {ip}: {e}");
        }
    }
}

fn poll_plc(ip: IpAddr) -> Result<(), SrtpError> {
    let mut session = Session::open(SessionConfig::new(ip))?;

    for (name, address) in TAGS {
        match session.read_register(address) {
            Ok(result) => println!(
                "  {name:<8} {address:<10} status 0x{:02X}/0x{:02X} value {}",
                result.status_code, result.status_code_minor, result.register_value
            ),
            Err(e) if e.is_connection_error() => return Err(e),
            Err(e) => println!("  {name:<8} {address:<10} failed: {e}"),
        }
    }

    session.close();
    Ok(())
}
