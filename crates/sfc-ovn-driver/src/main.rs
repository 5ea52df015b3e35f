//! ovn-sfcd - OVN SFC Driver Daemon
//!
//! Entry point for the ovn-sfcd daemon.

use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initializes tracing/logging subsystem
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    info!("--- Starting ovn-sfcd (Rust) ---");

    // The driver is constructed here once the northbound OVSDB
    // connection and intent-model RPC clients are wired in by the
    // deployment; lifecycle events then dispatch to SfcDriver.
    info!("ovn-sfcd initialization complete (placeholder mode)");
    info!("Full implementation pending northbound OVSDB connection integration");

    ExitCode::SUCCESS
}
