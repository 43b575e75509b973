// SPDX-License-Identifier: MPL-2.0

//! Demo program: poll a purifier and print every pushed update.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example poll -- <ip> [seconds]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=daikin_purifier=debug cargo run --example poll -- 192.168.1.40 60
//! ```

use std::env;
use std::time::Duration;

use daikin_purifier::{Purifier, PurifierConfig, Subscribable};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <ip> [seconds]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example poll -- 192.168.1.40 60");
        std::process::exit(1);
    }

    let ip = &args[1];
    let seconds: u64 = match args.get(2) {
        Some(s) => s.parse()?,
        None => 60,
    };

    let config = PurifierConfig::new(ip.as_str()).with_refresh_interval(Duration::from_secs(5));
    let purifier = Purifier::from_config(config)?;

    println!("Firmware: {}", purifier.firmware_revision().await);
    println!("Active: {}", purifier.active().await?);
    println!("Target state: {}", purifier.target_state().await?);

    purifier.on_active_changed(|active| println!("  active -> {active}"));
    purifier.on_current_state_changed(|state| println!("  current state -> {state}"));
    purifier.on_target_mode_changed(|mode| println!("  target state -> {mode}"));
    purifier.on_poll_failed(|e| eprintln!("  poll failed: {e}"));

    purifier.start()?;
    println!("Polling every {:?} for {seconds}s...", purifier.refresh_interval());

    tokio::time::sleep(Duration::from_secs(seconds)).await;

    purifier.stop();
    println!("Final state: {:?}", purifier.state());

    Ok(())
}
