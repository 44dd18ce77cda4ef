//! Binds the watchdog register block, disables it, and prints the resulting
//! address-space snapshot.
//!
//! ## Usage
//!
//! ```sh
//! RUST_LOG=trace cargo run -p regsim-core --example watchdog_disable
//! ```

use proptest as _;
use regsim_core::{
    AddressSpace, RegisterError, SpaceConfig, Watchdog, WatchdogConfig, WATCHDOG_NAME,
    WDOG_STCTRLH,
};
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing_subscriber::EnvFilter;

fn run() -> Result<(), RegisterError> {
    let space = AddressSpace::with_config(SpaceConfig {
        trace_accesses: true,
    });
    let mut watchdog = Watchdog::new(&space, WatchdogConfig::default());

    watchdog.device().write_register(WDOG_STCTRLH, 0x01D3)?;
    watchdog.disable()?;

    tracing::info!(
        device = WATCHDOG_NAME,
        enabled = watchdog.is_enabled(),
        "watchdog disabled"
    );

    let snapshot = space.snapshot();
    println!("ticks: {}", snapshot.ticks);
    for (addr, value) in &snapshot.cells {
        println!("{addr:#010x}: {value:#06x}");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("watchdog_disable: {err}");
        std::process::exit(1);
    }
}
