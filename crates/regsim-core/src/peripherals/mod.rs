//! Illustrative peripheral register blocks.

/// Watchdog timer register block and unlock sequence.
pub mod watchdog;

pub use watchdog::{
    Watchdog, WatchdogConfig, WATCHDOG_BASE, WATCHDOG_NAME, WATCHDOG_REGISTERS,
    WATCHDOG_REGISTER_BYTES, WATCHDOG_UNLOCK_KEYS, WATCHDOG_UNLOCK_SETTLE_TICKS, WDOG_STCTRLH,
    WDOG_UNLOCK,
};
