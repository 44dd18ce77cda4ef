//! Memory-mapped register simulation core.

/// Volatile bus access contract and address/value widths.
pub mod bus;
pub use bus::{Address, VolatileBus, Word};

/// Sparse address-space backing store.
pub mod space;
pub use space::{AddressSpace, SpaceConfig, SpaceSnapshot};

/// Register access error taxonomy.
pub mod error;
pub use error::RegisterError;

/// Named register blocks bound to a base address.
pub mod device;
pub use device::{DeviceState, RegisterDescriptor, RegisterDevice};

/// Illustrative peripheral register blocks.
pub mod peripherals;
pub use peripherals::{
    Watchdog, WatchdogConfig, WATCHDOG_BASE, WATCHDOG_NAME, WATCHDOG_REGISTERS,
    WATCHDOG_REGISTER_BYTES, WATCHDOG_UNLOCK_KEYS, WATCHDOG_UNLOCK_SETTLE_TICKS, WDOG_STCTRLH,
    WDOG_UNLOCK,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tracing_subscriber as _;
