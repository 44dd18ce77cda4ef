//! Watchdog timer register block.
//!
//! Twelve packed 16-bit registers starting at [`WATCHDOG_BASE`]. Only the
//! register layout and the unlock key sequence are modeled; the timer itself
//! never counts and never resets the machine.

use crate::{
    Address, AddressSpace, RegisterDescriptor, RegisterDevice, RegisterError, VolatileBus, Word,
};

/// Default watchdog base address.
pub const WATCHDOG_BASE: Address = 0x4005_2000;

/// Device name reported in errors and logs.
pub const WATCHDOG_NAME: &str = "WDOG";

/// Status and control high register.
pub const WDOG_STCTRLH: &str = "stctrlh";

/// Unlock register.
pub const WDOG_UNLOCK: &str = "unlock";

/// Keys written to [`WDOG_UNLOCK`], in order, to open the configuration window.
pub const WATCHDOG_UNLOCK_KEYS: [Word; 2] = [0xC520, 0xD928];

/// Bus cycles the watchdog needs after the unlock sequence.
pub const WATCHDOG_UNLOCK_SETTLE_TICKS: u32 = 2;

/// Width in bytes of every watchdog register.
pub const WATCHDOG_REGISTER_BYTES: Address = 2;

/// Watchdog register layout in ascending offset order.
pub const WATCHDOG_REGISTERS: &[RegisterDescriptor] = &[
    RegisterDescriptor::new(WDOG_STCTRLH, 0x00),
    RegisterDescriptor::new("stctrll", 0x02),
    RegisterDescriptor::new("tovalh", 0x04),
    RegisterDescriptor::new("tovall", 0x06),
    RegisterDescriptor::new("winh", 0x08),
    RegisterDescriptor::new("winl", 0x0A),
    RegisterDescriptor::new("refresh", 0x0C),
    RegisterDescriptor::new(WDOG_UNLOCK, 0x0E),
    RegisterDescriptor::new("tmrouth", 0x10),
    RegisterDescriptor::new("tmroutl", 0x12),
    RegisterDescriptor::new("rstcnt", 0x14),
    RegisterDescriptor::new("presc", 0x16),
];

const _: () = assert_watchdog_layout();

#[allow(clippy::cast_possible_truncation)]
const fn assert_watchdog_layout() {
    assert!(
        WATCHDOG_REGISTERS.len() == 12,
        "invalid watchdog register count"
    );

    let mut index = 0;
    while index < WATCHDOG_REGISTERS.len() {
        let descriptor = WATCHDOG_REGISTERS[index];
        assert!(
            descriptor.offset == index as Address * WATCHDOG_REGISTER_BYTES,
            "watchdog registers must be packed 16-bit fields"
        );

        let mut other = 0;
        while other < index {
            assert!(
                !str_eq(WATCHDOG_REGISTERS[other].name, descriptor.name),
                "watchdog register names must be unique"
            );
            other += 1;
        }

        index += 1;
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut index = 0;
    while index < a.len() {
        if a[index] != b[index] {
            return false;
        }
        index += 1;
    }
    true
}

/// Configuration for the watchdog peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WatchdogConfig {
    /// Base address of the register block.
    pub base: Address,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            base: WATCHDOG_BASE,
        }
    }
}

/// Watchdog peripheral bound to a shared bus.
#[derive(Debug)]
pub struct Watchdog<'a, B: VolatileBus + ?Sized = AddressSpace> {
    device: RegisterDevice<'a, B>,
}

impl<'a, B: VolatileBus + ?Sized> Watchdog<'a, B> {
    /// Binds the watchdog register block at `config.base`.
    #[must_use]
    pub const fn new(bus: &'a B, config: WatchdogConfig) -> Self {
        Self {
            device: RegisterDevice::new(bus, WATCHDOG_NAME, config.base, WATCHDOG_REGISTERS),
        }
    }

    /// Returns the underlying register device.
    #[must_use]
    pub const fn device(&self) -> &RegisterDevice<'a, B> {
        &self.device
    }

    /// Returns `true` until [`Watchdog::disable`] has been called.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.device.is_enabled()
    }

    /// Writes the unlock key sequence and waits for it to settle.
    ///
    /// # Errors
    ///
    /// Propagates [`RegisterError`] from register resolution.
    pub fn unlock(&self) -> Result<(), RegisterError> {
        for key in WATCHDOG_UNLOCK_KEYS {
            self.device.write_register(WDOG_UNLOCK, key)?;
        }
        for _ in 0..WATCHDOG_UNLOCK_SETTLE_TICKS {
            self.device.bus().tick();
        }
        Ok(())
    }

    /// Unlocks the block and disables the watchdog.
    ///
    /// Only the unlock register is written; `stctrlh` keeps its value. A
    /// second call does nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`RegisterError`] from [`Watchdog::unlock`].
    pub fn disable(&mut self) -> Result<(), RegisterError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.unlock()?;
        self.device.disable();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        Watchdog, WatchdogConfig, WATCHDOG_BASE, WATCHDOG_REGISTERS, WATCHDOG_UNLOCK_KEYS,
        WATCHDOG_UNLOCK_SETTLE_TICKS, WDOG_STCTRLH, WDOG_UNLOCK,
    };
    use crate::{AddressSpace, VolatileBus};

    #[rstest]
    #[case("stctrlh", 0x4005_2000)]
    #[case("stctrll", 0x4005_2002)]
    #[case("tovalh", 0x4005_2004)]
    #[case("tovall", 0x4005_2006)]
    #[case("winh", 0x4005_2008)]
    #[case("winl", 0x4005_200A)]
    #[case("refresh", 0x4005_200C)]
    #[case("unlock", 0x4005_200E)]
    #[case("tmrouth", 0x4005_2010)]
    #[case("tmroutl", 0x4005_2012)]
    #[case("rstcnt", 0x4005_2014)]
    #[case("presc", 0x4005_2016)]
    fn default_layout_resolves_register(#[case] name: &str, #[case] addr: u32) {
        let space = AddressSpace::new();
        let watchdog = Watchdog::new(&space, WatchdogConfig::default());
        assert_eq!(watchdog.device().register_address(name), Ok(addr));
    }

    #[test]
    fn default_config_uses_hardware_base() {
        assert_eq!(WatchdogConfig::default().base, WATCHDOG_BASE);
        assert_eq!(WATCHDOG_REGISTERS.len(), 12);
    }

    #[test]
    fn unlock_writes_keys_in_order_and_settles() {
        let space = AddressSpace::new();
        let watchdog = Watchdog::new(&space, WatchdogConfig::default());

        watchdog.unlock().unwrap();

        assert_eq!(
            watchdog.device().read_register(WDOG_UNLOCK),
            Ok(WATCHDOG_UNLOCK_KEYS[1])
        );
        assert_eq!(space.ticks(), u64::from(WATCHDOG_UNLOCK_SETTLE_TICKS));
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn disable_leaves_control_register_untouched() {
        let space = AddressSpace::new();
        let mut watchdog = Watchdog::new(&space, WatchdogConfig::default());
        watchdog
            .device()
            .write_register(WDOG_STCTRLH, 0x01D3)
            .unwrap();

        watchdog.disable().unwrap();

        assert!(!watchdog.is_enabled());
        assert_eq!(watchdog.device().read_register(WDOG_STCTRLH), Ok(0x01D3));
    }

    #[test]
    fn second_disable_does_not_replay_unlock() {
        let space = AddressSpace::new();
        let mut watchdog = Watchdog::new(&space, WatchdogConfig::default());

        watchdog.disable().unwrap();
        let after_first = space.snapshot();
        watchdog.disable().unwrap();

        assert!(!watchdog.is_enabled());
        assert_eq!(space.snapshot(), after_first);
    }

    #[test]
    fn relocated_watchdog_uses_configured_base() {
        let space = AddressSpace::new();
        let watchdog = Watchdog::new(&space, WatchdogConfig { base: 0x1000 });

        watchdog.unlock().unwrap();

        assert_eq!(space.read(0x100E), WATCHDOG_UNLOCK_KEYS[1]);
        assert_eq!(space.read(WATCHDOG_BASE + 0x0E), 0);
    }
}
