//! Named register blocks bound to a base address in a shared address space.

use tracing::debug;

use crate::{Address, AddressSpace, RegisterError, VolatileBus, Word};

/// Named register at a fixed offset from its device base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterDescriptor {
    /// Register name used for lookups.
    pub name: &'static str,
    /// Byte offset from the device base address.
    pub offset: Address,
}

impl RegisterDescriptor {
    /// Creates a descriptor for `name` at `offset`.
    #[must_use]
    pub const fn new(name: &'static str, offset: Address) -> Self {
        Self { name, offset }
    }
}

/// Administrative lifecycle state of a [`RegisterDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DeviceState {
    /// Initial state after construction.
    #[default]
    Enabled,
    /// Entered through [`RegisterDevice::disable`]; there is no way back.
    Disabled,
}

impl DeviceState {
    /// Returns `true` for [`DeviceState::Enabled`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Register block exposing named fields backed by a [`VolatileBus`].
///
/// The device only borrows its bus, so the bus outlives every device bound to
/// it. Binding writes nothing: register contents are whatever the bus holds.
/// Disabling is an administrative state and does not gate accesses.
#[derive(Debug)]
pub struct RegisterDevice<'a, B: VolatileBus + ?Sized = AddressSpace> {
    bus: &'a B,
    name: &'static str,
    base: Address,
    registers: &'static [RegisterDescriptor],
    state: DeviceState,
}

impl<'a, B: VolatileBus + ?Sized> RegisterDevice<'a, B> {
    /// Binds a device named `name` with the given register layout at `base`.
    ///
    /// When `registers` repeats a name, the first entry wins.
    #[must_use]
    pub const fn new(
        bus: &'a B,
        name: &'static str,
        base: Address,
        registers: &'static [RegisterDescriptor],
    ) -> Self {
        Self {
            bus,
            name,
            base,
            registers,
            state: DeviceState::Enabled,
        }
    }

    /// Returns the device name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the base address fixed at construction.
    #[must_use]
    pub const fn base(&self) -> Address {
        self.base
    }

    /// Returns the declared register layout.
    #[must_use]
    pub const fn registers(&self) -> &'static [RegisterDescriptor] {
        self.registers
    }

    /// Returns the bus this device is bound to.
    #[must_use]
    pub const fn bus(&self) -> &'a B {
        self.bus
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Returns `true` until [`RegisterDevice::disable`] has been called.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Resolves `register` to its absolute bus address.
    ///
    /// The address is `base + offset`, wrapping at the top of the bus.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] when `register` is not
    /// declared by this device.
    pub fn register_address(&self, register: &str) -> Result<Address, RegisterError> {
        self.registers
            .iter()
            .find(|descriptor| descriptor.name == register)
            .map(|descriptor| self.base.wrapping_add(descriptor.offset))
            .ok_or_else(|| RegisterError::InvalidRegister {
                device: self.name,
                register: register.to_string(),
            })
    }

    /// Reads the current value of `register` from the bus.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] when `register` is not
    /// declared by this device. The bus is not accessed in that case.
    pub fn read_register(&self, register: &str) -> Result<Word, RegisterError> {
        let addr = self.register_address(register)?;
        Ok(self.bus.read(addr))
    }

    /// Writes `value` to `register` on the bus.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InvalidRegister`] when `register` is not
    /// declared by this device. The bus is left unmodified in that case.
    pub fn write_register(&self, register: &str, value: Word) -> Result<(), RegisterError> {
        let addr = self.register_address(register)?;
        self.bus.write(addr, value);
        Ok(())
    }

    /// Moves the device to [`DeviceState::Disabled`].
    ///
    /// Calling this on an already disabled device does nothing. Register
    /// contents are never touched.
    pub fn disable(&mut self) {
        if self.state.is_enabled() {
            debug!(device = self.name, base = self.base, "device disabled");
            self.state = DeviceState::Disabled;
        }
    }
}
