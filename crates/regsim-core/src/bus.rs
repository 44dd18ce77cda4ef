//! Volatile access contract between register devices and their backing store.

/// Bus address on the modeled 32-bit target.
pub type Address = u32;

/// Value stored at a single bus address.
pub type Word = u32;

/// Volatile read/write access to a simulated address space.
///
/// Every call reaches the backing store: implementations must not cache,
/// merge, or elide accesses. All methods take `&self` so a single store can
/// be shared by every device bound to it.
pub trait VolatileBus {
    /// Reads the value stored at `addr`.
    ///
    /// Addresses that were never written read as `0`.
    fn read(&self, addr: Address) -> Word;

    /// Stores `value` at `addr`, replacing any previous value.
    ///
    /// The new value is visible to the next [`VolatileBus::read`] of the same
    /// address.
    fn write(&self, addr: Address, value: Word);

    /// Marks one bus cycle elapsing without touching stored values.
    fn tick(&self);
}
