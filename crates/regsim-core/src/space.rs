//! Sparse address-space backing store.
//!
//! Only addresses that have been written occupy storage; every other address
//! reads as zero. The store is shared by reference and serializes access
//! through one lock, so a read observes a write either entirely or not at all.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::{Address, VolatileBus, Word};

/// Configuration for an [`AddressSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SpaceConfig {
    /// Emits a TRACE event for every read and write.
    pub trace_accesses: bool,
}

/// Point-in-time copy of an [`AddressSpace`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SpaceSnapshot {
    /// Every written cell in ascending address order.
    pub cells: BTreeMap<Address, Word>,
    /// Number of ticks observed when the snapshot was taken.
    pub ticks: u64,
}

impl SpaceSnapshot {
    /// Returns the value at `addr`, treating unwritten cells as zero.
    #[must_use]
    pub fn value_at(&self, addr: Address) -> Word {
        self.cells.get(&addr).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct Cells {
    values: BTreeMap<Address, Word>,
    ticks: u64,
}

/// Sparse mapping from bus address to value.
///
/// Create one per simulated machine and lend `&AddressSpace` to each device
/// that needs it.
#[derive(Debug, Default)]
pub struct AddressSpace {
    config: SpaceConfig,
    cells: Mutex<Cells>,
}

impl AddressSpace {
    /// Creates an empty address space with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SpaceConfig::default())
    }

    /// Creates an empty address space with the given configuration.
    #[must_use]
    pub fn with_config(config: SpaceConfig) -> Self {
        Self {
            config,
            cells: Mutex::new(Cells::default()),
        }
    }

    /// Returns the configuration this space was created with.
    #[must_use]
    pub const fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Returns the number of ticks observed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.lock().ticks
    }

    /// Returns the number of distinct addresses that have been written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    /// Returns `true` when no address has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().values.is_empty()
    }

    /// Copies every written cell and the tick count.
    #[must_use]
    pub fn snapshot(&self) -> SpaceSnapshot {
        let cells = self.lock();
        SpaceSnapshot {
            cells: cells.values.clone(),
            ticks: cells.ticks,
        }
    }

    // Every update is a single insert or increment, so poisoning never
    // leaves the cells inconsistent.
    fn lock(&self) -> MutexGuard<'_, Cells> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VolatileBus for AddressSpace {
    fn read(&self, addr: Address) -> Word {
        let value = self.lock().values.get(&addr).copied().unwrap_or(0);
        if self.config.trace_accesses {
            trace!("read {addr:#010x} -> {value:#x}");
        }
        value
    }

    fn write(&self, addr: Address, value: Word) {
        let previous = self.lock().values.insert(addr, value);
        if self.config.trace_accesses {
            trace!("write {addr:#010x} <- {value:#x} (was {previous:?})");
        }
    }

    fn tick(&self) {
        let ticks = {
            let mut cells = self.lock();
            cells.ticks = cells.ticks.wrapping_add(1);
            cells.ticks
        };
        trace!(ticks, "bus tick");
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::{AddressSpace, SpaceConfig, SpaceSnapshot};
    use crate::VolatileBus;

    #[test]
    fn fresh_space_reads_zero_everywhere_sampled() {
        let space = AddressSpace::new();
        for addr in [0, 1, 0x4000, 0x4005_2000, u32::MAX] {
            assert_eq!(space.read(addr), 0);
        }
        assert!(space.is_empty());
    }

    #[test]
    fn reads_do_not_allocate_cells() {
        let space = AddressSpace::new();
        let _ = space.read(0x1234);
        assert!(space.is_empty());
        assert_eq!(space.len(), 0);
    }

    #[test]
    fn write_is_visible_to_next_read() {
        let space = AddressSpace::new();
        space.write(0x4000, 0xFFFF);
        assert_eq!(space.read(0x4000), 0xFFFF);
        assert_eq!(space.read(0x4001), 0);
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let space = AddressSpace::new();
        space.write(0x10, 1);
        space.write(0x10, 2);
        space.write(0x10, 3);
        assert_eq!(space.read(0x10), 3);
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn writing_zero_still_counts_as_written() {
        let space = AddressSpace::new();
        space.write(0x20, 0);
        assert_eq!(space.read(0x20), 0);
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn tick_counts_without_touching_cells() {
        let space = AddressSpace::new();
        space.write(0x40, 0xAA);
        let before = space.snapshot();

        space.tick();
        space.tick();

        let after = space.snapshot();
        assert_eq!(after.ticks, before.ticks + 2);
        assert_eq!(after.cells, before.cells);
        assert_eq!(space.ticks(), 2);
    }

    #[test]
    fn snapshot_lists_cells_in_address_order() {
        let space = AddressSpace::new();
        space.write(0x30, 3);
        space.write(0x10, 1);
        space.write(0x20, 2);

        let snapshot = space.snapshot();
        let addrs: Vec<u32> = snapshot.cells.keys().copied().collect();
        assert_eq!(addrs, vec![0x10, 0x20, 0x30]);
        assert_eq!(snapshot.value_at(0x20), 2);
        assert_eq!(snapshot.value_at(0x21), 0);
    }

    #[test]
    fn default_snapshot_is_empty_with_no_ticks() {
        let snapshot = AddressSpace::default().snapshot();
        assert_eq!(snapshot, SpaceSnapshot::default());
    }

    #[test]
    fn traced_space_behaves_like_untraced_space() {
        let space = AddressSpace::with_config(SpaceConfig {
            trace_accesses: true,
        });
        assert!(space.config().trace_accesses);
        space.write(0x8, 0x55);
        assert_eq!(space.read(0x8), 0x55);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let space = AddressSpace::new();
        space.write(0x100, 7);

        let joined = thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = space.lock();
                    panic!("poison the address space lock");
                })
                .join()
        });
        assert!(joined.is_err());

        assert_eq!(space.read(0x100), 7);
        space.write(0x100, 8);
        assert_eq!(space.read(0x100), 8);
    }
}
