#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use regsim_core::{AddressSpace, VolatileBus, Watchdog, WatchdogConfig, WATCHDOG_REGISTERS};

fuzz_target!(|data: &[u8]| {
    let space = AddressSpace::new();
    let mut watchdog = Watchdog::new(&space, WatchdogConfig { base: 0x1000 });
    let mut shadow = BTreeMap::new();

    for chunk in data.chunks_exact(5) {
        let op = chunk[0];
        let addr = u32::from(u16::from_be_bytes([chunk[1], chunk[2]]));
        let value = u32::from(u16::from_be_bytes([chunk[3], chunk[4]]));

        match op % 4 {
            0 => {
                space.write(addr, value);
                shadow.insert(addr, value);
            }
            1 => assert_eq!(space.read(addr), shadow.get(&addr).copied().unwrap_or(0)),
            2 => {
                let descriptor = WATCHDOG_REGISTERS[usize::from(chunk[1]) % WATCHDOG_REGISTERS.len()];
                let _ = watchdog.device().write_register(descriptor.name, value);
                shadow.insert(0x1000 + descriptor.offset, value);
            }
            _ => {
                let before = space.snapshot().cells;
                let _ = watchdog.disable();
                let after = space.snapshot().cells;
                for (addr, value) in &before {
                    if *addr != 0x100E {
                        assert_eq!(after.get(addr), Some(value));
                    }
                }
                shadow = after;
            }
        }
    }

    assert_eq!(space.snapshot().cells, shadow);
});
