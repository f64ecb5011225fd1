/*!
execute.rs - The single primitive: subtract and branch if non-positive.

```text
target < 250        mem[target] = acc = mem[target] - acc
target in 250..254  acc = snapshot[bus[target - 250]] - acc
target in 254..256  acc = 0 - acc   (unwired bus lines read 0)
```

Bus targets are read-only, so a write degrades to an accumulator-only
update. Arithmetic wraps at 8 bits. The branch test reads the new
accumulator as a signed byte and jumps when it is `<= 0`.
*/

use crate::bus::snapshot::SnapshotView;
use crate::cell::isa::Instruction;
use crate::cell::state::{BUS_BASE, BUS_WIDTH, Cell, LOC_ACC, LOC_PC, MEM_SIZE};

/// Decoded primitive target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    Memory(usize),
    Bus(usize),
    Unwired,
}

#[inline]
pub(crate) fn decode_target(target: u8) -> Operand {
    let t = target as usize;
    if t < MEM_SIZE {
        Operand::Memory(t)
    } else if t - (BUS_BASE as usize) < BUS_WIDTH {
        Operand::Bus(t - BUS_BASE as usize)
    } else {
        Operand::Unwired
    }
}

/// Execute one primitive. Returns true if the branch was taken, in which
/// case the program counter already holds `ins.jump`.
#[inline]
pub(crate) fn subleq(cell: &mut Cell, ins: Instruction, view: SnapshotView<'_>) -> bool {
    let acc = cell.mem[LOC_ACC];
    let result = match decode_target(ins.target) {
        Operand::Memory(addr) => {
            let r = cell.mem[addr].wrapping_sub(acc);
            cell.mem[addr] = r;
            r
        }
        Operand::Bus(line) => view.read(cell.bus[line]).wrapping_sub(acc),
        Operand::Unwired => 0u8.wrapping_sub(acc),
    };
    cell.mem[LOC_ACC] = result;

    if (result as i8) <= 0 {
        cell.mem[LOC_PC] = ins.jump;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::ports::{Port, PortBank};
    use crate::bus::snapshot::SnapshotBus;
    use crate::bus::topology::{Direction, neighborhood};
    use crate::test_utils::fresh_cells;

    #[test]
    fn decode_ranges() {
        assert_eq!(decode_target(0), Operand::Memory(0));
        assert_eq!(decode_target(249), Operand::Memory(249));
        assert_eq!(decode_target(250), Operand::Bus(0));
        assert_eq!(decode_target(253), Operand::Bus(3));
        assert_eq!(decode_target(254), Operand::Unwired);
        assert_eq!(decode_target(255), Operand::Unwired);
    }

    #[test]
    fn memory_target_writes_both() {
        let snap = SnapshotBus::new();
        let mut cell = Cell::new(neighborhood(4, 4));
        cell.write(30, 10);
        cell.set_accumulator(3);
        let jumped = subleq(&mut cell, Instruction::new(30, 99), snap.view());
        assert!(!jumped);
        assert_eq!(cell.read(30), Some(7));
        assert_eq!(cell.accumulator(), 7);
    }

    #[test]
    fn negative_result_jumps() {
        let snap = SnapshotBus::new();
        let mut cell = Cell::new(neighborhood(4, 4));
        cell.write(30, 3);
        cell.set_accumulator(10);
        assert!(subleq(&mut cell, Instruction::new(30, 99), snap.view()));
        assert_eq!(cell.accumulator(), 0xF9);
        assert_eq!(cell.pc(), 99);
    }

    #[test]
    fn bus_target_only_touches_accumulator() {
        let mut ports = PortBank::new();
        let port = Port::new(Direction::Left, 0);
        ports.set(port, 50);
        let mut snap = SnapshotBus::new();
        snap.capture(&fresh_cells(), &ports);

        let mut cell = Cell::new(neighborhood(0, 0));
        let before = *cell.memory();
        cell.set_accumulator(20);
        let line = BUS_BASE + Direction::Left.index() as u8;
        assert!(!subleq(&mut cell, Instruction::new(line, 99), snap.view()));
        assert_eq!(cell.accumulator(), 30);
        assert_eq!(&cell.memory()[2..], &before[2..]);
    }

    #[test]
    fn unwired_line_reads_zero() {
        let snap = SnapshotBus::new();
        let mut cell = Cell::new(neighborhood(1, 1));
        cell.set_accumulator(0x81);
        // 0 - 0x81 = 0x7F, positive
        assert!(!subleq(&mut cell, Instruction::new(254, 99), snap.view()));
        assert_eq!(cell.accumulator(), 0x7F);
    }

    #[test]
    fn targeting_the_accumulator_zeroes_it() {
        let snap = SnapshotBus::new();
        let mut cell = Cell::new(neighborhood(1, 1));
        cell.set_accumulator(42);
        assert!(subleq(&mut cell, Instruction::new(LOC_ACC as u8, 9), snap.view()));
        assert_eq!(cell.accumulator(), 0);
        assert_eq!(cell.pc(), 9);
    }
}
