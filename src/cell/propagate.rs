/*!
propagate.rs - Wave / copy protocol, run when a cell fetches the bookend.

State lives in the accumulator:

```text
WAVE    -> COPY (one-tick latch)
COPY    -> acc = snapshot[bus[origin]], plus the load side effect
other   -> join the wave if any bus line reads WAVE, else pc += 1
```

Because the latch takes one tick and COPY adopts the origin's value, a
protocol cell replays its origin's accumulator one tick late. A source that
repeats `WAVE, filler, byte` therefore streams one byte per three ticks
through every reached cell.
*/

use tracing::trace;

use crate::bus::snapshot::SnapshotView;
use crate::bus::topology::{Direction, NodeId};
use crate::cell::state::{COPY, Cell, LOC_ACC, LoadPhase, MEM_SIZE, ProtocolState, WAVE};

pub(crate) fn update(cell: &mut Cell, view: SnapshotView<'_>, id: NodeId) {
    match ProtocolState::of(cell.accumulator()) {
        ProtocolState::Wave => cell.mem[LOC_ACC] = COPY,
        ProtocolState::Copy => copy_byte(cell, view, id),
        ProtocolState::Normal => scan_for_wave(cell, view),
    }
}

fn copy_byte(cell: &mut Cell, view: SnapshotView<'_>, id: NodeId) {
    let source = cell.bus[cell.wave_origin.index()];
    let value = view.read(source);
    trace!(cell = %id, source = %source, value, "copy");

    cell.mem[LOC_ACC] = value;
    let pc = cell.pc();
    match cell.load_phase {
        LoadPhase::Idle => {}
        LoadPhase::LocalMemory => {
            if (pc as usize) < MEM_SIZE {
                cell.mem[pc as usize] = value;
            }
            cell.advance_pc();
        }
        LoadPhase::InstructionTable { high } => {
            cell.isa.write_half(pc, high, value);
            if high {
                cell.advance_pc();
            }
            cell.load_phase = LoadPhase::InstructionTable { high: !high };
        }
    }
}

fn scan_for_wave(cell: &mut Cell, view: SnapshotView<'_>) {
    let origin = Direction::ALL
        .into_iter()
        .find(|d| view.read(cell.bus[d.index()]) == WAVE);
    match origin {
        Some(dir) => {
            cell.wave_origin = dir;
            cell.mem[LOC_ACC] = WAVE;
        }
        None => cell.advance_pc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::ports::{Port, PortBank};
    use crate::bus::snapshot::SnapshotBus;
    use crate::bus::topology::neighborhood;
    use crate::cell::isa::Instruction;
    use crate::test_utils::fresh_cells;

    const ROW: usize = 6;
    const COL: usize = 0;

    /// Snapshot where the left port of `ROW` holds `value` and every cell
    /// holds its fresh accumulator.
    fn port_snapshot(value: u8) -> SnapshotBus {
        let mut ports = PortBank::new();
        ports.set(Port::new(Direction::Left, ROW), value);
        let mut snap = SnapshotBus::new();
        snap.capture(&fresh_cells(), &ports);
        snap
    }

    fn cell() -> (Cell, NodeId) {
        (Cell::new(neighborhood(ROW, COL)), NodeId::at(ROW, COL))
    }

    #[test]
    fn wave_latches_to_copy() {
        let (mut c, id) = cell();
        c.set_accumulator(WAVE);
        update(&mut c, port_snapshot(0).view(), id);
        assert_eq!(c.accumulator(), COPY);
        assert_eq!(c.pc(), 2);
    }

    #[test]
    fn normal_joins_first_wave_direction() {
        let mut cells = fresh_cells();
        let (mut c, id) = cell();
        // Down neighbor and left port both read WAVE; Down comes first.
        cells[(ROW + 1) * 16 + COL].set_accumulator(WAVE);
        let mut ports = PortBank::new();
        ports.set(Port::new(Direction::Left, ROW), WAVE);
        let mut snap = SnapshotBus::new();
        snap.capture(&cells, &ports);

        update(&mut c, snap.view(), id);
        assert_eq!(c.accumulator(), WAVE);
        assert_eq!(c.wave_origin(), Direction::Down);
        assert_eq!(c.pc(), 2);
    }

    #[test]
    fn normal_without_wave_advances_pc() {
        let (mut c, id) = cell();
        c.set_accumulator(0x12);
        update(&mut c, port_snapshot(COPY).view(), id);
        assert_eq!(c.accumulator(), 0x12);
        assert_eq!(c.pc(), 3);
    }

    #[test]
    fn copy_into_local_memory() {
        let (mut c, id) = cell();
        c.set_accumulator(COPY);
        c.set_wave_origin(Direction::Left);
        c.set_pc(17);
        update(&mut c, port_snapshot(0x5A).view(), id);
        assert_eq!(c.accumulator(), 0x5A);
        assert_eq!(c.read(17), Some(0x5A));
        assert_eq!(c.pc(), 18);
    }

    #[test]
    fn copy_past_memory_still_advances_pc() {
        let (mut c, id) = cell();
        c.set_accumulator(COPY);
        c.set_wave_origin(Direction::Left);
        c.set_pc(252);
        let before = *c.memory();
        update(&mut c, port_snapshot(0x5A).view(), id);
        assert_eq!(c.pc(), 253);
        assert_eq!(&c.memory()[2..], &before[2..]);
    }

    #[test]
    fn copy_into_instruction_table_halves() {
        let (mut c, id) = cell();
        c.set_wave_origin(Direction::Left);
        c.set_load_phase(LoadPhase::InstructionTable { high: false });
        c.set_pc(9);

        c.set_accumulator(COPY);
        update(&mut c, port_snapshot(0x21).view(), id);
        assert_eq!(c.pc(), 9);
        assert_eq!(c.load_phase(), LoadPhase::InstructionTable { high: true });

        c.set_accumulator(COPY);
        update(&mut c, port_snapshot(0x43).view(), id);
        assert_eq!(c.pc(), 10);
        assert_eq!(c.instruction(9), Instruction::new(0x21, 0x43));
        assert_eq!(c.load_phase(), LoadPhase::InstructionTable { high: false });
    }

    #[test]
    fn idle_phase_only_relays() {
        let (mut c, id) = cell();
        c.set_accumulator(COPY);
        c.set_wave_origin(Direction::Left);
        c.set_load_phase(LoadPhase::Idle);
        let before = c.clone();
        update(&mut c, port_snapshot(0x33).view(), id);
        assert_eq!(c.accumulator(), 0x33);
        assert_eq!(c.pc(), before.pc());
        assert_eq!(&c.memory()[2..], &before.memory()[2..]);
        assert_eq!(c.instructions(), before.instructions());
    }

    #[test]
    fn copy_reads_origin_line_only() {
        let mut cells = fresh_cells();
        cells[NodeId::at(ROW, 1).index()].set_accumulator(0x11);
        let mut ports = PortBank::new();
        ports.set(Port::new(Direction::Left, ROW), 0x22);
        let mut snap = SnapshotBus::new();
        snap.capture(&cells, &ports);

        let (mut c, id) = cell();
        c.set_accumulator(COPY);
        c.set_wave_origin(Direction::Right);
        update(&mut c, snap.view(), id);
        assert_eq!(c.accumulator(), 0x11);
    }
}
