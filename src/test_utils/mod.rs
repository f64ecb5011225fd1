//! Shared test helpers for building cell programs and driving ports.
//!
//! These intentionally cover just what the test suite needs: placing a
//! macro-instruction chain, building a port payload schedule, and watching
//! cells join a wave.

#![allow(dead_code)]

use crate::bus::ports::Port;
use crate::cell::{COPY, Cell, Instruction, WAVE};
use crate::clock::{ExecutionMode, tick};
use crate::grid::Grid;

pub(crate) use crate::grid::fresh_cells;

/// Byte the port emits between WAVE and a payload byte. Anything that is not
/// a sentinel works.
pub const FILLER: u8 = 0x00;

/// Point `cell` at a macro-instruction: `mem[pc] = slot`, pc set, and the
/// chain written at `slot, slot+2, ...` followed by a terminator.
pub fn load_chain(cell: &mut Cell, pc: u8, slot: u8, chain: &[Instruction]) {
    cell.write(pc, slot);
    cell.set_pc(pc);
    let mut s = slot;
    for ins in chain {
        assert!(!ins.is_terminator(), "chain entries need a non-zero jump target");
        cell.set_instruction(s, *ins);
        s = s.wrapping_add(2);
    }
    cell.set_instruction(s, Instruction::END);
}

/// Expand a payload into the per-tick port schedule `WAVE, FILLER, byte`.
pub fn payload_schedule(payload: &[u8]) -> Vec<u8> {
    assert!(
        payload.iter().all(|&b| b != WAVE && b != COPY),
        "payload bytes must not collide with protocol sentinels"
    );
    payload.iter().flat_map(|&b| [WAVE, FILLER, b]).collect()
}

/// Tracks the first generation at which each watched cell read WAVE, and
/// its program counter at that moment.
#[derive(Debug, Clone)]
pub struct WaveWatch {
    pub cells: Vec<(usize, usize)>,
    pub joined_at: Vec<Option<u64>>,
    pub start_pc: Vec<Option<u8>>,
}

impl WaveWatch {
    pub fn new(cells: &[(usize, usize)]) -> Self {
        Self {
            cells: cells.to_vec(),
            joined_at: vec![None; cells.len()],
            start_pc: vec![None; cells.len()],
        }
    }

    pub fn observe(&mut self, grid: &Grid) {
        for (k, &(row, col)) in self.cells.iter().enumerate() {
            let cell = grid.cell(row, col);
            if self.joined_at[k].is_none() && cell.accumulator() == WAVE {
                self.joined_at[k] = Some(grid.generation());
                self.start_pc[k] = Some(cell.pc());
            }
        }
    }
}

/// Drive `port` with `schedule` (one value per tick, set before the tick's
/// snapshot), then hold it at `FILLER` for `tail` extra ticks.
pub fn drive_port(
    grid: &mut Grid,
    port: Port,
    schedule: &[u8],
    tail: usize,
    mode: ExecutionMode,
    watch: &mut WaveWatch,
) {
    let rest = std::iter::repeat_n(FILLER, tail);
    for value in schedule.iter().copied().chain(rest) {
        grid.set_port(port, value);
        tick(grid, mode);
        watch.observe(grid);
    }
}

/// Program every cell with a deterministic, always-terminating mix of
/// arithmetic chains derived from `seed`. Slots `6, 7 (mod 8)` are
/// terminators, so every chain ends within four primitives.
pub fn seeded_program(grid: &mut Grid, seed: u64) {
    let mut state = seed | 1;
    let mut next = move || {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for cell in grid.cells.iter_mut() {
        for slot in 0..=255u8 {
            let ins = if slot % 8 >= 6 {
                Instruction::END
            } else {
                let r = next();
                let target = match r % 5 {
                    0 => 250 + (r >> 8) as u8 % 4,
                    _ => 2 + (r >> 8) as u8 % 100,
                };
                let jump = 2 + (r >> 16) as u8 % 120;
                Instruction::new(target, jump)
            };
            cell.set_instruction(slot, ins);
        }
        for addr in 2..122u8 {
            // Instruction indices below the bookend; keeps the cell executing.
            cell.write(addr, (next() % 255) as u8);
        }
        for addr in 122..200u8 {
            cell.write(addr, (next() % 200) as u8);
        }
        cell.set_accumulator((next() % 200) as u8);
    }
}
