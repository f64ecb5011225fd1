/*!
state.rs - Architectural state of one lattice cell.

Overview
========
`Cell` owns everything a processing element can write: its instruction
table, its local memory (with the program counter and accumulator mapped at
addresses 0 and 1), its resolved bus, and the two propagation flags.
It excludes:
  - neighbor values (read through the snapshot view)
  - execution logic (dispatch / execute / propagate modules)

The accumulator doubles as the propagation state tag. `WAVE` and `COPY` are
taken as sentinels unconditionally, so a program that computes 0xFE or 0xFF
in its accumulator will be read as propagating on the next bookend fetch.
This is a known limitation and is not guarded against.

Memory layout
=============
```text
0        program counter
1        accumulator
2..250   program and scratch bytes (fresh cells: 0xFF)
250..254 bus lines up/right/down/left (targets only, never stored)
```
*/

use crate::bus::topology::{Direction, NodeId};
use crate::cell::isa::{Instruction, InstructionTable};

/// Addressable local memory, including the pc and accumulator bytes.
pub const MEM_SIZE: usize = 250;
/// Instruction table slots.
pub const ISA_SIZE: usize = 256;
/// Bus lines per cell.
pub const BUS_WIDTH: usize = 4;

pub const LOC_PC: usize = 0;
pub const LOC_ACC: usize = 1;
/// Program counter of a freshly initialized cell.
pub const FIRST_EXEC_ADDR: u8 = 2;
/// First primitive target that addresses the bus instead of memory.
pub const BUS_BASE: u8 = MEM_SIZE as u8;

/// Reserved instruction index that hands the tick to the propagation protocol.
pub const BOOKEND: u8 = 0xFF;
/// Accumulator sentinel: joined a wave this tick.
pub const WAVE: u8 = 0xFF;
/// Accumulator sentinel: transmitting / receiving payload.
pub const COPY: u8 = 0xFE;
/// Poison byte for unloaded memory. Equal to `BOOKEND`, so an unloaded cell
/// idles in the propagation protocol.
pub const EMPTY: u8 = 0xFF;

/// What a COPY step writes into the cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    /// Relay only: rebroadcast the payload, write nothing.
    Idle,
    /// Write payload bytes into local memory at the program counter.
    #[default]
    LocalMemory,
    /// Write payload bytes into the instruction table slot at the program
    /// counter; `high` selects the jump half.
    InstructionTable { high: bool },
}

impl LoadPhase {
    pub fn to_byte(self) -> u8 {
        match self {
            LoadPhase::Idle => 0,
            LoadPhase::LocalMemory => 1,
            LoadPhase::InstructionTable { high: false } => 2,
            LoadPhase::InstructionTable { high: true } => 3,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(LoadPhase::Idle),
            1 => Some(LoadPhase::LocalMemory),
            2 => Some(LoadPhase::InstructionTable { high: false }),
            3 => Some(LoadPhase::InstructionTable { high: true }),
            _ => None,
        }
    }
}

/// Propagation state as read from the accumulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    Wave,
    Copy,
    Normal,
}

impl ProtocolState {
    #[inline]
    pub fn of(acc: u8) -> Self {
        match acc {
            WAVE => ProtocolState::Wave,
            COPY => ProtocolState::Copy,
            _ => ProtocolState::Normal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub(crate) isa: InstructionTable,
    pub(crate) mem: [u8; MEM_SIZE],
    pub(crate) bus: [NodeId; BUS_WIDTH],
    pub(crate) wave_origin: Direction,
    pub(crate) load_phase: LoadPhase,
}

impl Cell {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Fresh cell wired to `bus`: pc at the first executable address,
    /// accumulator zero, memory poisoned, table all terminators.
    pub fn new(bus: [NodeId; BUS_WIDTH]) -> Self {
        let mut mem = [EMPTY; MEM_SIZE];
        mem[LOC_PC] = FIRST_EXEC_ADDR;
        mem[LOC_ACC] = 0;
        Self {
            isa: InstructionTable::new(),
            mem,
            bus,
            wave_origin: Direction::Up,
            load_phase: LoadPhase::default(),
        }
    }

    /// Rebuild a cell from persisted parts.
    pub(crate) fn from_parts(
        isa: InstructionTable,
        mem: [u8; MEM_SIZE],
        bus: [NodeId; BUS_WIDTH],
        wave_origin: Direction,
        load_phase: LoadPhase,
    ) -> Self {
        Self {
            isa,
            mem,
            bus,
            wave_origin,
            load_phase,
        }
    }

    // ---------------------------------------------------------------------
    // Registers
    // ---------------------------------------------------------------------
    #[inline]
    pub fn pc(&self) -> u8 {
        self.mem[LOC_PC]
    }
    #[inline]
    pub fn set_pc(&mut self, v: u8) {
        self.mem[LOC_PC] = v;
    }
    #[inline]
    pub fn accumulator(&self) -> u8 {
        self.mem[LOC_ACC]
    }
    #[inline]
    pub fn set_accumulator(&mut self, v: u8) {
        self.mem[LOC_ACC] = v;
    }
    #[inline]
    pub(crate) fn advance_pc(&mut self) {
        self.mem[LOC_PC] = self.mem[LOC_PC].wrapping_add(1);
    }

    // ---------------------------------------------------------------------
    // Memory / table
    // ---------------------------------------------------------------------
    #[inline]
    pub fn memory(&self) -> &[u8; MEM_SIZE] {
        &self.mem
    }

    /// Read a memory byte; `None` past the end of local memory.
    #[inline]
    pub fn read(&self, addr: u8) -> Option<u8> {
        self.mem.get(addr as usize).copied()
    }

    /// Panics if `addr >= MEM_SIZE`.
    #[inline]
    pub fn write(&mut self, addr: u8, v: u8) {
        self.mem[addr as usize] = v;
    }

    /// Instruction index the next tick will fetch. Addresses outside local
    /// memory fetch the bookend.
    #[inline]
    pub fn fetch_index(&self) -> u8 {
        self.read(self.pc()).unwrap_or(BOOKEND)
    }

    #[inline]
    pub fn instruction(&self, index: u8) -> Instruction {
        self.isa.get(index)
    }
    #[inline]
    pub fn set_instruction(&mut self, index: u8, ins: Instruction) {
        self.isa.set(index, ins);
    }
    #[inline]
    pub fn instructions(&self) -> &InstructionTable {
        &self.isa
    }

    // ---------------------------------------------------------------------
    // Bus / protocol flags
    // ---------------------------------------------------------------------
    #[inline]
    pub fn bus(&self) -> &[NodeId; BUS_WIDTH] {
        &self.bus
    }
    #[inline]
    pub fn bus_line(&self, dir: Direction) -> NodeId {
        self.bus[dir.index()]
    }
    #[inline]
    pub fn wave_origin(&self) -> Direction {
        self.wave_origin
    }
    #[inline]
    pub fn set_wave_origin(&mut self, dir: Direction) {
        self.wave_origin = dir;
    }
    #[inline]
    pub fn load_phase(&self) -> LoadPhase {
        self.load_phase
    }
    #[inline]
    pub fn set_load_phase(&mut self, phase: LoadPhase) {
        self.load_phase = phase;
    }

    #[inline]
    pub fn protocol_state(&self) -> ProtocolState {
        ProtocolState::of(self.accumulator())
    }

    /// True when the next tick runs the propagation protocol rather than an
    /// instruction chain.
    #[inline]
    pub fn in_protocol(&self) -> bool {
        self.fetch_index() == BOOKEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::topology::neighborhood;

    #[test]
    fn fresh_cell_defaults() {
        let c = Cell::new(neighborhood(3, 4));
        assert_eq!(c.pc(), FIRST_EXEC_ADDR);
        assert_eq!(c.accumulator(), 0);
        assert!(c.memory()[2..].iter().all(|&b| b == EMPTY));
        assert!(c.in_protocol());
        assert_eq!(c.protocol_state(), ProtocolState::Normal);
        assert_eq!(c.load_phase(), LoadPhase::LocalMemory);
    }

    #[test]
    fn fetch_past_memory_is_bookend() {
        let mut c = Cell::new(neighborhood(0, 0));
        c.set_pc(MEM_SIZE as u8);
        assert_eq!(c.fetch_index(), BOOKEND);
        c.set_pc(0xFF);
        assert_eq!(c.fetch_index(), BOOKEND);
    }

    #[test]
    fn pc_and_acc_live_in_memory() {
        let mut c = Cell::new(neighborhood(0, 0));
        c.write(LOC_PC as u8, 40);
        c.write(LOC_ACC as u8, 7);
        assert_eq!(c.pc(), 40);
        assert_eq!(c.accumulator(), 7);
    }

    #[test]
    fn load_phase_bytes() {
        for b in 0..4 {
            assert_eq!(LoadPhase::from_byte(b).map(LoadPhase::to_byte), Some(b));
        }
        assert_eq!(LoadPhase::from_byte(4), None);
    }
}
