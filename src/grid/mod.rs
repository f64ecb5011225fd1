/*!
Grid: the lattice facade owning every cell, the port ring and the snapshot.

Overview
- `Grid::new` / `initialize` build fresh state: each cell's bus is resolved
  once from the topology and never changes afterwards.
- `run_one_tick` delegates to `clock::tick` (snapshot, then every cell).
- Ports, wave injection and load-phase setters are the environment's
  handles; call them between ticks only.

Restored grids (see `persist`) are built with `from_cells` and start with a
zeroed port ring, a zeroed snapshot and generation 0.
*/

use tracing::info;

use crate::bus::ports::{Port, PortBank};
use crate::bus::snapshot::SnapshotBus;
use crate::bus::topology::{CELL_COUNT, Direction, GRID_SIDE, NodeId, neighborhood};
use crate::cell::{Cell, LoadPhase, WAVE};
use crate::clock::{self, ExecutionMode, TickReport};
use crate::diagnostics::{self, StateCensus};

pub struct Grid {
    pub(crate) cells: Vec<Cell>,
    pub(crate) ports: PortBank,
    pub(crate) snapshot: SnapshotBus,
    pub(crate) generation: u64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("side", &GRID_SIDE)
            .field("generation", &self.generation)
            .field("census", &self.census())
            .finish()
    }
}

impl Grid {
    // -------------- Construction --------------

    /// Fresh, zero-initialized grid.
    pub fn new() -> Self {
        let grid = Self::from_cells(fresh_cells());
        info!(cells = CELL_COUNT, "initialized fresh grid");
        grid
    }

    /// Reset every cell, port and counter to the fresh state.
    pub fn initialize(&mut self) {
        *self = Self::new();
    }

    /// Wrap already-validated cells (exactly `CELL_COUNT`, id order).
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), CELL_COUNT, "grid needs exactly {CELL_COUNT} cells");
        Self {
            cells,
            ports: PortBank::new(),
            snapshot: SnapshotBus::new(),
            generation: 0,
        }
    }

    // -------------- Stepping --------------

    /// Run one generation with the default (parallel) scheduler.
    pub fn run_one_tick(&mut self) -> TickReport {
        clock::tick(self, ExecutionMode::default())
    }

    /// Number of completed ticks since construction or restore.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -------------- Cell access --------------

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[NodeId::at(row, col).index()]
    }

    #[inline]
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[NodeId::at(row, col).index()]
    }

    #[inline]
    pub fn accumulator(&self, row: usize, col: usize) -> u8 {
        self.cell(row, col).accumulator()
    }

    /// Operator wave injection: the cell joins a wave as if its `origin`
    /// neighbor had been in WAVE.
    ///
    /// `origin` should name a port or a node that will not echo the wave.
    /// An interior origin joins the wave next tick, and the two cells then
    /// copy WAVE/COPY back and forth indefinitely.
    pub fn force_wave(&mut self, row: usize, col: usize, origin: Direction) {
        let cell = self.cell_mut(row, col);
        cell.set_accumulator(WAVE);
        cell.set_wave_origin(origin);
    }

    pub fn set_load_phase_all(&mut self, phase: LoadPhase) {
        for cell in &mut self.cells {
            cell.set_load_phase(phase);
        }
    }

    // -------------- Ports --------------

    #[inline]
    pub fn port(&self, port: Port) -> u8 {
        self.ports.get(port)
    }

    #[inline]
    pub fn set_port(&mut self, port: Port, value: u8) {
        self.ports.set(port, value);
    }

    /// All 64 port values, in port-id order (up, right, down, left strips).
    #[inline]
    pub fn port_values(&self) -> &[u8] {
        self.ports.as_slice()
    }

    // -------------- Diagnostics --------------

    /// Snapshot captured at the start of the most recent tick.
    #[inline]
    pub fn snapshot(&self) -> &SnapshotBus {
        &self.snapshot
    }

    pub fn census(&self) -> StateCensus {
        StateCensus::take(&self.cells)
    }

    pub fn protocol_cells(&self) -> Vec<(NodeId, crate::cell::ProtocolState)> {
        diagnostics::protocol_cells(&self.cells)
    }
}

/// All cells in fresh state, buses resolved from the topology.
pub(crate) fn fresh_cells() -> Vec<Cell> {
    (0..CELL_COUNT)
        .map(|i| Cell::new(neighborhood(i / GRID_SIDE, i % GRID_SIDE)))
        .collect()
}
