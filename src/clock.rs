/*!
Clock/scheduler for lattice generations.

Purpose
- Centralize the order of operations for one generation:
  * Capture every cell and port accumulator into the snapshot bus
  * Step every interior cell exactly once against that snapshot
  * Bump the generation counter and report the protocol census

Ordering guarantee
- The snapshot is rebuilt strictly before any cell runs and is only borrowed
  immutably while they run, so no cell can observe a sibling's current-tick
  state. Cell order is therefore irrelevant: sequential and parallel modes
  produce identical grids.

Stopping
- There is nothing to clean up between ticks; `run_until` simply checks a
  flag before each generation.
*/

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::debug;

use crate::bus::topology::NodeId;
use crate::diagnostics::{Listing, StateCensus};
use crate::grid::Grid;

/// How cells are fanned out within a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Row-major, on the calling thread.
    Sequential,
    /// Across the rayon thread pool.
    #[default]
    Parallel,
}

/// Summary of one completed generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Generation number after the tick (1 for the first tick).
    pub generation: u64,
    /// Protocol census of the grid after the tick.
    pub census: StateCensus,
}

/// Run one full generation.
pub fn tick(grid: &mut Grid, mode: ExecutionMode) -> TickReport {
    // 1) Global shutter.
    grid.snapshot.capture(&grid.cells, &grid.ports);

    // 2) Every cell against the same read-only view.
    let view = grid.snapshot.view();
    match mode {
        ExecutionMode::Sequential => {
            for (i, cell) in grid.cells.iter_mut().enumerate() {
                cell.step(view, NodeId::cell(i));
            }
        }
        ExecutionMode::Parallel => {
            grid.cells
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, cell)| {
                    cell.step(view, NodeId::cell(i));
                });
        }
    }

    // 3) Bookkeeping.
    grid.generation = grid.generation.wrapping_add(1);
    let census = grid.census();
    if !census.is_quiet() {
        debug!(
            generation = grid.generation,
            wave = census.wave,
            copy = census.copy,
            cells = %Listing(&grid.protocol_cells()),
            "protocol activity"
        );
    }
    TickReport {
        generation: grid.generation,
        census,
    }
}

/// Drives a grid for many generations with a fixed execution mode.
#[derive(Copy, Clone, Debug, Default)]
pub struct Scheduler {
    mode: ExecutionMode,
}

impl Scheduler {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[inline]
    pub fn run_one_tick(&self, grid: &mut Grid) -> TickReport {
        tick(grid, self.mode)
    }

    /// Run exactly `ticks` generations.
    pub fn run_for(&self, grid: &mut Grid, ticks: u64) {
        for _ in 0..ticks {
            tick(grid, self.mode);
        }
    }

    /// Run until `stop` is set or `limit` generations have run, whichever
    /// comes first. Returns the number of generations executed.
    pub fn run_until(&self, grid: &mut Grid, stop: &AtomicBool, limit: Option<u64>) -> u64 {
        let mut ran = 0u64;
        while !stop.load(Ordering::Relaxed) && limit.is_none_or(|l| ran < l) {
            tick(grid, self.mode);
            ran += 1;
        }
        ran
    }
}
