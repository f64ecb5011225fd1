#![doc = r#"
Grobblebox library crate.

A 16x16 lattice of byte-wide cells running in lock-step. Each cell executes
one subleq macro-instruction per tick against a start-of-tick snapshot of
its neighbors, and drops into a wave/copy protocol when it fetches the
bookend. A ring of 64 ports surrounds the lattice and is driven externally.

Modules:
- bus: node ids and neighbor resolution, boundary ports, the snapshot bus
- cell: per-cell state, instruction table, subleq execution, wave/copy protocol
- clock: one-generation tick and the sequential/parallel scheduler
- diagnostics: census of cells currently propagating
- error: `GridError` for snapshot files and restored-state validation
- grid: the lattice facade (cells + ports + snapshot + generation)
- persist: fixed-layout binary snapshot files
- screenshot (feature `screenshot`): grayscale PNG of the accumulator field

In tests, program and port-driving helpers are available under
`crate::test_utils`.
"#]

// Core modules
pub mod bus;
pub mod cell;
pub mod clock;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod persist;

#[cfg(feature = "screenshot")]
pub mod screenshot;

// Re-export commonly used types at the crate root for convenience.
pub use bus::{Direction, NodeId, Port};
pub use cell::{Cell, Instruction, LoadPhase};
pub use clock::{ExecutionMode, Scheduler, TickReport};
pub use diagnostics::StateCensus;
pub use error::{GridError, Result};
pub use grid::Grid;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
