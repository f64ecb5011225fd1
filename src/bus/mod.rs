#![doc = r#"
Bus module: everything a cell can read that it does not own.

Modules and responsibilities
- topology: node id space, directions, and the pure neighbor resolver used to
  build each cell's four-line bus at initialization.
- ports: the boundary ring of externally driven pseudo-cells.
- snapshot: the per-tick copy of every accumulator, plus the read-only view
  passed to executing cells.

Cells never hold a reference to another cell. A bus line is a `NodeId`; its
value is whatever the snapshot recorded at the start of the current tick.
"#]

/// Node ids, directions and neighbor resolution.
pub mod topology;

/// Boundary port addressing and storage.
pub mod ports;

/// Start-of-tick accumulator snapshot and its read-only view.
pub mod snapshot;

pub use ports::{Port, PortBank};
pub use snapshot::{SnapshotBus, SnapshotView};
pub use topology::{
    CELL_COUNT, Direction, GRID_SIDE, NODE_COUNT, NodeId, PORT_COUNT, neighborhood, resolve,
};
