/*!
cell - One processing element of the lattice.

```text
state.rs      - `Cell` (memory, table, bus, protocol flags) + constants.
isa.rs        - `Instruction` pair and the 256-slot `InstructionTable`.
execute.rs    - The subleq primitive and target decoding.
dispatch.rs   - Per-tick fetch, macro-instruction chaining, bookend hand-off.
propagate.rs  - Wave / copy protocol.
```

Cells only read other nodes through a `SnapshotView`; everything they write
is their own state. `Cell::step` is the single entry point used by the
scheduler.

Usage:
```rust
use grobblebox::bus::{SnapshotBus, NodeId, neighborhood};
use grobblebox::cell::Cell;

let snapshot = SnapshotBus::new();
let mut cell = Cell::new(neighborhood(0, 0));
cell.step(snapshot.view(), NodeId::at(0, 0));
```
*/

pub mod dispatch;
pub(crate) mod execute;
pub mod isa;
pub(crate) mod propagate;
pub mod state;

pub use dispatch::StepOutcome;
pub use isa::{Instruction, InstructionTable};
pub use state::{
    BOOKEND, BUS_BASE, BUS_WIDTH, COPY, Cell, EMPTY, FIRST_EXEC_ADDR, ISA_SIZE, LOC_ACC, LOC_PC,
    LoadPhase, MEM_SIZE, ProtocolState, WAVE,
};
