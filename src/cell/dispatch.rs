/*!
dispatch.rs - One cell, one tick.

Overview
========
1. Fetch the instruction index stored at `mem[pc]` (bookend past memory).
2. Bookend index: hand the whole tick to the propagation protocol.
3. Otherwise run the macro-instruction starting at that slot: execute
   primitives at I, I+2, I+4, ... until one jumps or a terminator slot is
   reached.
4. No jump: `pc += 1`. Jump: pc already holds the target.

A chain that neither jumps nor reaches a terminator never returns. That is
a defect of the loaded program and is not detected here.
*/

use crate::bus::snapshot::SnapshotView;
use crate::bus::topology::NodeId;
use crate::cell::execute::subleq;
use crate::cell::propagate;
use crate::cell::state::{BOOKEND, Cell};

/// How a tick ended for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The propagation protocol ran.
    Protocol,
    /// The chain ran `executed` primitives and fell through to `pc + 1`.
    FellThrough { executed: u16 },
    /// Primitive number `executed` (1-based) jumped.
    Jumped { executed: u16 },
}

pub(crate) fn step(cell: &mut Cell, view: SnapshotView<'_>, id: NodeId) -> StepOutcome {
    let index = cell.fetch_index();
    if index == BOOKEND {
        propagate::update(cell, view, id);
        return StepOutcome::Protocol;
    }

    let mut slot = index;
    let mut executed: u16 = 0;
    loop {
        let ins = cell.isa.get(slot);
        if ins.is_terminator() {
            break;
        }
        executed = executed.wrapping_add(1);
        if subleq(cell, ins, view) {
            return StepOutcome::Jumped { executed };
        }
        slot = slot.wrapping_add(2);
    }

    cell.advance_pc();
    StepOutcome::FellThrough { executed }
}

impl Cell {
    /// Execute one tick of this cell against the start-of-tick snapshot.
    ///
    /// `id` is the cell's own node id (used for tracing only).
    pub fn step(&mut self, view: SnapshotView<'_>, id: NodeId) -> StepOutcome {
        step(self, view, id)
    }
}
