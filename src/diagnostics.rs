/*!
Operator diagnostics: which cells are mid-propagation.

A cell is counted only when its next fetch is the bookend, i.e. when the
accumulator is actually being interpreted as a protocol tag. A program that
happens to hold 0xFF in its accumulator while executing is not a wave.

`Listing` formats the per-cell positions for the tick's debug event.
*/

use std::fmt;

use crate::bus::topology::NodeId;
use crate::cell::{Cell, ProtocolState};

/// Counts of cells in each transient protocol state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StateCensus {
    pub wave: usize,
    pub copy: usize,
}

impl StateCensus {
    pub fn take(cells: &[Cell]) -> Self {
        cells
            .iter()
            .filter(|c| c.in_protocol())
            .fold(Self::default(), |mut acc, c| {
                match c.protocol_state() {
                    ProtocolState::Wave => acc.wave += 1,
                    ProtocolState::Copy => acc.copy += 1,
                    ProtocolState::Normal => {}
                }
                acc
            })
    }

    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.wave == 0 && self.copy == 0
    }
}

/// Every cell currently in WAVE or COPY, in id order.
pub fn protocol_cells(cells: &[Cell]) -> Vec<(NodeId, ProtocolState)> {
    cells
        .iter()
        .enumerate()
        .filter(|(_, c)| c.in_protocol())
        .filter_map(|(i, c)| match c.protocol_state() {
            ProtocolState::Normal => None,
            s => Some((NodeId::cell(i), s)),
        })
        .collect()
}

/// Display adapter for `protocol_cells` output: `wave cell(0,1), copy cell(0,0)`.
pub struct Listing<'a>(pub &'a [(NodeId, ProtocolState)]);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, (id, state)) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            let tag = match state {
                ProtocolState::Wave => "wave",
                ProtocolState::Copy => "copy",
                ProtocolState::Normal => "normal",
            };
            write!(f, "{tag} {id}")?;
        }
        Ok(())
    }
}
