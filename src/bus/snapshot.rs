/*!
snapshot.rs - The tick-scoped "global shutter" over every accumulator.

At the start of a tick the scheduler copies each cell's and port's
accumulator into `SnapshotBus`. During the tick cells only see it through
`SnapshotView`, a `Copy` read-only borrow, so no cell can observe another
cell's in-progress state. The buffer is sized to the full node id space,
ports included.
*/

use crate::bus::ports::PortBank;
use crate::bus::topology::{CELL_COUNT, NODE_COUNT, NodeId};
use crate::cell::Cell;

/// Owned buffer of last tick's accumulator values, indexed by `NodeId`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotBus {
    values: [u8; NODE_COUNT],
}

impl Default for SnapshotBus {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBus {
    #[inline]
    pub fn new() -> Self {
        Self {
            values: [0; NODE_COUNT],
        }
    }

    /// Rebuild the whole buffer from live state. Called once per tick,
    /// strictly before any cell executes.
    pub fn capture(&mut self, cells: &[Cell], ports: &PortBank) {
        debug_assert_eq!(cells.len(), CELL_COUNT);
        let (interior, ring) = self.values.split_at_mut(CELL_COUNT);
        for (slot, cell) in interior.iter_mut().zip(cells) {
            *slot = cell.accumulator();
        }
        ring.copy_from_slice(ports.as_slice());
    }

    #[inline]
    pub fn view(&self) -> SnapshotView<'_> {
        SnapshotView {
            values: &self.values,
        }
    }

    #[inline]
    pub fn read(&self, id: NodeId) -> u8 {
        self.values[id.index()]
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}

/// Read-only view handed to each cell while it executes.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotView<'a> {
    values: &'a [u8; NODE_COUNT],
}

impl<'a> SnapshotView<'a> {
    #[inline]
    pub fn read(self, id: NodeId) -> u8 {
        self.values[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::ports::Port;
    use crate::bus::topology::Direction;
    use crate::test_utils::fresh_cells;

    #[test]
    fn capture_covers_cells_and_ports() {
        let mut cells = fresh_cells();
        cells[17].set_accumulator(9);
        let mut ports = PortBank::new();
        let port = Port::new(Direction::Down, 15);
        ports.set(port, 0x33);

        let mut snap = SnapshotBus::new();
        snap.capture(&cells, &ports);
        assert_eq!(snap.read(NodeId::cell(17)), 9);
        assert_eq!(snap.view().read(port.id()), 0x33);
    }

    #[test]
    fn highest_port_id_fits() {
        let last = Port::new(Direction::Left, 15);
        assert_eq!(last.id().index(), NODE_COUNT - 1);
        let mut ports = PortBank::new();
        ports.set(last, 0xAB);
        let mut snap = SnapshotBus::new();
        snap.capture(&fresh_cells(), &ports);
        assert_eq!(snap.read(last.id()), 0xAB);
    }

    #[test]
    fn capture_is_a_copy() {
        let mut cells = fresh_cells();
        let ports = PortBank::new();
        let mut snap = SnapshotBus::new();
        cells[0].set_accumulator(1);
        snap.capture(&cells, &ports);
        cells[0].set_accumulator(2);
        assert_eq!(snap.read(NodeId::cell(0)), 1);
    }
}
