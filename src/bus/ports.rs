/*!
Boundary ports: the externally driven ring around the lattice.

A port is a pseudo-cell that only owns an accumulator. Cells read it through
the snapshot bus exactly like a neighbor; the environment writes it between
ticks. The engine never writes a port.
*/

use crate::bus::topology::{CELL_COUNT, Direction, GRID_SIDE, NodeId, PORT_COUNT};

/// Address of one boundary port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    pub side: Direction,
    pub position: usize,
}

impl Port {
    /// Panics if `position >= GRID_SIDE`.
    pub fn new(side: Direction, position: usize) -> Self {
        assert!(position < GRID_SIDE, "port position {position} out of range");
        Self { side, position }
    }

    #[inline]
    pub fn id(self) -> NodeId {
        NodeId::port(self.side, self.position)
    }

    /// The interior cell this port faces.
    pub fn facing_cell(self) -> (usize, usize) {
        let last = GRID_SIDE - 1;
        match self.side {
            Direction::Up => (0, self.position),
            Direction::Down => (last, self.position),
            Direction::Left => (self.position, 0),
            Direction::Right => (self.position, last),
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self.id().index() - CELL_COUNT
    }
}

/// Accumulators of every boundary port, indexed in port id order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortBank {
    values: [u8; PORT_COUNT],
}

impl Default for PortBank {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PortBank {
    #[inline]
    pub fn new() -> Self {
        Self {
            values: [0; PORT_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, port: Port) -> u8 {
        self.values[port.slot()]
    }

    #[inline]
    pub fn set(&mut self, port: Port, value: u8) {
        self.values[port.slot()] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}
