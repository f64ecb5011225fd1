/*!
topology.rs - Lattice geometry and neighbor resolution.

Id space
========
All addressable nodes share one flat id space:

```text
0 .. 256     interior cells, row-major (`row * 16 + col`)
256 .. 320   boundary ports, one strip of 16 per side
```

A port id is `CELL_COUNT + side * GRID_SIDE + position`, where `side` is the
direction that leaves the grid (up=0, right=1, down=2, left=3) and
`position` is the column for the up/down strips and the row for the
left/right strips.

`resolve` is pure. The grid calls it once per cell per direction at
initialization and caches the result in the cell's bus.
*/

/// Lattice edge length.
pub const GRID_SIDE: usize = 16;
/// Number of interior cells.
pub const CELL_COUNT: usize = GRID_SIDE * GRID_SIDE;
/// Number of boundary ports (one strip per side).
pub const PORT_COUNT: usize = 4 * GRID_SIDE;
/// Size of the shared node id space (cells followed by ports).
pub const NODE_COUNT: usize = CELL_COUNT + PORT_COUNT;

/// One of the four bus directions. Also names a port strip side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Direction {
    #[default]
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// Scan order used everywhere a direction list is walked.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    /// (row delta, column delta)
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// Identifier of a cell or port in the shared id space.
///
/// Construction is checked, so every `NodeId` in circulation indexes the
/// snapshot bus in bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u16);

impl NodeId {
    /// Wrap a raw id, rejecting anything outside the node id space.
    #[inline]
    pub fn from_raw(raw: u16) -> Option<Self> {
        ((raw as usize) < NODE_COUNT).then_some(Self(raw))
    }

    /// Id of the interior cell at `index` (row-major).
    ///
    /// Panics if `index >= CELL_COUNT`.
    #[inline]
    pub fn cell(index: usize) -> Self {
        assert!(index < CELL_COUNT, "cell index {index} out of range");
        Self(index as u16)
    }

    /// Id of the interior cell at `(row, col)`.
    #[inline]
    pub fn at(row: usize, col: usize) -> Self {
        assert!(row < GRID_SIDE && col < GRID_SIDE, "({row}, {col}) outside the lattice");
        Self::cell(row * GRID_SIDE + col)
    }

    /// Id of the port at `position` along the `side` strip.
    #[inline]
    pub fn port(side: Direction, position: usize) -> Self {
        assert!(position < GRID_SIDE, "port position {position} out of range");
        Self((CELL_COUNT + side.index() * GRID_SIDE + position) as u16)
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_port(self) -> bool {
        self.index() >= CELL_COUNT
    }

    /// `(row, col)` for interior ids, `None` for ports.
    pub fn coords(self) -> Option<(usize, usize)> {
        (!self.is_port()).then(|| (self.index() / GRID_SIDE, self.index() % GRID_SIDE))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coords() {
            Some((row, col)) => write!(f, "cell({row},{col})"),
            None => {
                let p = self.index() - CELL_COUNT;
                write!(f, "port({:?},{})", Direction::ALL[p / GRID_SIDE], p % GRID_SIDE)
            }
        }
    }
}

/// Resolve the node read by the cell at `(row, col)` on bus line `dir`.
///
/// Interior neighbors resolve to their cell id; stepping off the lattice
/// resolves to the port on that side at the in-bounds coordinate.
pub fn resolve(row: usize, col: usize, dir: Direction) -> NodeId {
    assert!(row < GRID_SIDE && col < GRID_SIDE, "({row}, {col}) outside the lattice");
    let (dy, dx) = dir.offset();
    let y = row as isize + dy;
    let x = col as isize + dx;
    let side = GRID_SIDE as isize;

    if y < 0 || y >= side {
        NodeId::port(dir, col)
    } else if x < 0 || x >= side {
        NodeId::port(dir, row)
    } else {
        NodeId::at(y as usize, x as usize)
    }
}

/// Resolve all four bus lines for a cell, in `Direction::ALL` order.
pub fn neighborhood(row: usize, col: usize) -> [NodeId; 4] {
    Direction::ALL.map(|d| resolve(row, col, d))
}
