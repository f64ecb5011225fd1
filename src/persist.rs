/*!
Grid snapshot files: a fixed-size binary image of every cell.

Layout
- Cells in id order (row-major), one `CELL_RECORD_LEN`-byte record each:
    0..512     instruction table, `(target, jump)` per slot
    512..762   local memory (pc at 512, accumulator at 513)
    762..770   bus lines, four little-endian `u16` node ids (up/right/down/left)
    770        wave origin (direction index 0..=3)
    771        load phase (0 idle, 1 memory, 2 table low, 3 table high)
- No header and no trailer; the file length must be exactly
  `CELL_COUNT * CELL_RECORD_LEN`.

Ports, the snapshot bus and the generation counter are not stored: a
restored grid starts with a zeroed port ring at generation 0.

Validation
- Every bus id must be below `NODE_COUNT`, and every direction and phase
  byte must decode. Anything else is rejected before a grid is built.
*/

use std::fs;
use std::path::Path;

use tracing::info;

use crate::bus::topology::{CELL_COUNT, Direction, NODE_COUNT, NodeId};
use crate::cell::{BUS_WIDTH, Cell, ISA_SIZE, Instruction, InstructionTable, LoadPhase, MEM_SIZE};
use crate::error::{GridError, Result};
use crate::grid::Grid;

const TABLE_LEN: usize = ISA_SIZE * 2;
const BUS_LEN: usize = BUS_WIDTH * 2;

const MEM_OFFSET: usize = TABLE_LEN;
const BUS_OFFSET: usize = MEM_OFFSET + MEM_SIZE;
const ORIGIN_OFFSET: usize = BUS_OFFSET + BUS_LEN;
const PHASE_OFFSET: usize = ORIGIN_OFFSET + 1;

/// Bytes per cell record.
pub const CELL_RECORD_LEN: usize = PHASE_OFFSET + 1;
/// Bytes in a complete grid snapshot.
pub const SNAPSHOT_LEN: usize = CELL_COUNT * CELL_RECORD_LEN;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn encode_cell(cell: &Cell, out: &mut Vec<u8>) {
    for ins in cell.instructions().as_slice() {
        out.push(ins.target);
        out.push(ins.jump);
    }
    out.extend_from_slice(cell.memory());
    for id in cell.bus() {
        out.extend_from_slice(&id.raw().to_le_bytes());
    }
    out.push(cell.wave_origin().index() as u8);
    out.push(cell.load_phase().to_byte());
}

/// Serialize every cell of `grid` into a snapshot blob.
pub fn encode(grid: &Grid) -> Vec<u8> {
    let mut out = Vec::with_capacity(SNAPSHOT_LEN);
    for cell in grid.cells() {
        encode_cell(cell, &mut out);
    }
    debug_assert_eq!(out.len(), SNAPSHOT_LEN);
    out
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn decode_cell(index: usize, rec: &[u8]) -> Result<Cell> {
    let mut isa = InstructionTable::new();
    for (slot, pair) in rec[..TABLE_LEN].chunks_exact(2).enumerate() {
        isa.set(slot as u8, Instruction::new(pair[0], pair[1]));
    }

    let mut mem = [0u8; MEM_SIZE];
    mem.copy_from_slice(&rec[MEM_OFFSET..BUS_OFFSET]);

    let mut bus = [NodeId::cell(0); BUS_WIDTH];
    for (line, raw) in rec[BUS_OFFSET..ORIGIN_OFFSET].chunks_exact(2).enumerate() {
        let node = u16::from_le_bytes([raw[0], raw[1]]);
        bus[line] = NodeId::from_raw(node).ok_or(GridError::NodeOutOfRange {
            cell: index,
            line,
            node,
            limit: NODE_COUNT,
        })?;
    }

    let origin_byte = rec[ORIGIN_OFFSET];
    let wave_origin = Direction::from_index(origin_byte).ok_or(GridError::InvalidDirection {
        cell: index,
        value: origin_byte,
    })?;

    let phase_byte = rec[PHASE_OFFSET];
    let load_phase = LoadPhase::from_byte(phase_byte).ok_or(GridError::InvalidLoadPhase {
        cell: index,
        value: phase_byte,
    })?;

    Ok(Cell::from_parts(isa, mem, bus, wave_origin, load_phase))
}

/// Rebuild a grid from a snapshot blob.
pub fn decode(data: &[u8]) -> Result<Grid> {
    if data.len() != SNAPSHOT_LEN {
        return Err(GridError::SizeMismatch {
            expected: SNAPSHOT_LEN,
            actual: data.len(),
        });
    }
    let cells = data
        .chunks_exact(CELL_RECORD_LEN)
        .enumerate()
        .map(|(i, rec)| decode_cell(i, rec))
        .collect::<Result<Vec<_>>>()?;
    Ok(Grid::from_cells(cells))
}

// -------------- File helpers --------------

/// Read and validate a snapshot file.
pub fn load(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| GridError::io(path, e))?;
    let grid = decode(&data)?;
    info!(path = %path.display(), bytes = data.len(), "loaded grid");
    Ok(grid)
}

/// Write `grid` to `path`, replacing any existing file.
pub fn save(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = encode(grid);
    fs::write(path, &data).map_err(|e| GridError::io(path, e))?;
    info!(
        path = %path.display(),
        bytes = data.len(),
        generation = grid.generation(),
        "saved grid"
    );
    Ok(())
}
