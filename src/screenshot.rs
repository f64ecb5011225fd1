/*!
Accumulator field dumps (feature `screenshot`).

The image is `GRID_SIDE + 2` pixels square: the interior cells in the
middle, the port ring around them, and black corners. Each pixel is the
node's current accumulator as an 8-bit gray level, so waves (0xFF) show up
white and copies (0xFE) nearly white.
*/

use std::path::Path;

use image::{GrayImage, Luma};
use tracing::info;

use crate::bus::ports::Port;
use crate::bus::topology::{Direction, GRID_SIDE};
use crate::error::Result;
use crate::grid::Grid;

/// Side length of the rendered image in pixels.
pub const IMAGE_SIDE: u32 = GRID_SIDE as u32 + 2;

fn pixel(grid: &Grid, x: u32, y: u32) -> u8 {
    let last = IMAGE_SIDE - 1;
    let edge = |v: u32| v == 0 || v == last;
    // Interior coordinate of a non-edge pixel.
    let inner = |v: u32| v as usize - 1;

    if edge(x) && edge(y) {
        0
    } else if y == 0 {
        grid.port(Port::new(Direction::Up, inner(x)))
    } else if y == last {
        grid.port(Port::new(Direction::Down, inner(x)))
    } else if x == 0 {
        grid.port(Port::new(Direction::Left, inner(y)))
    } else if x == last {
        grid.port(Port::new(Direction::Right, inner(y)))
    } else {
        grid.accumulator(inner(y), inner(x))
    }
}

/// Render the accumulator field of `grid`.
pub fn render(grid: &Grid) -> GrayImage {
    GrayImage::from_fn(IMAGE_SIDE, IMAGE_SIDE, |x, y| Luma([pixel(grid, x, y)]))
}

/// Render `grid` and write it as a PNG.
pub fn save_png(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    render(grid).save(path)?;
    info!(path = %path.display(), generation = grid.generation(), "wrote screenshot");
    Ok(())
}
