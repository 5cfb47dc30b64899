//! The logical pixel grid for a single frame.
//!
//! A [`Grid`] is a square, row-major matrix of [`Color`] cells. Coordinates are
//! signed so primitives can pass through points that fall off the canvas:
//! reads outside `[0, size)` return `None` and writes are silently dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;

/// Grid sizes the editor offers.
pub const SUPPORTED_SIZES: [usize; 4] = [8, 16, 32, 64];

/// Size used when nothing else is configured.
pub const DEFAULT_SIZE: usize = 16;

/// Returns true if `size` is one of [`SUPPORTED_SIZES`].
pub fn is_supported_size(size: usize) -> bool {
    SUPPORTED_SIZES.contains(&size)
}

/// Rejected when building a grid from rows that are not square.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("row {row} has {len} cells, expected {size}")]
    RaggedRow { row: usize, len: usize, size: usize },
}

/// A square matrix of colors, indexed as `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Color>>", into = "Vec<Vec<Color>>")]
pub struct Grid {
    cells: Vec<Vec<Color>>,
}

impl Grid {
    /// Create a `size`×`size` grid of transparent cells.
    pub fn new(size: usize) -> Self {
        Self { cells: vec![vec![Color::Transparent; size]; size] }
    }

    /// Build a grid from explicit rows. Every row must have one cell per row.
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, GridError> {
        let size = rows.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(GridError::RaggedRow { row, len: cells.len(), size });
            }
        }
        Ok(Self { cells: rows })
    }

    /// Number of cells along each axis.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let size = self.size() as i32;
        if x >= 0 && x < size && y >= 0 && y < size {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Color at (x, y), or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|(x, y)| self.cells[y][x])
    }

    /// Write a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some((x, y)) = self.index(x, y) {
            self.cells[y][x] = color;
        }
    }

    /// A new `new_size`×`new_size` grid holding this grid's top-left block.
    ///
    /// Cells in `[0, min(old, new))²` are copied; everything else is
    /// transparent. No scaling is performed.
    ///
    /// ```
    /// use pixelsprite::color::Color;
    /// use pixelsprite::grid::Grid;
    ///
    /// let mut grid = Grid::new(8);
    /// grid.set(7, 7, Color::rgb(255, 0, 0));
    /// let bigger = grid.resized(16);
    /// assert_eq!(bigger.get(7, 7), Some(Color::rgb(255, 0, 0)));
    /// assert_eq!(bigger.get(15, 15), Some(Color::Transparent));
    /// ```
    pub fn resized(&self, new_size: usize) -> Grid {
        let mut out = Grid::new(new_size);
        let keep = self.size().min(new_size);
        for y in 0..keep {
            out.cells[y][..keep].copy_from_slice(&self.cells[y][..keep]);
        }
        out
    }

    pub fn rows(&self) -> &[Vec<Color>] {
        &self.cells
    }

    /// Iterate all cells as `(x, y, color)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, c)| (x as i32, y as i32, *c))
        })
    }

    /// True when every cell is transparent.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(Color::is_transparent)
    }

    /// Opaque colors in first-seen (row-major) order.
    pub fn distinct_colors(&self) -> Vec<Color> {
        let mut seen = HashSet::new();
        self.cells
            .iter()
            .flatten()
            .filter(|c| !c.is_transparent())
            .filter(|c| seen.insert(**c))
            .copied()
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(DEFAULT_SIZE)
    }
}

impl TryFrom<Vec<Vec<Color>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Color>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Color>> {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}
