//! Bitmap import: quantize an arbitrary image down to grid resolution.
//!
//! The source is stretched onto a `size`×`size` surface with nearest-neighbor
//! sampling, then each sample becomes one cell. Samples whose alpha is above
//! [`ALPHA_THRESHOLD`] keep their RGBA value; the rest become transparent.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

use crate::color::Color;
use crate::grid::Grid;

/// Samples with alpha at or below this are treated as empty.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Error type for import operations
#[derive(Debug, Error)]
pub enum ImportError {
    /// The bytes could not be decoded as an image
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// The source file could not be read
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    /// Source image has no pixels
    #[error("image has zero width or height")]
    Empty,
}

/// Downsample `source` to a `size`×`size` grid.
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use pixelsprite::color::Color;
/// use pixelsprite::import::quantize;
///
/// let source = RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 255]));
/// let grid = quantize(&source, 8);
/// assert_eq!(grid.size(), 8);
/// assert!(grid.cells().all(|(_, _, c)| c == Color::rgb(10, 20, 30)));
/// ```
pub fn quantize(source: &RgbaImage, size: usize) -> Grid {
    let mut grid = Grid::new(size);
    if size == 0 || source.width() == 0 || source.height() == 0 {
        return grid;
    }

    let side = size as u32;
    let sampled = image::imageops::resize(source, side, side, FilterType::Nearest);
    for (x, y, pixel) in sampled.enumerate_pixels() {
        if pixel[3] > ALPHA_THRESHOLD {
            grid.set(x as i32, y as i32, Color::from_pixel(*pixel));
        }
    }
    grid
}

/// Decode encoded image bytes (PNG, GIF, ...) and quantize them.
pub fn import_bitmap(bytes: &[u8], size: usize) -> Result<Grid, ImportError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ImportError::Empty);
    }
    log::debug!(
        "importing {}x{} bitmap into {}x{} grid",
        decoded.width(),
        decoded.height(),
        size,
        size
    );
    Ok(quantize(&decoded, size))
}

/// Read an image file and quantize it.
pub fn import_file<P: AsRef<Path>>(path: P, size: usize) -> Result<Grid, ImportError> {
    let bytes = std::fs::read(path.as_ref())?;
    import_bitmap(&bytes, size)
}
