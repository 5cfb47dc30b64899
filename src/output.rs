//! Bitmap export and output file naming

use image::{ImageEncoder, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};

use crate::grid::Grid;

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Rasterize a grid, drawing each cell as a `scale`×`scale` block.
///
/// Transparent cells stay fully transparent in the output. A scale of 0 is
/// treated as 1.
///
/// ```
/// use pixelsprite::color::Color;
/// use pixelsprite::grid::Grid;
/// use pixelsprite::output::export_image;
///
/// let mut grid = Grid::new(8);
/// grid.set(1, 0, Color::rgb(255, 0, 0));
/// let img = export_image(&grid, 4);
/// assert_eq!(img.dimensions(), (32, 32));
/// assert_eq!(img.get_pixel(7, 3).0, [255, 0, 0, 255]);
/// assert_eq!(img.get_pixel(8, 0).0, [0, 0, 0, 0]);
/// ```
pub fn export_image(grid: &Grid, scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let side = grid.size() as u32 * scale;
    let mut image = RgbaImage::new(side, side);

    for (x, y, color) in grid.cells() {
        if color.is_transparent() {
            continue;
        }
        let pixel = color.to_pixel();
        let (left, top) = (x as u32 * scale, y as u32 * scale);
        for py in top..top + scale {
            for px in left..left + scale {
                image.put_pixel(px, py, pixel);
            }
        }
    }

    image
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OutputError> {
    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_data);
    encoder.write_image(image.as_raw(), image.width(), image.height(), image::ColorType::Rgba8)?;
    Ok(png_data)
}

/// Export a grid to PNG bytes at an integer scale.
pub fn export_bitmap(grid: &Grid, scale: u32) -> Result<Vec<u8>, OutputError> {
    encode_png(&export_image(grid, scale))
}

/// Save an RGBA image to a PNG file.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - The output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Suggested file name for an export: `pixel-art-<timestamp>.<ext>`.
pub fn export_filename(timestamp: u64, ext: &str) -> String {
    format!("pixel-art-{}.{}", timestamp, ext)
}

/// Seconds since the Unix epoch, for export names.
pub fn unix_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

/// Resolve where an export should be written.
///
/// | `-o` argument | Output |
/// |---------------|--------|
/// | none | `pixel-art-<timestamp>.<ext>` in the current directory |
/// | `dir/` or existing directory | `dir/pixel-art-<timestamp>.<ext>` |
/// | `file.png` | `file.png` |
pub fn generate_output_path(output_arg: Option<&Path>, timestamp: u64, ext: &str) -> PathBuf {
    let name = export_filename(timestamp, ext);
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(name)
            } else {
                output.to_path_buf()
            }
        }
        None => PathBuf::from(name),
    }
}
