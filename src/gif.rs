//! Animated GIF export of a frame sequence

use crate::animation::{frame_interval, Frame};
use crate::output::{export_image, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode frames as a looping GIF, one image per frame at `fps`.
///
/// Each frame is rasterized at `scale` the same way as a PNG export. An empty
/// frame list writes nothing.
pub fn write_gif<W: Write>(
    frames: &[Frame],
    fps: u32,
    scale: u32,
    writer: W,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;

    // GIF delays have centisecond resolution
    let delay_ms = (frame_interval(fps).as_millis() as u32 / 10).max(1) * 10;
    for frame in frames {
        let delay = image::Delay::from_numer_denom_ms(delay_ms, 1);
        let image = export_image(&frame.grid, scale);
        encoder.encode_frame(image::Frame::from_parts(image, 0, 0, delay))?;
    }

    Ok(())
}

/// Encode frames as GIF bytes.
pub fn encode_gif(frames: &[Frame], fps: u32, scale: u32) -> Result<Vec<u8>, OutputError> {
    let mut bytes = Vec::new();
    write_gif(frames, fps, scale, &mut bytes)?;
    Ok(bytes)
}

/// Write an animated GIF to `path`, creating parent directories as needed.
pub fn save_gif(frames: &[Frame], fps: u32, scale: u32, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_gif(frames, fps, scale, BufWriter::new(file))
}
