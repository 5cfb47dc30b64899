//! Onion skinning for animation editing.
//!
//! Shows the previous frame as a faded ghost beneath the frame being edited,
//! a technique used by animators to see motion continuity. Everything here
//! produces new display data; stored frames are never touched.

use image::{Rgba, RgbaImage};

use crate::animation::Frames;
use crate::color::Color;
use crate::grid::Grid;
use crate::output::export_image;

/// Default opacity for the ghost frame.
pub const DEFAULT_OPACITY: f32 = 0.3;

/// The previous frame's visible cells with alpha scaled by `opacity`.
///
/// Returns `None` on the first frame, since there is nothing to show.
pub fn onion_skin(frames: &Frames, opacity: f32) -> Option<Grid> {
    let previous = frames.previous()?;
    Some(ghost(&previous.grid, opacity))
}

/// Fade every opaque cell of `grid` to `opacity`.
pub fn ghost(grid: &Grid, opacity: f32) -> Grid {
    let mut out = Grid::new(grid.size());
    for (x, y, color) in grid.cells() {
        if !color.is_transparent() {
            out.set(x, y, color.with_opacity(opacity));
        }
    }
    out
}

/// Flatten `ghost` beneath `active` into a single grid for previews.
///
/// Opaque cells of the active grid win; everywhere else the ghost shows
/// through. Partially transparent active cells are blended over the ghost.
pub fn composite_under(active: &Grid, ghost: &Grid) -> Grid {
    let mut out = active.clone();
    for (x, y, below) in ghost.cells() {
        if below.is_transparent() {
            continue;
        }
        let above = active.get(x, y).unwrap_or_default();
        let blended = blend_over(above.to_pixel(), below.to_pixel());
        out.set(x, y, Color::from_pixel(blended));
    }
    out
}

/// Standard alpha compositing of `src` over `dest`.
fn blend_over(src: Rgba<u8>, dest: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 || dest[3] == 0 {
        return src;
    }

    let src_a = src[3] as f32 / 255.0;
    let dest_a = dest[3] as f32 / 255.0;
    let out_a = src_a + dest_a * (1.0 - src_a);

    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * src_a + df * dest_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dest[0]),
        blend(src[1], dest[1]),
        blend(src[2], dest[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Ghost of the frame before `index`, if there is one.
pub fn ghost_before(frames: &Frames, index: usize, opacity: f32) -> Option<Grid> {
    let previous = frames.get(index.checked_sub(1)?)?;
    Some(ghost(&previous.grid, opacity))
}

/// Render `active` with `ghost` showing through, `scale` pixels per cell.
pub fn render_preview(active: &Grid, ghost: Option<&Grid>, scale: u32) -> RgbaImage {
    match ghost {
        Some(g) => export_image(&composite_under(active, g), scale),
        None => export_image(active, scale),
    }
}
