//! Shape rasterization primitives for pixel-perfect rendering.
//!
//! These functions only produce integer coordinates; writing them into a
//! grid (with mirroring and bounds checks) happens in [`crate::draw`].

/// Rasterize a line with Bresenham's algorithm, keeping only the pixels that
/// land on a `size`×`size` grid.
///
/// Bresenham advances one cell per step along the longer axis; after `i`
/// steps the shorter axis has moved `i * short / long` cells, rounded with
/// halves going away from the start. Only steps whose long-axis coordinate
/// is on the grid are evaluated, and any `i32` endpoints are accepted.
///
/// Pixels come back in visiting order from `p0` to `p1`, endpoints inclusive.
///
/// # Examples
///
/// ```
/// use pixelsprite::shapes::line_points;
///
/// let pixels = line_points((0, 0), (3, 0), 8);
/// assert_eq!(pixels, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
///
/// assert_eq!(line_points((2, 2), (2, 2), 8), vec![(2, 2)]);
/// assert_eq!(line_points((-5, 1), (1, 1), 8), vec![(0, 1), (1, 1)]);
/// ```
pub fn line_points(p0: (i32, i32), p1: (i32, i32), size: usize) -> Vec<(i32, i32)> {
    let (x0, y0) = (i64::from(p0.0), i64::from(p0.1));
    let (dx, dy) = (i64::from(p1.0) - x0, i64::from(p1.1) - y0);
    let steps = dx.abs().max(dy.abs());
    let last = i64::try_from(size).unwrap_or(i64::MAX) - 1;

    let (first, final_step) = if dx.abs() >= dy.abs() {
        on_grid_steps(x0, dx.signum(), steps, last)
    } else {
        on_grid_steps(y0, dy.signum(), steps, last)
    };

    (first..=final_step)
        .filter_map(|i| {
            let x = x0 + step_offset(i, dx, steps);
            let y = y0 + step_offset(i, dy, steps);
            let on_grid = (0..=last).contains(&x) && (0..=last).contains(&y);
            // On-grid values are below `size`, so they fit in i32
            on_grid.then_some((x as i32, y as i32))
        })
        .collect()
}

/// The range of steps `i` in `0..=steps` for which `origin + i * dir` lies
/// in `0..=last`. Empty when `first > final`.
fn on_grid_steps(origin: i64, dir: i64, steps: i64, last: i64) -> (i64, i64) {
    match dir {
        1 => ((-origin).max(0), (last - origin).min(steps)),
        -1 => ((origin - last).max(0), origin.min(steps)),
        // Zero-length line
        _ if (0..=last).contains(&origin) => (0, 0),
        _ => (0, -1),
    }
}

/// `i * delta / steps` rounded to the nearest integer, halves away from zero.
fn step_offset(i: i64, delta: i64, steps: i64) -> i64 {
    if steps == 0 {
        return 0;
    }
    let num = i128::from(i) * i128::from(delta);
    let den = i128::from(steps);
    ((2 * num + num.signum() * den) / (2 * den)) as i64
}

/// Inclusive rectangle spanned by two corners, clamped to a `size`×`size` grid.
///
/// Returns `(min_x, min_y, max_x, max_y)`, or `None` if nothing of the
/// rectangle lies on the grid.
///
/// ```
/// use pixelsprite::shapes::clamped_rect;
///
/// assert_eq!(clamped_rect((5, 1), (2, 3), 8), Some((2, 1, 5, 3)));
/// assert_eq!(clamped_rect((-4, -4), (20, 2), 8), Some((0, 0, 7, 2)));
/// assert_eq!(clamped_rect((9, 9), (12, 12), 8), None);
/// ```
pub fn clamped_rect(a: (i32, i32), b: (i32, i32), size: usize) -> Option<(i32, i32, i32, i32)> {
    let last = size as i32 - 1;
    let min_x = a.0.min(b.0).max(0);
    let max_x = a.0.max(b.0).min(last);
    let min_y = a.1.min(b.1).max(0);
    let max_y = a.1.max(b.1).min(last);

    if min_x > max_x || min_y > max_y {
        return None;
    }
    Some((min_x, min_y, max_x, max_y))
}

/// All pixels of the inclusive rectangle `(min_x, min_y, max_x, max_y)`.
pub fn rect_points(bounds: (i32, i32, i32, i32)) -> impl Iterator<Item = (i32, i32)> {
    let (min_x, min_y, max_x, max_y) = bounds;
    (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
}
