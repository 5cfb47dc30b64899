//! Drawing primitives over a [`Grid`].
//!
//! Every primitive is copy-on-write: it takes the current grid by reference
//! and returns a modified copy, leaving the input untouched. Writes that land
//! outside the grid are dropped per pixel, so no primitive ever fails.

use crate::color::Color;
use crate::grid::Grid;
use crate::mirror::{mirror_points, MirrorMode};
use crate::shapes::{clamped_rect, line_points, rect_points};

/// A single primitive to apply to a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    /// Paint one cell (pencil, or eraser with `Color::Transparent`).
    Point { x: i32, y: i32, color: Color },
    /// Bresenham line between two inclusive endpoints.
    Line { x0: i32, y0: i32, x1: i32, y1: i32, color: Color },
    /// Filled rectangle spanned by two corners.
    Rect { x0: i32, y0: i32, x1: i32, y1: i32, color: Color },
    /// 4-connected flood fill from a seed cell.
    Flood { x: i32, y: i32, color: Color },
}

impl DrawOp {
    pub fn color(&self) -> Color {
        match self {
            DrawOp::Point { color, .. }
            | DrawOp::Line { color, .. }
            | DrawOp::Rect { color, .. }
            | DrawOp::Flood { color, .. } => *color,
        }
    }
}

/// Apply `op` to a copy of `grid`. Flood fill ignores `mirror`.
pub fn apply(grid: &Grid, op: &DrawOp, mirror: MirrorMode) -> Grid {
    match *op {
        DrawOp::Point { x, y, color } => paint_point(grid, x, y, color, mirror),
        DrawOp::Line { x0, y0, x1, y1, color } => draw_line(grid, (x0, y0), (x1, y1), color, mirror),
        DrawOp::Rect { x0, y0, x1, y1, color } => fill_rect(grid, (x0, y0), (x1, y1), color, mirror),
        DrawOp::Flood { x, y, color } => flood_fill(grid, x, y, color),
    }
}

/// Write `color` at (x, y) and at each of its mirror images, in place.
pub fn plot(grid: &mut Grid, x: i32, y: i32, color: Color, mirror: MirrorMode) {
    grid.set(x, y, color);
    for (mx, my) in mirror_points(mirror, x, y, grid.size()) {
        grid.set(mx, my, color);
    }
}

/// Paint a single cell plus mirror images.
pub fn paint_point(grid: &Grid, x: i32, y: i32, color: Color, mirror: MirrorMode) -> Grid {
    let mut out = grid.clone();
    plot(&mut out, x, y, color, mirror);
    out
}

/// Flood fill from a seed point using an explicit stack.
///
/// Fills all 4-connected cells matching the color at (x, y) with `color`.
/// A seed outside the grid, or a seed already holding `color`, leaves the
/// copy unchanged.
///
/// ```
/// use pixelsprite::color::Color;
/// use pixelsprite::draw::flood_fill;
/// use pixelsprite::grid::Grid;
///
/// let red = Color::rgb(255, 0, 0);
/// let filled = flood_fill(&Grid::new(16), 0, 0, red);
/// assert!(filled.cells().all(|(_, _, c)| c == red));
/// ```
pub fn flood_fill(grid: &Grid, x: i32, y: i32, color: Color) -> Grid {
    let mut out = grid.clone();

    let target = match grid.get(x, y) {
        Some(target) => target,
        None => return out,
    };
    if target == color {
        return out;
    }

    // LIFO keeps memory bounded by the grid, not by call depth
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        if out.get(cx, cy) != Some(target) {
            continue;
        }
        out.set(cx, cy, color);
        stack.push((cx + 1, cy));
        stack.push((cx - 1, cy));
        stack.push((cx, cy + 1));
        stack.push((cx, cy - 1));
    }

    out
}

/// Draw a line from `p0` to `p1` inclusive, mirroring every point.
pub fn draw_line(grid: &Grid, p0: (i32, i32), p1: (i32, i32), color: Color, mirror: MirrorMode) -> Grid {
    let mut out = grid.clone();
    for (x, y) in line_points(p0, p1, grid.size()) {
        plot(&mut out, x, y, color, mirror);
    }
    out
}

/// Fill the inclusive rectangle spanned by two corners, clamped to the grid.
pub fn fill_rect(grid: &Grid, a: (i32, i32), b: (i32, i32), color: Color, mirror: MirrorMode) -> Grid {
    let mut out = grid.clone();
    if let Some(bounds) = clamped_rect(a, b, grid.size()) {
        for (x, y) in rect_points(bounds) {
            plot(&mut out, x, y, color, mirror);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::rgb(255, 0, 0)
    }

    fn blue() -> Color {
        Color::rgb(0, 0, 255)
    }

    fn painted(grid: &Grid) -> Vec<(i32, i32)> {
        grid.cells().filter(|(_, _, c)| !c.is_transparent()).map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn test_flood_fill_whole_blank_grid() {
        let filled = flood_fill(&Grid::new(16), 0, 0, red());
        assert_eq!(filled.cells().filter(|(_, _, c)| *c == red()).count(), 256);
    }

    #[test]
    fn test_flood_fill_does_not_mutate_input() {
        let grid = Grid::new(8);
        let _ = flood_fill(&grid, 3, 3, red());
        assert!(grid.is_blank());
    }

    #[test]
    fn test_flood_fill_respects_walls() {
        // Vertical wall at x = 3 splits the grid
        let mut grid = Grid::new(8);
        for y in 0..8 {
            grid.set(3, y, blue());
        }
        let filled = flood_fill(&grid, 0, 0, red());
        for (x, y, c) in filled.cells() {
            match x {
                0..=2 => assert_eq!(c, red(), "({},{})", x, y),
                3 => assert_eq!(c, blue()),
                _ => assert_eq!(c, Color::Transparent),
            }
        }
    }

    #[test]
    fn test_flood_fill_is_four_connected() {
        // Diagonal neighbors do not leak
        let mut grid = Grid::new(8);
        grid.set(0, 0, blue());
        grid.set(1, 1, blue());
        let filled = flood_fill(&grid, 0, 0, red());
        assert_eq!(filled.get(0, 0), Some(red()));
        assert_eq!(filled.get(1, 1), Some(blue()));
    }

    #[test]
    fn test_flood_fill_same_color_noop() {
        let mut grid = Grid::new(8);
        grid.set(4, 4, red());
        assert_eq!(flood_fill(&grid, 4, 4, red()), grid);
    }

    #[test]
    fn test_flood_fill_out_of_bounds_noop() {
        let grid = Grid::new(8);
        assert_eq!(flood_fill(&grid, -1, 0, red()), grid);
        assert_eq!(flood_fill(&grid, 0, 8, red()), grid);
    }

    #[test]
    fn test_flood_fill_only_touches_target_cells() {
        let mut grid = Grid::new(16);
        for i in 0..16 {
            grid.set(i, (i * 7) % 16, blue());
            grid.set((i * 5) % 16, i, Color::rgb(0, 255, 0));
        }
        let filled = flood_fill(&grid, 0, 0, red());
        let target = grid.get(0, 0);
        for ((x, y, before), (_, _, after)) in grid.cells().zip(filled.cells()) {
            if Some(before) != target {
                assert_eq!(before, after, "non-target cell ({},{}) changed", x, y);
            }
        }
    }

    #[test]
    fn test_flood_fill_idempotent() {
        let mut grid = Grid::new(16);
        for i in 0..16 {
            grid.set(i, 8, blue());
        }
        let once = flood_fill(&grid, 2, 2, red());
        let twice = flood_fill(&once, 2, 2, red());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flood_fill_max_grid() {
        let filled = flood_fill(&Grid::new(64), 63, 63, red());
        assert_eq!(filled.distinct_colors(), vec![red()]);
        assert!(filled.cells().all(|(_, _, c)| c == red()));
    }

    #[test]
    fn test_line_paints_exactly_endpoints_inclusive() {
        let out = draw_line(&Grid::new(8), (0, 0), (3, 0), red(), MirrorMode::None);
        assert_eq!(painted(&out), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_line_degenerate_single_cell() {
        let out = draw_line(&Grid::new(8), (5, 5), (5, 5), red(), MirrorMode::None);
        assert_eq!(painted(&out), vec![(5, 5)]);
    }

    #[test]
    fn test_line_partially_off_grid() {
        let out = draw_line(&Grid::new(8), (-3, 2), (2, 2), red(), MirrorMode::None);
        assert_eq!(painted(&out), vec![(0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_line_with_horizontal_mirror() {
        let out = draw_line(&Grid::new(8), (0, 0), (1, 0), red(), MirrorMode::Horizontal);
        assert_eq!(painted(&out), vec![(0, 0), (1, 0), (6, 0), (7, 0)]);
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let out = fill_rect(&Grid::new(8), (3, 2), (1, 1), red(), MirrorMode::None);
        assert_eq!(painted(&out), vec![(1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_rect_clamped_to_grid() {
        let out = fill_rect(&Grid::new(8), (6, 6), (12, 12), red(), MirrorMode::None);
        assert_eq!(painted(&out), vec![(6, 6), (7, 6), (6, 7), (7, 7)]);
    }

    #[test]
    fn test_rect_entirely_outside() {
        let grid = Grid::new(8);
        assert_eq!(fill_rect(&grid, (-5, -5), (-1, -1), red(), MirrorMode::None), grid);
    }

    #[test]
    fn test_rect_mirrored_vertical() {
        let out = fill_rect(&Grid::new(8), (0, 0), (1, 0), red(), MirrorMode::Vertical);
        assert_eq!(painted(&out), vec![(0, 0), (1, 0), (0, 7), (1, 7)]);
    }

    #[test]
    fn test_paint_point_both_mirror_scenario() {
        let out = paint_point(&Grid::new(8), 1, 1, red(), MirrorMode::Both);
        assert_eq!(painted(&out), vec![(1, 1), (6, 1), (1, 6), (6, 6)]);
    }

    #[test]
    fn test_mirror_completeness_on_center_line() {
        for (x, y) in [(0, 0), (3, 4), (7, 7), (4, 3)] {
            let out = paint_point(&Grid::new(8), x, y, red(), MirrorMode::Both);
            assert_eq!(out.get(x, y), Some(red()));
            for (mx, my) in mirror_points(MirrorMode::Both, x, y, 8) {
                assert_eq!(out.get(mx, my), Some(red()));
            }
        }
    }

    #[test]
    fn test_apply_dispatch_flood_ignores_mirror() {
        let mut grid = Grid::new(8);
        for y in 0..8 {
            grid.set(4, y, blue());
        }
        let op = DrawOp::Flood { x: 0, y: 0, color: red() };
        let out = apply(&grid, &op, MirrorMode::Horizontal);
        assert_eq!(out.get(0, 0), Some(red()));
        assert_eq!(out.get(7, 0), Some(Color::Transparent));
        assert_eq!(op.color(), red());
    }

    #[test]
    fn test_apply_eraser_point() {
        let grid = flood_fill(&Grid::new(8), 0, 0, red());
        let op = DrawOp::Point { x: 2, y: 2, color: Color::Transparent };
        let out = apply(&grid, &op, MirrorMode::None);
        assert_eq!(out.get(2, 2), Some(Color::Transparent));
        assert_eq!(out.get(2, 3), Some(red()));
    }
}
