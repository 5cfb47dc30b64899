//! Criterion benchmarks for Pixelsprite critical paths
//!
//! Benchmarks the per-event operations at the largest grid sizes:
//! - Draw: flood fill, line and rectangle rasterization with mirroring
//! - Color: hex and CSS color parsing
//! - Import: bitmap quantization
//! - Export: grid to PNG

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use pixelsprite::color::{parse_color, Color};
use pixelsprite::draw::{draw_line, fill_rect, flood_fill};
use pixelsprite::grid::{Grid, SUPPORTED_SIZES};
use pixelsprite::import::quantize;
use pixelsprite::mirror::MirrorMode;
use pixelsprite::output::{export_bitmap, export_image};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Grid with a checkerboard of 16 colors, so fills stop after one cell
fn make_checkerboard(size: usize) -> Grid {
    let mut grid = Grid::new(size);
    for (x, y, _) in Grid::new(size).cells() {
        let i = ((x + y) % 16) as u8;
        grid.set(x, y, Color::rgb(i * 16, i * 8, 255 - i * 16));
    }
    grid
}

/// Image with a smooth gradient
fn make_gradient(side: u32) -> RgbaImage {
    RgbaImage::from_fn(side, side, |x, y| {
        Rgba([(x * 255 / side) as u8, (y * 255 / side) as u8, 128, 255])
    })
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw");
    let red = Color::rgb(255, 0, 0);

    for size in SUPPORTED_SIZES {
        let blank = Grid::new(size);
        let last = size as i32 - 1;
        group.throughput(Throughput::Elements((size * size) as u64));

        // Worst case: the whole grid is one region
        group.bench_with_input(BenchmarkId::new("flood_fill_blank", size), &blank, |b, grid| {
            b.iter(|| flood_fill(black_box(grid), 0, 0, red))
        });

        group.bench_with_input(BenchmarkId::new("line_diagonal_mirrored", size), &blank, |b, grid| {
            b.iter(|| draw_line(black_box(grid), (0, 0), (last, last / 2), red, MirrorMode::Both))
        });

        group.bench_with_input(BenchmarkId::new("rect_full", size), &blank, |b, grid| {
            b.iter(|| fill_rect(black_box(grid), (0, 0), (last, last), red, MirrorMode::None))
        });
    }

    let checker = make_checkerboard(64);
    group.bench_function("flood_fill_checkerboard_64", |b| {
        b.iter(|| flood_fill(black_box(&checker), 10, 10, red))
    });

    group.finish();
}

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("parse_hex_6", |b| b.iter(|| parse_color(black_box("#FF0000"))));

    group.bench_function("parse_hex_8", |b| b.iter(|| parse_color(black_box("#FF000080"))));

    // CSS functional formats (uses lightningcss)
    group.bench_function("parse_rgb", |b| b.iter(|| parse_color(black_box("rgb(255, 0, 0)"))));

    group.bench_function("parse_named", |b| b.iter(|| parse_color(black_box("red"))));

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");

    for side in [64u32, 512] {
        let image = make_gradient(side);
        group.bench_with_input(BenchmarkId::new("quantize_to_64", side), &image, |b, img| {
            b.iter(|| quantize(black_box(img), 64))
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let grid = make_checkerboard(64);

    for scale in [1u32, 8] {
        group.bench_with_input(BenchmarkId::new("export_image_64", scale), &scale, |b, &s| {
            b.iter(|| export_image(black_box(&grid), s))
        });
    }

    group.bench_function("export_bitmap_png_64x4", |b| b.iter(|| export_bitmap(black_box(&grid), 4)));

    group.finish();
}

criterion_group!(benches, bench_draw, bench_color, bench_import, bench_export);
criterion_main!(benches);
