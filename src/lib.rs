//! Pixelsprite - pixel-grid sprite editing engine
//!
//! This library provides:
//! - A fixed-size square grid of colors with silent out-of-bounds handling
//! - Pencil, eraser, flood fill, line and rectangle tools with mirroring
//! - Multi-frame animation with onion skinning and cancelable playback
//! - Bounded undo/redo
//! - Bitmap import (quantization) and PNG/GIF export
//! - Debounced persistence of the editor state

pub mod animation;
pub mod cli;
pub mod color;
pub mod config;
pub mod draw;
pub mod editor;
pub mod engine;
pub mod gif;
pub mod grid;
pub mod history;
pub mod import;
pub mod mirror;
pub mod onion;
pub mod output;
pub mod palettes;
pub mod shapes;
pub mod state;
