//! Configuration schema types for `pxs.toml`
//!
//! Defines the structure and validation rules for editor configuration.

use serde::{Deserialize, Serialize};

use crate::animation::{DEFAULT_FPS, MAX_FPS, MIN_FPS};
use crate::grid::{is_supported_size, DEFAULT_SIZE, SUPPORTED_SIZES};
use crate::mirror::MirrorMode;
use crate::onion::DEFAULT_OPACITY;
use crate::palettes::PaletteMode;

/// Largest accepted export scale.
pub const MAX_EXPORT_SCALE: u32 = 64;

/// Image format written by `pxs export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Active frame as a still PNG
    #[default]
    Png,
    /// Every frame as an animated GIF
    Gif,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Gif => "gif",
        }
    }
}

/// Initial editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Cells per side for new sprites
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    /// On-screen cell size in pixels
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Playback rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub palette: PaletteMode,
    #[serde(default = "default_true")]
    pub show_grid_lines: bool,
    #[serde(default)]
    pub onion_skin: bool,
    #[serde(default = "default_onion_opacity")]
    pub onion_opacity: f32,
    #[serde(default)]
    pub mirror: MirrorMode,
}

fn default_grid_size() -> usize {
    DEFAULT_SIZE
}

fn default_zoom() -> f32 {
    16.0
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_true() -> bool {
    true
}

fn default_onion_opacity() -> f32 {
    DEFAULT_OPACITY
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            zoom: default_zoom(),
            fps: default_fps(),
            palette: PaletteMode::default(),
            show_grid_lines: true,
            onion_skin: false,
            onion_opacity: default_onion_opacity(),
            mirror: MirrorMode::default(),
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Pixels per cell in exported images
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_scale() -> u32 {
    4
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { scale: default_scale(), format: ExportFormat::default() }
    }
}

/// Autosave settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Quiet period before a pending state is written
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

/// Complete pxs.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PxsConfig {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "editor.fps")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pxs.toml: '{}' {}", self.field, self.message)
    }
}

impl PxsConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut fail = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        let editor = &self.editor;
        if !is_supported_size(editor.grid_size) {
            fail("editor.grid_size", format!("must be one of {:?}", SUPPORTED_SIZES));
        }
        if !(editor.zoom.is_finite() && editor.zoom > 0.0) {
            fail("editor.zoom", "must be a positive number".to_string());
        }
        if !(MIN_FPS..=MAX_FPS).contains(&editor.fps) {
            fail("editor.fps", format!("must be between {} and {}", MIN_FPS, MAX_FPS));
        }
        if !(0.0..=1.0).contains(&editor.onion_opacity) {
            fail("editor.onion_opacity", "must be between 0 and 1".to_string());
        }

        if !(1..=MAX_EXPORT_SCALE).contains(&self.export.scale) {
            fail("export.scale", format!("must be between 1 and {}", MAX_EXPORT_SCALE));
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
