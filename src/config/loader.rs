//! Configuration loading and discovery for `pxs.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ExportFormat, PxsConfig};
use crate::mirror::MirrorMode;
use crate::palettes::PaletteMode;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up during discovery.
pub const CONFIG_FILE: &str = "pxs.toml";

/// Directory under `$XDG_CONFIG_HOME` holding the user-wide config.
pub const CONFIG_DIR: &str = "pixelsprite";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pxs.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override grid size for new sprites
    pub grid_size: Option<usize>,
    /// Override export scale
    pub scale: Option<u32>,
    /// Override export format
    pub format: Option<ExportFormat>,
    /// Override playback rate
    pub fps: Option<u32>,
    /// Override palette mode
    pub palette: Option<PaletteMode>,
    /// Override mirror mode
    pub mirror: Option<MirrorMode>,
}

/// Find pxs.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for pxs.toml
/// 2. Check XDG_CONFIG_HOME/pixelsprite/pxs.toml (or ~/.config/pixelsprite/pxs.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find pxs.toml in XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join(CONFIG_DIR).join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find pxs.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a pxs.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("art/pxs.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<PxsConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<PxsConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PxsConfig = toml::from_str(&contents)?;
    validated(config)
}

fn validated(config: PxsConfig) -> Result<PxsConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Configuration used when no pxs.toml is found.
pub fn default_config() -> PxsConfig {
    PxsConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged result
/// is validated again so a bad flag is reported the same way as a bad file.
pub fn merge_cli_overrides(config: PxsConfig, overrides: &CliOverrides) -> Result<PxsConfig, ConfigError> {
    let mut config = config;

    if let Some(size) = overrides.grid_size {
        config.editor.grid_size = size;
    }
    if let Some(scale) = overrides.scale {
        config.export.scale = scale;
    }
    if let Some(format) = overrides.format {
        config.export.format = format;
    }
    if let Some(fps) = overrides.fps {
        config.editor.fps = fps;
    }
    if let Some(palette) = overrides.palette {
        config.editor.palette = palette;
    }
    if let Some(mirror) = overrides.mirror {
        config.editor.mirror = mirror;
    }

    validated(config)
}
