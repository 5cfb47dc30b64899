//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod edit;
mod export;
mod import;
mod info;
mod new;
mod palettes;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, ConfigError, ExportFormat, PxsConfig};
use crate::editor::Editor;
use crate::mirror::MirrorMode;
use crate::palettes::PaletteMode;
use crate::state::{restore_editor, JsonFileSink, StateSink};

pub use edit::parse_commands;
pub use palettes::PaletteAction;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Pixelsprite - edit, animate and export pixel-grid sprites
#[derive(Parser)]
#[command(name = "pxs")]
#[command(about = "Pixelsprite - edit, animate and export pixel-grid sprites")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the discovered pxs.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a blank sprite state file
    New {
        /// State file to create (.json)
        state: PathBuf,

        /// Grid size: 8, 16, 32 or 64
        #[arg(long)]
        size: Option<usize>,

        /// Playback rate in frames per second (1-30)
        #[arg(long)]
        fps: Option<u32>,

        /// Palette mode: full, gameboy, nes or custom
        #[arg(long)]
        palette: Option<PaletteMode>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Apply editor commands to a state file
    Edit {
        /// State file to edit; created if missing
        state: PathBuf,

        /// JSONL file with one command per line
        #[arg(long)]
        script: Option<PathBuf>,

        /// A single JSON command, e.g. '{"cmd":"pointer_down","x":1,"y":1}' (repeatable)
        #[arg(long = "cmd")]
        commands: Vec<String>,

        /// Write the result here instead of back to the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mirror mode for drawing: none, horizontal, vertical or both
        #[arg(long)]
        mirror: Option<MirrorMode>,
    },

    /// Quantize an image into the active frame of a state file
    Import {
        /// Image to import (PNG, GIF, ...)
        input: PathBuf,

        /// State file to write; an existing state is updated
        #[arg(short, long)]
        output: PathBuf,

        /// Grid size: 8, 16, 32 or 64
        #[arg(long)]
        size: Option<usize>,
    },

    /// Export a state file as PNG or animated GIF
    Export {
        /// State file to export
        state: PathBuf,

        /// Output file or directory.
        /// If omitted: pixel-art-{timestamp}.{ext}
        /// If directory (ends with /): dir/pixel-art-{timestamp}.{ext}
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per cell (1-64)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,

        /// Export this frame instead of the active one (PNG only)
        #[arg(long)]
        frame: Option<usize>,

        /// Export every frame as an animated GIF
        #[arg(long)]
        gif: bool,

        /// Show the previous frame faded beneath the exported one (PNG only)
        #[arg(long)]
        onion: bool,
    },

    /// Summarize a state file
    Info {
        /// State file to inspect
        state: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List and inspect palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },
}

impl Commands {
    /// Flags that override pxs.toml values.
    fn overrides(&self) -> CliOverrides {
        match self {
            Commands::New { size, fps, palette, .. } => CliOverrides {
                grid_size: *size,
                fps: *fps,
                palette: *palette,
                ..Default::default()
            },
            Commands::Import { size, .. } => CliOverrides { grid_size: *size, ..Default::default() },
            Commands::Edit { mirror, .. } => CliOverrides { mirror: *mirror, ..Default::default() },
            Commands::Export { scale, gif, .. } => CliOverrides {
                scale: *scale,
                format: gif.then_some(ExportFormat::Gif),
                ..Default::default()
            },
            _ => CliOverrides::default(),
        }
    }
}

/// Initialize `env_logger`; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<PxsConfig, ConfigError> {
    let config = load_config(path)?;
    merge_cli_overrides(config, overrides)
}

/// Load the editor stored at `path`, reporting failures the CLI way.
pub(crate) fn open_state(path: &Path, config: &PxsConfig) -> Result<Editor, ExitCode> {
    if !path.exists() {
        eprintln!("Error: State file not found: {}", path.display());
        return Err(ExitCode::from(EXIT_ERROR));
    }
    let mut sink = JsonFileSink::new(path);
    restore_editor(&mut sink, &config.editor).map_err(|e| {
        eprintln!("Error: Cannot load '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Write `editor` to `path` immediately.
pub(crate) fn save_state(editor: &Editor, path: &Path) -> Result<(), ExitCode> {
    let mut sink = JsonFileSink::new(path);
    sink.store(&crate::state::PersistedState::from_editor(editor)).map_err(|e| {
        eprintln!("Error: Failed to write '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Palettes { action } = cli.command {
        return palettes::run_palettes(action);
    }

    let config = match resolve_config(cli.config.as_deref(), &cli.command.overrides()) {
        Ok(config) => config,
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match cli.command {
        Commands::New { state, force, .. } => new::run_new(&state, force, &config),
        Commands::Edit { state, script, commands, output, .. } => {
            edit::run_edit(&state, script.as_deref(), &commands, output.as_deref(), &config)
        }
        Commands::Import { input, output, size } => import::run_import(&input, &output, size, &config),
        Commands::Export { state, output, frame, onion, .. } => {
            export::run_export(&state, output.as_deref(), frame, onion, &config)
        }
        Commands::Info { state, json } => info::run_info(&state, json, &config),
        Commands::Palettes { .. } => ExitCode::from(EXIT_SUCCESS),
    }
}
