//! Palettes command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Subcommand;

use crate::config::EditorConfig;
use crate::palettes::{list_modes, PaletteMode, RecentColors};
use crate::state::{restore_editor, JsonFileSink};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum PaletteAction {
    /// List all palette modes
    List,
    /// Show the colors of a palette mode
    Show {
        /// Palette mode: full, gameboy, nes or custom
        mode: String,

        /// State file whose recent colors fill the `full` palette
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

/// Execute the palettes command
pub fn run_palettes(action: PaletteAction) -> ExitCode {
    match action {
        PaletteAction::List => {
            println!("Palettes:");
            for name in list_modes() {
                match name.parse::<PaletteMode>() {
                    Ok(PaletteMode::Full) => println!("  {:<8} recent colors", name),
                    Ok(mode) => println!("  {:<8} {} colors", name, mode.table().len()),
                    Err(_) => {}
                }
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        PaletteAction::Show { mode, state } => {
            let mode: PaletteMode = match mode.parse() {
                Ok(mode) => mode,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };

            let recent = match state {
                Some(path) => {
                    let mut sink = JsonFileSink::new(&path);
                    match restore_editor(&mut sink, &EditorConfig::default()) {
                        Ok(editor) => editor.recent_colors().clone(),
                        Err(e) => {
                            eprintln!("Error: Cannot load '{}': {}", path.display(), e);
                            return ExitCode::from(EXIT_ERROR);
                        }
                    }
                }
                None => RecentColors::new(),
            };

            let colors = mode.colors(&recent);
            println!("Palette: {}", mode);
            if colors.is_empty() {
                println!("  (no colors used yet)");
            }
            for (i, color) in colors.iter().enumerate() {
                println!("  {:>2}  {}", i, color);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
    }
}
