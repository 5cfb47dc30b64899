//! New command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::PxsConfig;
use crate::editor::Editor;

use super::{save_state, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the new command
pub fn run_new(state: &Path, force: bool, config: &PxsConfig) -> ExitCode {
    if state.exists() && !force {
        eprintln!("Error: '{}' already exists (use --force to overwrite)", state.display());
        return ExitCode::from(EXIT_ERROR);
    }

    let editor = Editor::new(&config.editor);
    if let Err(code) = save_state(&editor, state) {
        return code;
    }

    println!("Created: {} ({}x{})", state.display(), editor.grid_size(), editor.grid_size());
    ExitCode::from(EXIT_SUCCESS)
}
