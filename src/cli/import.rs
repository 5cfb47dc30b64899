//! Import command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::PxsConfig;
use crate::editor::{Editor, EditorCommand};
use crate::import::import_file;

use super::{open_state, save_state, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the import command
///
/// An existing state keeps its grid size unless `--size` is given, in which
/// case every frame is resized before the image is quantized.
pub fn run_import(input: &Path, output: &Path, size: Option<usize>, config: &PxsConfig) -> ExitCode {
    let mut editor = if output.exists() {
        match open_state(output, config) {
            Ok(editor) => editor,
            Err(code) => return code,
        }
    } else {
        Editor::new(&config.editor)
    };

    if let Some(size) = size {
        if let Err(e) = editor.apply(EditorCommand::Resize { size }) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    let grid = match import_file(input, editor.grid_size()) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: Cannot import '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let colors = grid.distinct_colors().len();
    editor.replace_grid(grid);

    if let Err(code) = save_state(&editor, output) {
        return code;
    }

    println!(
        "Imported: {} -> {} ({}x{}, {} colors, frame {})",
        input.display(),
        output.display(),
        editor.grid_size(),
        editor.grid_size(),
        colors,
        editor.frames().current_index()
    );
    ExitCode::from(EXIT_SUCCESS)
}
