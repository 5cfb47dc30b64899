//! Export command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::{ExportFormat, PxsConfig};
use crate::gif::save_gif;
use crate::onion::{ghost_before, render_preview};
use crate::output::{generate_output_path, save_png, unix_timestamp};

use super::{open_state, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the export command
pub fn run_export(
    state: &Path,
    output: Option<&Path>,
    frame: Option<usize>,
    onion: bool,
    config: &PxsConfig,
) -> ExitCode {
    let editor = match open_state(state, config) {
        Ok(editor) => editor,
        Err(code) => return code,
    };

    let format = config.export.format;
    let scale = config.export.scale;
    let frames = editor.frames();

    if format == ExportFormat::Gif && (frame.is_some() || onion) {
        eprintln!("Error: --frame and --onion cannot be combined with GIF export");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let output_path = generate_output_path(output, unix_timestamp(), format.extension());

    let result = match format {
        ExportFormat::Png => {
            let index = frame.unwrap_or_else(|| frames.current_index());
            let grid = match frames.get(index) {
                Some(f) => &f.grid,
                None => {
                    eprintln!("Error: Frame {} out of range ({} frame(s))", index, frames.len());
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
            };
            let ghost = if onion { ghost_before(frames, index, config.editor.onion_opacity) } else { None };
            save_png(&render_preview(grid, ghost.as_ref(), scale), &output_path)
        }
        ExportFormat::Gif => save_gif(frames.as_slice(), editor.fps(), scale, &output_path),
    };

    if let Err(e) = result {
        eprintln!("Error: Failed to write '{}': {}", output_path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    log::info!("exported {} frame(s) at scale {}", frames.len(), scale);
    println!("Saved: {}", output_path.display());
    ExitCode::from(EXIT_SUCCESS)
}
