//! Edit command implementation
//!
//! Replays `EditorCommand`s against a stored sprite. Edits are batched in
//! [`Autosave`] and only flushed once every command has been accepted, so a
//! failing script leaves the target file as it was.

use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::PxsConfig;
use crate::editor::{Editor, EditorCommand};
use crate::state::{Autosave, JsonFileSink, PersistedState};

use super::{open_state, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// A script line that is not a valid command
#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a JSONL command script.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_commands(text: &str) -> Result<Vec<EditorCommand>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| serde_json::from_str(content).map_err(|source| ScriptError { line, source }))
        .collect()
}

/// Execute the edit command
pub fn run_edit(
    state: &Path,
    script: Option<&Path>,
    inline: &[String],
    output: Option<&Path>,
    config: &PxsConfig,
) -> ExitCode {
    let mut commands = Vec::new();

    if let Some(path) = script {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: Cannot read '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        match parse_commands(&text) {
            Ok(parsed) => commands.extend(parsed),
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    for (i, raw) in inline.iter().enumerate() {
        match serde_json::from_str::<EditorCommand>(raw) {
            Ok(command) => commands.push(command),
            Err(e) => {
                eprintln!("Error: --cmd #{}: {}", i + 1, e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    if commands.is_empty() {
        eprintln!("Error: No commands given (use --script or --cmd)");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut editor = if state.exists() {
        match open_state(state, config) {
            Ok(editor) => editor,
            Err(code) => return code,
        }
    } else {
        log::info!("{} not found, starting a blank sprite", state.display());
        Editor::new(&config.editor)
    };

    let target = output.unwrap_or(state);
    let debounce = Duration::from_millis(config.autosave.debounce_ms);
    let mut autosave = Autosave::new(JsonFileSink::new(target), debounce);

    let total = commands.len();
    let mut edits = 0;
    for (n, command) in commands.into_iter().enumerate() {
        let now = Instant::now();
        match editor.apply_at(command, now) {
            Ok(change) if change.is_state() => {
                edits += 1;
                autosave.schedule(PersistedState::from_editor(&editor), now);
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: command {}: {}", n + 1, e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    editor.shutdown();
    autosave.schedule(PersistedState::from_editor(&editor), Instant::now());
    if let Err(e) = autosave.flush() {
        eprintln!("Error: Failed to save '{}': {}", target.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Applied {} command(s), {} edit(s): {}", total, edits, target.display());
    ExitCode::from(EXIT_SUCCESS)
}
