//! Info command implementation

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use crate::config::PxsConfig;
use crate::editor::Editor;

use super::{open_state, EXIT_ERROR, EXIT_SUCCESS};

/// Per-frame statistics
#[derive(Debug, Serialize)]
pub struct FrameSummary {
    pub id: u64,
    pub painted: usize,
    pub colors: usize,
}

/// Overview of a stored sprite
#[derive(Debug, Serialize)]
pub struct StateSummary {
    pub grid_size: usize,
    pub zoom: f32,
    pub fps: u32,
    pub palette: String,
    pub current_frame: usize,
    pub frames: Vec<FrameSummary>,
    pub recent_colors: Vec<String>,
}

impl StateSummary {
    pub fn of(editor: &Editor) -> Self {
        let frames = editor
            .frames()
            .iter()
            .map(|frame| FrameSummary {
                id: frame.id,
                painted: frame.grid.cells().filter(|(_, _, c)| !c.is_transparent()).count(),
                colors: frame.grid.distinct_colors().len(),
            })
            .collect();

        Self {
            grid_size: editor.grid_size(),
            zoom: editor.zoom(),
            fps: editor.fps(),
            palette: editor.palette().to_string(),
            current_frame: editor.frames().current_index(),
            frames,
            recent_colors: editor.recent_colors().as_slice().iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Execute the info command
pub fn run_info(state: &Path, json: bool, config: &PxsConfig) -> ExitCode {
    let editor = match open_state(state, config) {
        Ok(editor) => editor,
        Err(code) => return code,
    };
    let summary = StateSummary::of(&editor);

    if json {
        return match serde_json::to_string_pretty(&summary) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    println!("Sprite: {}", state.display());
    println!("  Grid:    {}x{}", summary.grid_size, summary.grid_size);
    println!("  Zoom:    {}", summary.zoom);
    println!("  FPS:     {}", summary.fps);
    println!("  Palette: {}", summary.palette);
    println!("  Frames:  {}", summary.frames.len());
    for (i, frame) in summary.frames.iter().enumerate() {
        let marker = if i == summary.current_frame { "*" } else { " " };
        println!(
            "   {}{:>3}  id {:<4} {} painted, {} colors",
            marker, i, frame.id, frame.painted, frame.colors
        );
    }
    if !summary.recent_colors.is_empty() {
        println!("  Recent:  {}", summary.recent_colors.join(" "));
    }

    ExitCode::from(EXIT_SUCCESS)
}
