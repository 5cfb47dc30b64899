//! Editor persistence
//!
//! The editor's durable state is one serde record, [`PersistedState`], written
//! to a [`StateSink`]. Writes go through [`Autosave`], which coalesces bursts
//! of edits into a single store once the state has been quiet for a debounce
//! interval. Only the newest snapshot is ever written.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{Frame, Frames, DEFAULT_FPS, MAX_FPS, MIN_FPS};
use crate::color::Color;
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::grid::{is_supported_size, Grid};
use crate::palettes::{PaletteMode, RecentColors};

/// Errors reading or writing persisted state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored grid size {0} is not supported")]
    UnsupportedSize(usize),
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

/// Serialized editor state.
///
/// `pixel_data` is the active frame's grid; on restore it wins over the copy
/// inside `pixel_frames`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub pixel_data: Grid,
    pub pixel_grid_size: usize,
    pub pixel_zoom: f32,
    #[serde(default)]
    pub pixel_recent_colors: Vec<Color>,
    #[serde(default)]
    pub pixel_frames: Vec<Frame>,
    #[serde(default = "default_fps")]
    pub pixel_fps: u32,
    #[serde(default)]
    pub pixel_palette_mode: PaletteMode,
    #[serde(default)]
    pub pixel_current_frame: usize,
}

impl PersistedState {
    /// Snapshot an editor.
    pub fn from_editor(editor: &Editor) -> Self {
        Self {
            pixel_data: editor.grid().clone(),
            pixel_grid_size: editor.grid_size(),
            pixel_zoom: editor.zoom(),
            pixel_recent_colors: editor.recent_colors().as_slice().to_vec(),
            pixel_frames: editor.frames().as_slice().to_vec(),
            pixel_fps: editor.fps(),
            pixel_palette_mode: editor.palette(),
            pixel_current_frame: editor.frames().current_index(),
        }
    }

    /// Rebuild an editor. Settings not stored here come from `config`.
    ///
    /// Grids whose size disagrees with `pixel_grid_size` are cropped or
    /// padded to it. An empty frame list becomes a single frame holding
    /// `pixel_data`.
    pub fn into_editor(self, config: &EditorConfig) -> Result<Editor, StateError> {
        let size = self.pixel_grid_size;
        if !is_supported_size(size) {
            return Err(StateError::UnsupportedSize(size));
        }
        let fit = |grid: Grid| if grid.size() == size { grid } else { grid.resized(size) };

        let active = fit(self.pixel_data);
        let stored: Vec<Frame> = self
            .pixel_frames
            .into_iter()
            .map(|frame| Frame { id: frame.id, grid: fit(frame.grid) })
            .collect();
        let mut frames = Frames::from_frames(stored, self.pixel_current_frame, active.clone());
        frames.set_current_grid(active);

        let mut settings = config.clone();
        settings.grid_size = size;
        if self.pixel_zoom.is_finite() && self.pixel_zoom > 0.0 {
            settings.zoom = self.pixel_zoom;
        }
        settings.fps = self.pixel_fps.clamp(MIN_FPS, MAX_FPS);
        settings.palette = self.pixel_palette_mode;

        let recent = RecentColors::from_colors(self.pixel_recent_colors);
        Ok(Editor::from_parts(frames, recent, &settings))
    }
}

/// Somewhere a [`PersistedState`] can be kept.
pub trait StateSink {
    /// The stored state, or `None` if nothing has been stored yet.
    fn load(&mut self) -> Result<Option<PersistedState>, StateError>;

    fn store(&mut self, state: &PersistedState) -> Result<(), StateError>;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSink for JsonFileSink {
    fn load(&mut self) -> Result<Option<PersistedState>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn store(&mut self, state: &PersistedState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory sink; counts stores.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Option<PersistedState>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&PersistedState> {
        self.state.as_ref()
    }

    /// Number of completed stores.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StateSink for MemorySink {
    fn load(&mut self) -> Result<Option<PersistedState>, StateError> {
        Ok(self.state.clone())
    }

    fn store(&mut self, state: &PersistedState) -> Result<(), StateError> {
        self.state = Some(state.clone());
        self.writes += 1;
        Ok(())
    }
}

/// Load an editor from `sink`, or start a fresh one if it is empty.
pub fn restore_editor<S: StateSink>(sink: &mut S, config: &EditorConfig) -> Result<Editor, StateError> {
    match sink.load()? {
        Some(state) => state.into_editor(config),
        None => Ok(Editor::new(config)),
    }
}

#[derive(Debug, Clone)]
struct Pending {
    state: PersistedState,
    due: Instant,
}

/// Debounced, last-write-wins writer in front of a sink.
#[derive(Debug)]
pub struct Autosave<S: StateSink> {
    sink: S,
    debounce: Duration,
    pending: Option<Pending>,
}

impl<S: StateSink> Autosave<S> {
    pub fn new(sink: S, debounce: Duration) -> Self {
        Self { sink, debounce, pending: None }
    }

    /// Queue `state`, replacing any queued snapshot and pushing the deadline
    /// back to `now + debounce`.
    pub fn schedule(&mut self, state: PersistedState, now: Instant) {
        if self.pending.is_some() {
            log::trace!("autosave: coalescing pending snapshot");
        }
        self.pending = Some(Pending { state, due: now + self.debounce });
    }

    /// Store the queued snapshot if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Result<bool, StateError> {
        match &self.pending {
            Some(pending) if pending.due <= now => self.flush(),
            _ => Ok(false),
        }
    }

    /// Store the queued snapshot now. Returns false if nothing was queued.
    ///
    /// On failure the snapshot stays queued.
    pub fn flush(&mut self) -> Result<bool, StateError> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        if let Err(e) = self.sink.store(&pending.state) {
            log::warn!("autosave failed: {}", e);
            self.pending = Some(pending);
            return Err(e);
        }
        log::debug!("autosave: stored {} frame(s)", pending.state.pixel_frames.len());
        Ok(true)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
