//! The sprite editor: one object owning all editing state.
//!
//! Hosts drive an [`Editor`] with [`EditorCommand`]s and read back a
//! [`RenderView`]. Nothing here renders or reads input devices; playback is
//! advanced by calling [`Editor::tick`] with the host's clock.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{frame_interval, Frames, RepeatingTask, MAX_FPS, MIN_FPS};
use crate::color::Color;
use crate::config::EditorConfig;
use crate::engine::{DrawEngine, Effect, EngineState, PointerEvent, Tool};
use crate::grid::{is_supported_size, Grid, SUPPORTED_SIZES};
use crate::history::{History, HistoryEntry};
use crate::mirror::MirrorMode;
use crate::onion::onion_skin;
use crate::palettes::{PaletteMode, RecentColors};

/// Rejected commands.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unsupported grid size {0} (supported: {sizes:?})", sizes = SUPPORTED_SIZES)]
    UnsupportedSize(usize),
    #[error("fps {0} out of range ({min}-{max})", min = MIN_FPS, max = MAX_FPS)]
    FpsOutOfRange(u32),
    #[error("zoom must be a positive number, got {0}")]
    InvalidZoom(f32),
}

/// A single editor operation, as issued by a UI or read from a script.
///
/// Serialized with a `cmd` tag, e.g. `{"cmd":"pointer_down","x":1,"y":2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum EditorCommand {
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp,
    PointerLeave,
    SetTool { tool: Tool },
    SetColor { color: Color },
    SetMirror { mode: MirrorMode },
    Undo,
    Redo,
    /// Clear the active frame to transparent.
    Clear,
    Resize { size: usize },
    AddFrame,
    DuplicateFrame,
    DeleteFrame,
    SelectFrame { index: usize },
    Play,
    Stop,
    SetFps { fps: u32 },
    SetOnionSkin { enabled: bool },
    SetPalette { mode: PaletteMode },
    SetZoom { zoom: f32 },
    SetGridLines { visible: bool },
}

/// What a command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing observable.
    None,
    /// Only display data (preview, zoom-independent view flags).
    View,
    /// Persisted state changed; the host should schedule a save.
    State,
}

impl Change {
    pub fn is_state(&self) -> bool {
        matches!(self, Change::State)
    }
}

/// Everything a renderer needs for one paint.
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    /// The grid to draw: a pending shape preview, or the active frame.
    pub grid: &'a Grid,
    pub grid_size: usize,
    pub zoom: f32,
    pub show_grid_lines: bool,
    /// Faded previous frame to draw beneath `grid`, when onion skin is on.
    pub onion_skin: Option<Grid>,
}

impl RenderView<'_> {
    /// On-screen size of one cell, in pixels.
    pub fn cell_size(&self) -> f32 {
        self.zoom.max(1.0)
    }
}

/// Editor state and command dispatch.
#[derive(Debug)]
pub struct Editor {
    frames: Frames,
    history: History,
    engine: DrawEngine,
    preview: Option<Grid>,
    recent: RecentColors,
    palette: PaletteMode,
    zoom: f32,
    fps: u32,
    playing: bool,
    playback: RepeatingTask,
    onion_skin: bool,
    onion_opacity: f32,
    show_grid_lines: bool,
}

impl Editor {
    /// A fresh single-frame editor configured from `config`.
    pub fn new(config: &EditorConfig) -> Self {
        let frames = Frames::new(Grid::new(config.grid_size));
        Self::from_parts(frames, RecentColors::new(), config)
    }

    /// Build an editor around existing frames. History starts at the
    /// current frame.
    pub fn from_parts(frames: Frames, recent: RecentColors, config: &EditorConfig) -> Self {
        let history = History::with_baseline(frames.current_grid().clone(), frames.current_index());
        Self {
            frames,
            history,
            engine: DrawEngine::new(Tool::Pencil, Color::rgb(0, 0, 0), config.mirror),
            preview: None,
            recent,
            palette: config.palette,
            zoom: config.zoom,
            fps: config.fps.clamp(MIN_FPS, MAX_FPS),
            playing: false,
            playback: RepeatingTask::new(),
            onion_skin: config.onion_skin,
            onion_opacity: config.onion_opacity,
            show_grid_lines: config.show_grid_lines,
        }
    }

    /// Apply a command using the current time for playback scheduling.
    pub fn apply(&mut self, command: EditorCommand) -> Result<Change, CommandError> {
        self.apply_at(command, Instant::now())
    }

    /// Apply a command; `now` anchors any playback schedule it starts.
    pub fn apply_at(&mut self, command: EditorCommand, now: Instant) -> Result<Change, CommandError> {
        log::trace!("command {:?}", command);
        let change = match command {
            EditorCommand::PointerDown { x, y } => self.pointer(PointerEvent::Down { x, y }),
            EditorCommand::PointerMove { x, y } => self.pointer(PointerEvent::Move { x, y }),
            EditorCommand::PointerUp => self.pointer(PointerEvent::Up),
            EditorCommand::PointerLeave => self.pointer(PointerEvent::Leave),
            EditorCommand::SetTool { tool } => {
                self.engine.set_tool(tool);
                Change::None
            }
            EditorCommand::SetColor { color } => {
                self.engine.set_color(color);
                Change::None
            }
            EditorCommand::SetMirror { mode } => {
                self.engine.set_mirror(mode);
                Change::None
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Clear => self.clear(),
            EditorCommand::Resize { size } => self.resize(size)?,
            EditorCommand::AddFrame => {
                self.end_gesture();
                self.frames.add();
                self.sync_playback(now);
                Change::State
            }
            EditorCommand::DuplicateFrame => {
                self.end_gesture();
                self.frames.duplicate();
                self.sync_playback(now);
                Change::State
            }
            EditorCommand::DeleteFrame => {
                self.end_gesture();
                if self.frames.delete() {
                    self.sync_playback(now);
                    Change::State
                } else {
                    log::debug!("refusing to delete the only frame");
                    Change::None
                }
            }
            EditorCommand::SelectFrame { index } => {
                self.end_gesture();
                if self.frames.select(index) {
                    Change::State
                } else {
                    Change::None
                }
            }
            EditorCommand::Play => {
                self.playing = true;
                self.restart_playback(now);
                Change::View
            }
            EditorCommand::Stop => {
                self.playing = false;
                self.sync_playback(now);
                Change::View
            }
            EditorCommand::SetFps { fps } => {
                if !(MIN_FPS..=MAX_FPS).contains(&fps) {
                    return Err(CommandError::FpsOutOfRange(fps));
                }
                self.fps = fps;
                self.restart_playback(now);
                Change::State
            }
            EditorCommand::SetOnionSkin { enabled } => {
                self.onion_skin = enabled;
                Change::View
            }
            EditorCommand::SetPalette { mode } => {
                self.palette = mode;
                Change::State
            }
            EditorCommand::SetZoom { zoom } => {
                if !(zoom.is_finite() && zoom > 0.0) {
                    return Err(CommandError::InvalidZoom(zoom));
                }
                self.zoom = zoom;
                Change::State
            }
            EditorCommand::SetGridLines { visible } => {
                self.show_grid_lines = visible;
                Change::View
            }
        };
        Ok(change)
    }

    fn pointer(&mut self, event: PointerEvent) -> Change {
        let tool = match self.engine.state() {
            EngineState::Drawing { tool, .. } => tool,
            EngineState::Idle => self.engine.tool(),
        };

        match self.engine.handle(event, self.frames.current_grid()) {
            Effect::None => Change::None,
            Effect::Commit(grid) => {
                self.commit(grid, self.engine.paint_color(tool));
                Change::State
            }
            Effect::Paint(grid) => {
                self.frames.set_current_grid(grid);
                Change::State
            }
            Effect::Preview(grid) => {
                self.preview = Some(grid);
                Change::View
            }
            Effect::EndStroke => {
                // Fold the dragged pixels into the entry pushed at pointer-down
                self.history.amend(self.frames.current_grid().clone());
                Change::None
            }
            Effect::DiscardPreview => {
                self.preview = None;
                Change::View
            }
        }
    }

    /// Install `grid` as the active frame's content and record it.
    fn commit(&mut self, grid: Grid, color: Color) {
        self.preview = None;
        self.frames.set_current_grid(grid.clone());
        self.history.push(grid, self.frames.current_index());
        if self.recent.record(color) {
            log::debug!("recent colors: added {}", color);
        }
    }

    fn end_gesture(&mut self) {
        if self.engine.is_drawing() {
            self.pointer(PointerEvent::Leave);
        }
        self.preview = None;
    }

    fn undo(&mut self) -> Change {
        self.end_gesture();
        let frames = self.frames.len();
        let before = self.history.index();
        match self.history.undo_to(|e| e.frame_index < frames).cloned() {
            Some(entry) => {
                if before - self.history.index() > 1 {
                    log::debug!("undo skipped entries for deleted frames");
                }
                self.restore(entry);
                Change::State
            }
            None => Change::None,
        }
    }

    fn redo(&mut self) -> Change {
        self.end_gesture();
        let frames = self.frames.len();
        let before = self.history.index();
        match self.history.redo_to(|e| e.frame_index < frames).cloned() {
            Some(entry) => {
                if self.history.index() - before > 1 {
                    log::debug!("redo skipped entries for deleted frames");
                }
                self.restore(entry);
                Change::State
            }
            None => Change::None,
        }
    }

    /// Entries whose frame has been deleted are never restored, so the
    /// target frame always exists.
    fn restore(&mut self, entry: HistoryEntry) {
        self.frames.select(entry.frame_index);
        self.frames.set_current_grid(entry.grid);
    }

    fn clear(&mut self) -> Change {
        self.end_gesture();
        if self.frames.current_grid().is_blank() {
            return Change::None;
        }
        let size = self.grid_size();
        self.commit(Grid::new(size), Color::Transparent);
        Change::State
    }

    fn resize(&mut self, size: usize) -> Result<Change, CommandError> {
        if !is_supported_size(size) {
            return Err(CommandError::UnsupportedSize(size));
        }
        if size == self.grid_size() {
            return Ok(Change::None);
        }
        self.end_gesture();
        log::info!("resizing grid {} -> {}", self.grid_size(), size);
        self.frames.map_grids(|g| g.resized(size));
        self.history.reset(self.frames.current_grid().clone(), self.frames.current_index());
        Ok(Change::State)
    }

    /// Replace the active frame with `grid` as one committed edit.
    ///
    /// A grid of a different size is cropped or padded to the editor's size.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.end_gesture();
        let size = self.grid_size();
        let grid = if grid.size() == size { grid } else { grid.resized(size) };
        self.commit(grid, Color::Transparent);
    }

    fn restart_playback(&mut self, now: Instant) {
        self.playback.cancel();
        self.sync_playback(now);
    }

    /// Run the playback task exactly when playing with more than one frame.
    fn sync_playback(&mut self, now: Instant) {
        let should_run = self.playing && self.frames.len() > 1;
        if should_run && !self.playback.is_active() {
            let handle = self.playback.start(frame_interval(self.fps), now);
            log::debug!("playback started at {} fps ({:?})", self.fps, handle);
        } else if !should_run {
            if let Some(handle) = self.playback.cancel() {
                log::debug!("playback stopped ({:?})", handle);
            }
        }
    }

    /// Advance playback to `now`. Returns true if the active frame changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let fired = self.playback.poll(now);
        if fired == 0 {
            return false;
        }
        self.end_gesture();
        let before = self.frames.current_index();
        for _ in 0..fired {
            self.frames.advance();
        }
        self.frames.current_index() != before
    }

    /// Cancel any running playback task.
    pub fn shutdown(&mut self) {
        self.playing = false;
        self.playback.cancel();
    }

    pub fn view(&self) -> RenderView<'_> {
        let onion = if self.onion_skin { onion_skin(&self.frames, self.onion_opacity) } else { None };
        RenderView {
            grid: self.preview.as_ref().unwrap_or_else(|| self.frames.current_grid()),
            grid_size: self.grid_size(),
            zoom: self.zoom,
            show_grid_lines: self.show_grid_lines,
            onion_skin: onion,
        }
    }

    pub fn grid(&self) -> &Grid {
        self.frames.current_grid()
    }

    pub fn preview(&self) -> Option<&Grid> {
        self.preview.as_ref()
    }

    pub fn grid_size(&self) -> usize {
        self.frames.current_grid().size()
    }

    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn engine(&self) -> &DrawEngine {
        &self.engine
    }

    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent
    }

    /// Colors of the selected palette.
    pub fn palette_colors(&self) -> Vec<Color> {
        self.palette.colors(&self.recent)
    }

    pub fn palette(&self) -> PaletteMode {
        self.palette
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True while the playback task is scheduled.
    pub fn playback_active(&self) -> bool {
        self.playback.is_active()
    }

    pub fn onion_skin_enabled(&self) -> bool {
        self.onion_skin
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new(&EditorConfig::default())
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn red() -> Color {
        Color::rgb(255, 0, 0)
    }

    fn editor(size: usize) -> Editor {
        let config = EditorConfig { grid_size: size, ..EditorConfig::default() };
        let mut editor = Editor::new(&config);
        editor.apply(EditorCommand::SetColor { color: red() }).unwrap();
        editor
    }

    fn click(editor: &mut Editor, x: i32, y: i32) {
        editor.apply(EditorCommand::PointerDown { x, y }).unwrap();
        editor.apply(EditorCommand::PointerUp).unwrap();
    }

    #[test]
    fn test_pencil_drag_pushes_one_entry() {
        let mut ed = editor(8);
        assert_eq!(ed.history().len(), 1);

        ed.apply(EditorCommand::PointerDown { x: 0, y: 0 }).unwrap();
        for x in 1..5 {
            ed.apply(EditorCommand::PointerMove { x, y: 0 }).unwrap();
        }
        ed.apply(EditorCommand::PointerUp).unwrap();

        assert_eq!(ed.history().len(), 2);
        for x in 0..5 {
            assert_eq!(ed.grid().get(x, 0), Some(red()));
        }
    }

    #[test]
    fn test_undo_redo_full_stroke() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::PointerDown { x: 0, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerMove { x: 1, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerUp).unwrap();
        let stroked = ed.grid().clone();

        assert_eq!(ed.apply(EditorCommand::Undo).unwrap(), Change::State);
        assert!(ed.grid().is_blank());
        assert_eq!(ed.apply(EditorCommand::Redo).unwrap(), Change::State);
        assert_eq!(ed.grid(), &stroked);
    }

    #[test]
    fn test_undo_at_oldest_is_noop() {
        let mut ed = editor(8);
        assert_eq!(ed.apply(EditorCommand::Undo).unwrap(), Change::None);
        assert_eq!(ed.apply(EditorCommand::Redo).unwrap(), Change::None);
    }

    #[test]
    fn test_line_preview_not_committed() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::SetTool { tool: Tool::Line }).unwrap();
        ed.apply(EditorCommand::PointerDown { x: 0, y: 0 }).unwrap();
        assert_eq!(ed.apply(EditorCommand::PointerMove { x: 3, y: 0 }).unwrap(), Change::View);

        assert!(ed.grid().is_blank());
        assert_eq!(ed.view().grid.get(3, 0), Some(red()));
        assert_eq!(ed.history().len(), 1);

        ed.apply(EditorCommand::PointerLeave).unwrap();
        assert!(ed.preview().is_none());
        assert!(ed.grid().is_blank());
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_line_commit_pushes_once() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::SetTool { tool: Tool::Line }).unwrap();
        ed.apply(EditorCommand::PointerDown { x: 0, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerMove { x: 2, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerMove { x: 3, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerUp).unwrap();
        assert_eq!(ed.history().len(), 2);
        assert_eq!(ed.grid().distinct_colors(), vec![red()]);
        assert_eq!(ed.grid().cells().filter(|(_, _, c)| *c == red()).count(), 4);
    }

    #[test]
    fn test_recent_colors_recorded_on_commit() {
        let mut ed = editor(8);
        click(&mut ed, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        ed.apply(EditorCommand::SetColor { color: blue }).unwrap();
        click(&mut ed, 1, 0);
        click(&mut ed, 2, 0);
        assert_eq!(ed.recent_colors().as_slice(), &[blue, red()]);

        ed.apply(EditorCommand::SetTool { tool: Tool::Eraser }).unwrap();
        click(&mut ed, 1, 0);
        assert_eq!(ed.recent_colors().len(), 2);
        assert_eq!(ed.palette_colors(), vec![blue, red()]);
    }

    #[test]
    fn test_undo_switches_frame() {
        let mut ed = editor(8);
        click(&mut ed, 0, 0);
        ed.apply(EditorCommand::AddFrame).unwrap();
        click(&mut ed, 5, 5);
        assert_eq!(ed.frames().current_index(), 1);

        ed.apply(EditorCommand::SelectFrame { index: 0 }).unwrap();
        ed.apply(EditorCommand::Undo).unwrap();
        // The previous entry was recorded on frame 0
        assert_eq!(ed.frames().current_index(), 0);
        ed.apply(EditorCommand::Redo).unwrap();
        assert_eq!(ed.frames().current_index(), 1);
        assert_eq!(ed.grid().get(5, 5), Some(red()));
    }

    #[test]
    fn test_bounded_history_through_editor() {
        let mut ed = editor(16);
        for i in 0..15 {
            click(&mut ed, i, 0);
        }
        assert_eq!(ed.history().len(), 10);
        let mut undos = 0;
        while ed.apply(EditorCommand::Undo).unwrap() == Change::State {
            undos += 1;
        }
        assert_eq!(undos, 9);
        // Oldest reachable state still has the first six clicks
        assert_eq!(ed.grid().cells().filter(|(_, _, c)| *c == red()).count(), 6);
    }

    #[test]
    fn test_extreme_pointer_coordinates_with_mirror() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::SetMirror { mode: MirrorMode::Both }).unwrap();
        for tool in [Tool::Pencil, Tool::Eraser, Tool::Fill] {
            ed.apply(EditorCommand::SetTool { tool }).unwrap();
            for (x, y) in [(i32::MIN, 0), (i32::MAX, i32::MIN), (0, i32::MAX), (i32::MIN, i32::MIN)] {
                ed.apply(EditorCommand::PointerDown { x, y }).unwrap();
                ed.apply(EditorCommand::PointerMove { x: i32::MAX, y: i32::MAX }).unwrap();
                ed.apply(EditorCommand::PointerUp).unwrap();
            }
        }
        assert!(ed.grid().is_blank());
    }

    #[test]
    fn test_line_from_far_off_grid() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::SetTool { tool: Tool::Line }).unwrap();
        ed.apply(EditorCommand::PointerDown { x: i32::MIN, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerMove { x: 5, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerUp).unwrap();
        let painted: Vec<_> = ed.grid().cells().filter(|(_, _, c)| *c == red()).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(painted, (0..=5).map(|x| (x, 0)).collect::<Vec<_>>());

        ed.apply(EditorCommand::SetMirror { mode: MirrorMode::Horizontal }).unwrap();
        ed.apply(EditorCommand::PointerDown { x: i32::MIN, y: i32::MIN }).unwrap();
        ed.apply(EditorCommand::PointerMove { x: i32::MAX, y: i32::MAX }).unwrap();
        ed.apply(EditorCommand::PointerUp).unwrap();
        for i in 0..8 {
            assert_eq!(ed.grid().get(i, i), Some(red()));
            assert_eq!(ed.grid().get(7 - i, i), Some(red()));
        }
    }

    #[test]
    fn test_undo_skips_entries_for_deleted_frames() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::AddFrame).unwrap();
        click(&mut ed, 5, 5);
        ed.apply(EditorCommand::SelectFrame { index: 0 }).unwrap();
        click(&mut ed, 0, 0);
        ed.apply(EditorCommand::SelectFrame { index: 1 }).unwrap();
        ed.apply(EditorCommand::DeleteFrame).unwrap();
        assert_eq!(ed.frames().len(), 1);

        // The entry drawn on the deleted frame is never written onto frame 0
        assert_eq!(ed.apply(EditorCommand::Undo).unwrap(), Change::State);
        assert!(ed.grid().is_blank());
        assert_eq!(ed.history().index(), 0);

        assert_eq!(ed.apply(EditorCommand::Redo).unwrap(), Change::State);
        assert_eq!(ed.grid().get(0, 0), Some(red()));
        assert_eq!(ed.grid().get(5, 5), Some(Color::Transparent));
        assert_eq!(ed.apply(EditorCommand::Redo).unwrap(), Change::None);
    }

    #[test]
    fn test_delete_only_frame_refused() {
        let mut ed = editor(8);
        assert_eq!(ed.apply(EditorCommand::DeleteFrame).unwrap(), Change::None);
        assert_eq!(ed.frames().len(), 1);
    }

    #[test]
    fn test_resize_all_frames() {
        let mut ed = editor(8);
        click(&mut ed, 7, 7);
        ed.apply(EditorCommand::AddFrame).unwrap();
        ed.apply(EditorCommand::Resize { size: 16 }).unwrap();
        assert!(ed.frames().iter().all(|f| f.grid.size() == 16));
        assert_eq!(ed.frames().get(0).and_then(|f| f.grid.get(7, 7)), Some(red()));
        assert_eq!(ed.history().len(), 1);

        assert_eq!(
            ed.apply(EditorCommand::Resize { size: 12 }),
            Err(CommandError::UnsupportedSize(12))
        );
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut ed = editor(8);
        click(&mut ed, 2, 2);
        ed.apply(EditorCommand::Clear).unwrap();
        assert!(ed.grid().is_blank());
        ed.apply(EditorCommand::Undo).unwrap();
        assert_eq!(ed.grid().get(2, 2), Some(red()));
        // Clearing a blank grid records nothing
        let mut blank = editor(8);
        assert_eq!(blank.apply(EditorCommand::Clear).unwrap(), Change::None);
    }

    #[test]
    fn test_playback_advances_frames() {
        let t0 = Instant::now();
        let mut ed = editor(8);
        ed.apply_at(EditorCommand::SetFps { fps: 10 }, t0).unwrap();
        ed.apply_at(EditorCommand::AddFrame, t0).unwrap();
        ed.apply_at(EditorCommand::AddFrame, t0).unwrap();
        ed.apply_at(EditorCommand::SelectFrame { index: 0 }, t0).unwrap();

        ed.apply_at(EditorCommand::Play, t0).unwrap();
        assert!(ed.playback_active());
        assert!(!ed.tick(t0 + Duration::from_millis(50)));
        assert!(ed.tick(t0 + Duration::from_millis(100)));
        assert_eq!(ed.frames().current_index(), 1);
        assert!(ed.tick(t0 + Duration::from_millis(300)));
        assert_eq!(ed.frames().current_index(), 0);

        ed.apply_at(EditorCommand::Stop, t0).unwrap();
        assert!(!ed.playback_active());
        assert!(!ed.tick(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_playback_needs_two_frames() {
        let t0 = Instant::now();
        let mut ed = editor(8);
        ed.apply_at(EditorCommand::Play, t0).unwrap();
        assert!(ed.is_playing());
        assert!(!ed.playback_active());

        ed.apply_at(EditorCommand::AddFrame, t0).unwrap();
        assert!(ed.playback_active());

        ed.apply_at(EditorCommand::DeleteFrame, t0).unwrap();
        assert!(!ed.playback_active());
    }

    #[test]
    fn test_play_twice_restarts_single_task() {
        let t0 = Instant::now();
        let mut ed = editor(8);
        ed.apply_at(EditorCommand::AddFrame, t0).unwrap();
        ed.apply_at(EditorCommand::SetFps { fps: 10 }, t0).unwrap();
        ed.apply_at(EditorCommand::Play, t0).unwrap();
        ed.apply_at(EditorCommand::Play, t0 + Duration::from_millis(60)).unwrap();
        // Only the restarted schedule fires, once, at 160ms
        assert!(!ed.tick(t0 + Duration::from_millis(100)));
        assert!(ed.tick(t0 + Duration::from_millis(160)));
    }

    #[test]
    fn test_set_fps_validation() {
        let mut ed = editor(8);
        assert_eq!(ed.apply(EditorCommand::SetFps { fps: 0 }), Err(CommandError::FpsOutOfRange(0)));
        assert_eq!(ed.apply(EditorCommand::SetFps { fps: 31 }), Err(CommandError::FpsOutOfRange(31)));
        assert_eq!(ed.apply(EditorCommand::SetFps { fps: 30 }), Ok(Change::State));
    }

    #[test]
    fn test_onion_skin_view() {
        let mut ed = editor(8);
        click(&mut ed, 1, 1);
        ed.apply(EditorCommand::AddFrame).unwrap();
        assert!(ed.view().onion_skin.is_none());

        ed.apply(EditorCommand::SetOnionSkin { enabled: true }).unwrap();
        let ghost = ed.view().onion_skin.unwrap();
        assert!(matches!(ghost.get(1, 1), Some(Color::Rgba([255, 0, 0, a])) if a < 255));

        ed.apply(EditorCommand::SelectFrame { index: 0 }).unwrap();
        assert!(ed.view().onion_skin.is_none());
    }

    #[test]
    fn test_selecting_frame_mid_gesture_drops_preview() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::AddFrame).unwrap();
        ed.apply(EditorCommand::SetTool { tool: Tool::Rectangle }).unwrap();
        ed.apply(EditorCommand::PointerDown { x: 0, y: 0 }).unwrap();
        ed.apply(EditorCommand::PointerMove { x: 4, y: 4 }).unwrap();
        ed.apply(EditorCommand::SelectFrame { index: 0 }).unwrap();
        assert!(ed.preview().is_none());
        assert!(!ed.engine().is_drawing());
        assert!(ed.frames().iter().all(|f| f.grid.is_blank()));
    }

    #[test]
    fn test_replace_grid_commits_and_fits() {
        let mut ed = editor(8);
        let mut imported = Grid::new(16);
        imported.set(0, 0, red());
        imported.set(12, 12, red());
        ed.replace_grid(imported);
        assert_eq!(ed.grid_size(), 8);
        assert_eq!(ed.grid().get(0, 0), Some(red()));
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_command_json_shape() {
        let cmd: EditorCommand = serde_json::from_str(r#"{"cmd":"pointer_down","x":1,"y":2}"#).unwrap();
        assert_eq!(cmd, EditorCommand::PointerDown { x: 1, y: 2 });

        let cmd: EditorCommand = serde_json::from_str(r##"{"cmd":"set_color","color":"#00ff00"}"##).unwrap();
        assert_eq!(cmd, EditorCommand::SetColor { color: Color::rgb(0, 255, 0) });

        let cmd: EditorCommand = serde_json::from_str(r#"{"cmd":"set_mirror","mode":"both"}"#).unwrap();
        assert_eq!(cmd, EditorCommand::SetMirror { mode: MirrorMode::Both });

        assert!(serde_json::from_str::<EditorCommand>(r#"{"cmd":"explode"}"#).is_err());
    }

    #[test]
    fn test_view_cell_size() {
        let mut ed = editor(8);
        ed.apply(EditorCommand::SetZoom { zoom: 12.0 }).unwrap();
        assert_eq!(ed.view().cell_size(), 12.0);
        assert!(ed.apply(EditorCommand::SetZoom { zoom: -1.0 }).is_err());
    }
}
