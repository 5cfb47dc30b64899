//! Frame sequence and playback scheduling.
//!
//! [`Frames`] keeps an ordered, never-empty list of grids with a current-frame
//! pointer. [`RepeatingTask`] is the playback timer: an explicitly started and
//! cancelled repeating schedule that the host polls with its own clock, so no
//! background thread or callback can outlive the editor.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Playback rate bounds, in frames per second.
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 30;
pub const DEFAULT_FPS: u32 = 8;

/// One animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: u64,
    pub grid: Grid,
}

/// Ordered frames plus the index of the one being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Frames {
    frames: Vec<Frame>,
    current: usize,
    next_id: u64,
}

impl Frames {
    /// A single-frame sequence holding `grid`.
    pub fn new(grid: Grid) -> Self {
        Self { frames: vec![Frame { id: 1, grid }], current: 0, next_id: 2 }
    }

    /// Adopt existing frames. An empty list becomes one frame of `fallback`.
    pub fn from_frames(frames: Vec<Frame>, current: usize, fallback: Grid) -> Self {
        if frames.is_empty() {
            return Self::new(fallback);
        }
        let next_id = frames.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        let current = current.min(frames.len() - 1);
        Self { frames, current, next_id }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Frame {
        &self.frames[self.current]
    }

    pub fn current_grid(&self) -> &Grid {
        &self.frames[self.current].grid
    }

    /// Replace the current frame's grid.
    pub fn set_current_grid(&mut self, grid: Grid) {
        self.frames[self.current].grid = grid;
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[Frame] {
        &self.frames
    }

    /// Frame before the current one, if any.
    pub fn previous(&self) -> Option<&Frame> {
        self.current.checked_sub(1).and_then(|i| self.frames.get(i))
    }

    /// Append a copy of the current grid and select it.
    pub fn add(&mut self) {
        let id = self.allocate_id();
        let grid = self.current_grid().clone();
        self.frames.push(Frame { id, grid });
        self.current = self.frames.len() - 1;
    }

    /// Insert a copy of the current frame right after it and select the copy.
    pub fn duplicate(&mut self) {
        let id = self.allocate_id();
        let grid = self.current_grid().clone();
        self.frames.insert(self.current + 1, Frame { id, grid });
        self.current += 1;
    }

    /// Remove the current frame and select its predecessor.
    ///
    /// Returns false (and does nothing) when only one frame is left.
    pub fn delete(&mut self) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        self.frames.remove(self.current);
        self.current = self.current.saturating_sub(1);
        true
    }

    /// Select frame `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.frames.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Select the next frame, wrapping to the first.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.frames.len();
    }

    /// Apply `f` to every frame's grid.
    pub fn map_grids(&mut self, f: impl Fn(&Grid) -> Grid) {
        for frame in &mut self.frames {
            frame.grid = f(&frame.grid);
        }
    }
}

/// Interval between frames at `fps`, clamped to the supported range.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(fps.clamp(MIN_FPS, MAX_FPS)))
}

/// Identifies one started schedule. A new handle is issued on every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Schedule {
    handle: TaskHandle,
    interval: Duration,
    next_due: Instant,
}

/// A cancelable repeating timer driven by caller-supplied instants.
#[derive(Debug, Clone, Default)]
pub struct RepeatingTask {
    active: Option<Schedule>,
    issued: u64,
}

impl RepeatingTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start firing every `interval` from `now`, cancelling any running schedule.
    pub fn start(&mut self, interval: Duration, now: Instant) -> TaskHandle {
        self.cancel();
        self.issued += 1;
        let handle = TaskHandle(self.issued);
        let interval = interval.max(Duration::from_millis(1));
        self.active = Some(Schedule { handle, interval, next_due: now + interval });
        handle
    }

    /// Stop the running schedule, returning its handle if there was one.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        self.active.take().map(|s| s.handle)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<TaskHandle> {
        self.active.as_ref().map(|s| s.handle)
    }

    /// Number of periods that elapsed up to `now`; reschedules past them.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(schedule) = self.active.as_mut() else {
            return 0;
        };
        let mut fired = 0;
        while schedule.next_due <= now {
            schedule.next_due += schedule.interval;
            fired += 1;
        }
        fired
    }
}
