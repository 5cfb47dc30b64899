//! Pointer gesture state machine.
//!
//! [`DrawEngine`] turns a stream of [`PointerEvent`]s into [`Effect`]s on the
//! active grid. It never holds the grid itself: each event is handled against
//! the caller's current grid and the result says what the caller should do
//! with it (commit, paint, preview, or nothing).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::draw::{self, DrawOp};
use crate::grid::Grid;
use crate::mirror::MirrorMode;

/// Drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Line,
    Rectangle,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::Fill => "fill",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
        }
    }

    /// Shape tools only touch the grid when the gesture ends.
    pub fn is_shape(&self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pencil" => Ok(Tool::Pencil),
            "eraser" => Ok(Tool::Eraser),
            "fill" => Ok(Tool::Fill),
            "line" => Ok(Tool::Line),
            "rectangle" | "rect" => Ok(Tool::Rectangle),
            _ => Err(format!("unknown tool '{}'", s)),
        }
    }
}

/// Input from the pointing device, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up,
    Leave,
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Drawing {
        tool: Tool,
        anchor: (i32, i32),
        cursor: (i32, i32),
    },
}

/// What the caller should do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// Replace the active grid and record one history entry.
    Commit(Grid),
    /// Replace the active grid without a history entry (drag continuation).
    Paint(Grid),
    /// Show this grid instead of the active one; do not store it.
    Preview(Grid),
    /// A freehand stroke finished; its pixels are already in the grid.
    EndStroke,
    /// Drop any preview being shown.
    DiscardPreview,
}

/// Tool, brush and mirror settings plus the current gesture.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    tool: Tool,
    color: Color,
    mirror: MirrorMode,
    state: EngineState,
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self {
            tool: Tool::Pencil,
            color: Color::rgb(0, 0, 0),
            mirror: MirrorMode::None,
            state: EngineState::Idle,
        }
    }
}

impl DrawEngine {
    pub fn new(tool: Tool, color: Color, mirror: MirrorMode) -> Self {
        Self { tool, color, mirror, state: EngineState::Idle }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn mirror(&self) -> MirrorMode {
        self.mirror
    }

    pub fn set_mirror(&mut self, mirror: MirrorMode) {
        self.mirror = mirror;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, EngineState::Drawing { .. })
    }

    /// Color the given tool writes; the eraser always writes transparent.
    pub fn paint_color(&self, tool: Tool) -> Color {
        match tool {
            Tool::Eraser => Color::Transparent,
            _ => self.color,
        }
    }

    /// Advance the state machine against `grid`.
    pub fn handle(&mut self, event: PointerEvent, grid: &Grid) -> Effect {
        match (self.state, event) {
            (EngineState::Idle, PointerEvent::Down { x, y }) => {
                let tool = self.tool;
                self.state = EngineState::Drawing { tool, anchor: (x, y), cursor: (x, y) };
                match tool {
                    Tool::Pencil | Tool::Eraser => {
                        let op = DrawOp::Point { x, y, color: self.paint_color(tool) };
                        Effect::Commit(draw::apply(grid, &op, self.mirror))
                    }
                    Tool::Fill => {
                        let op = DrawOp::Flood { x, y, color: self.color };
                        Effect::Commit(draw::apply(grid, &op, self.mirror))
                    }
                    Tool::Line | Tool::Rectangle => Effect::None,
                }
            }
            (EngineState::Drawing { tool, anchor, .. }, PointerEvent::Move { x, y }) => {
                self.state = EngineState::Drawing { tool, anchor, cursor: (x, y) };
                match tool {
                    Tool::Pencil | Tool::Eraser => {
                        let op = DrawOp::Point { x, y, color: self.paint_color(tool) };
                        Effect::Paint(draw::apply(grid, &op, self.mirror))
                    }
                    Tool::Fill => Effect::None,
                    Tool::Line | Tool::Rectangle => {
                        Effect::Preview(self.shape(tool, anchor, (x, y), grid))
                    }
                }
            }
            (EngineState::Drawing { tool, anchor, cursor }, PointerEvent::Up) => {
                self.state = EngineState::Idle;
                if tool.is_shape() {
                    Effect::Commit(self.shape(tool, anchor, cursor, grid))
                } else {
                    Effect::EndStroke
                }
            }
            (EngineState::Drawing { tool, .. }, PointerEvent::Leave) => {
                self.state = EngineState::Idle;
                if tool.is_shape() {
                    Effect::DiscardPreview
                } else {
                    Effect::EndStroke
                }
            }
            _ => Effect::None,
        }
    }

    fn shape(&self, tool: Tool, anchor: (i32, i32), end: (i32, i32), grid: &Grid) -> Grid {
        let (x0, y0) = anchor;
        let (x1, y1) = end;
        let color = self.color;
        let op = match tool {
            Tool::Rectangle => DrawOp::Rect { x0, y0, x1, y1, color },
            _ => DrawOp::Line { x0, y0, x1, y1, color },
        };
        draw::apply(grid, &op, self.mirror)
    }
}
