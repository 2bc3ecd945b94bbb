//! Pointer-driven tool state machine.
//!
//! The controller never touches surfaces or lists directly: each event yields [`ToolAction`]s
//! that the canvas engine applies, so every mutation goes through one place.

use serde::{Deserialize, Serialize};

use crate::edit::brush::{Brush, RecentColors};
use crate::edit::input::DocPointer;
use crate::edit::stroke::{Stroke, StrokeKind};
use crate::edit::text::TextStore;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{Point, Vec2};

/// Active tool, selected by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Freehand painting.
    #[default]
    Pen,
    /// Freehand erasing of user content.
    Eraser,
    /// Paint-bucket fill of the current stage's part.
    Fill,
    /// Text placement; pointer input only drags the pending item.
    Text,
}

/// Mutation requested by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolAction {
    /// The in-progress stroke changed; refresh the preview.
    PreviewStroke,
    /// A drag ended; commit the stroke and record it.
    CommitStroke(Stroke),
    /// Fill the current stage's part.
    Fill(Rgb8),
    /// Move the pending text item.
    MoveText(Vec2),
}

#[derive(Clone, Debug, Default)]
enum Drag {
    #[default]
    Idle,
    Stroking(Stroke),
    DraggingText {
        last: Point,
    },
}

/// Tool × drag state machine.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    tool: Tool,
    brush: Brush,
    recent: RecentColors,
    drag: Drag,
}

impl InteractionController {
    /// Controller with the default pen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Current brush.
    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Recently used colors.
    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent
    }

    /// Switch tools. A stroke in progress is committed first.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<ToolAction> {
        let out = self.finish_drag(None);
        self.tool = tool;
        out
    }

    /// Select a color and remember it.
    pub fn set_color(&mut self, color: Rgb8) {
        self.brush.set_color(color);
        self.recent.push(color);
    }

    /// Set the brush width (clamped).
    pub fn set_width(&mut self, width: f64) {
        self.brush.set_width(width);
    }

    /// Set the brush opacity (clamped).
    pub fn set_opacity(&mut self, opacity: f32) {
        self.brush.set_opacity(opacity);
    }

    /// Stroke currently being drawn.
    pub fn in_progress(&self) -> Option<&Stroke> {
        match &self.drag {
            Drag::Stroking(s) => Some(s),
            _ => None,
        }
    }

    /// Whether a drag (stroke or text) is active.
    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, Drag::Idle)
    }

    /// Handle one pointer event.
    pub fn handle(&mut self, ev: DocPointer, texts: &TextStore) -> Vec<ToolAction> {
        match ev {
            DocPointer::Down(p) | DocPointer::Move(p) if !p.is_finite() => {
                tracing::debug!(?ev, "non-finite pointer position ignored");
                Vec::new()
            }
            DocPointer::Up(p) if !p.is_finite() => self.finish_drag(None),
            DocPointer::Down(p) => {
                // A stray down without an up closes the previous drag.
                let mut out = self.finish_drag(None);
                if texts.hit_pending(p) {
                    self.drag = Drag::DraggingText { last: p };
                    return out;
                }
                match self.tool {
                    Tool::Pen | Tool::Eraser => {
                        let kind = if self.tool == Tool::Pen {
                            StrokeKind::Pen
                        } else {
                            StrokeKind::Eraser
                        };
                        self.drag = Drag::Stroking(Stroke::begin(kind, &self.brush, p));
                        out.push(ToolAction::PreviewStroke);
                    }
                    Tool::Fill => out.push(ToolAction::Fill(self.brush.color())),
                    Tool::Text => {}
                }
                out
            }
            DocPointer::Move(p) => match &mut self.drag {
                Drag::Stroking(s) => {
                    if s.push(p) {
                        vec![ToolAction::PreviewStroke]
                    } else {
                        Vec::new()
                    }
                }
                Drag::DraggingText { last } => {
                    let delta = p - *last;
                    *last = p;
                    vec![ToolAction::MoveText(delta)]
                }
                Drag::Idle => Vec::new(),
            },
            DocPointer::Up(p) => self.finish_drag(Some(p)),
            DocPointer::Leave => self.finish_drag(None),
        }
    }

    fn finish_drag(&mut self, at: Option<Point>) -> Vec<ToolAction> {
        match std::mem::take(&mut self.drag) {
            Drag::Idle => Vec::new(),
            Drag::Stroking(mut s) => {
                if let Some(p) = at {
                    s.push(p);
                }
                vec![ToolAction::CommitStroke(s)]
            }
            Drag::DraggingText { last } => match at {
                Some(p) if p != last => vec![ToolAction::MoveText(p - last)],
                _ => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/tools.rs"]
mod tests;
