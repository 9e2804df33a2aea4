//! Canvas implementations for rendering.

use crate::widget::{Canvas, TextStyle, Transform2D};
use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// Drawing primitive recorded by [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Filled rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Fill color
        color: Color,
    },
    /// Text run
    Text {
        /// Text content
        content: String,
        /// Baseline origin
        position: Point,
        /// Text style
        style: TextStyle,
    },
    /// Stroked circle
    Circle {
        /// Center
        center: Point,
        /// Radius of the stroked path
        radius: f32,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// Stroked arc
    Arc {
        /// Center
        center: Point,
        /// Radius of the stroked path
        radius: f32,
        /// Start angle in radians
        start_angle: f32,
        /// End angle in radians
        end_angle: f32,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
}

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// Every command is stored with the transform and clip that were current
/// when it was drawn, so tests can check where things landed.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    transforms: Vec<Transform2D>,
    clips: Vec<Option<Rect>>,
    clip_stack: Vec<Rect>,
    transform_stack: Vec<Transform2D>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Transform that was current for command `index`.
    #[must_use]
    pub fn transform_at(&self, index: usize) -> Option<Transform2D> {
        self.transforms.get(index).copied()
    }

    /// Clip that was current for command `index`.
    #[must_use]
    pub fn clip_at(&self, index: usize) -> Option<Rect> {
        self.clips.get(index).copied().flatten()
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.transforms.clear();
        self.clips.clear();
        self.clip_stack.clear();
        self.transform_stack.clear();
    }

    /// Get the current transform (identity if no transforms pushed).
    #[must_use]
    pub fn current_transform(&self) -> Transform2D {
        self.transform_stack
            .last()
            .copied()
            .unwrap_or(Transform2D::IDENTITY)
    }

    /// Get the current clip bounds (None if no clips pushed).
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Get the transform stack depth.
    #[must_use]
    pub fn transform_depth(&self) -> usize {
        self.transform_stack.len()
    }

    /// All recorded text runs, in draw order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: DrawCommand) {
        self.transforms.push(self.current_transform());
        self.clips.push(self.current_clip());
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::Rect {
            bounds: rect,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.record(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        self.record(DrawCommand::Circle {
            center,
            radius,
            color,
            width,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        width: f32,
    ) {
        self.record(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            color,
            width,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn push_transform(&mut self, transform: Transform2D) {
        let composed = self.current_transform() * transform;
        self.transform_stack.push(composed);
    }

    fn pop_transform(&mut self) {
        self.transform_stack.pop();
    }
}
