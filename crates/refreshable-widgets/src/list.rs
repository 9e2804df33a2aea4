//! Plain vertical list used as the wrapper's scrollable child.

use refreshable_core::{
    AccessibleRole, Canvas, Color, Constraints, Event, LayoutResult, Point, PointerId, Rect,
    Size, TextStyle, TouchId, TypeId, Widget,
};
use std::any::Any;

/// A widget whose vertical scroll position the refresh wrapper observes.
pub trait ScrollableList: Widget + 'static {
    /// Current scroll offset: 0 at the top, negative while overscrolled.
    fn scroll_offset(&self) -> f32;

    /// Whether the list may overscroll past its ends.
    fn bounces(&self) -> bool;

    /// Enable or disable overscroll.
    fn set_bounces(&mut self, bounces: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragSource {
    Touch(TouchId),
    Pointer(PointerId),
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    source: DragSource,
    start_y: f32,
    start_offset: f32,
}

/// Fixed-row-height vertical list of text rows.
#[derive(Debug, Clone)]
pub struct ListView {
    rows: Vec<String>,
    item_height: f32,
    scroll_offset: f32,
    bounces: bool,
    bounds: Rect,
    drag: Option<Drag>,
    text_style: TextStyle,
    row_color: Color,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            item_height: 48.0,
            scroll_offset: 0.0,
            bounces: true,
            bounds: Rect::default(),
            drag: None,
            text_style: TextStyle::default(),
            row_color: Color::WHITE,
        }
    }
}

impl ListView {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rows.
    #[must_use]
    pub fn rows(mut self, rows: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Set the row height.
    #[must_use]
    pub const fn item_height(mut self, height: f32) -> Self {
        self.item_height = height;
        self
    }

    /// Replace the rows, keeping the scroll position in range.
    pub fn set_rows(&mut self, rows: impl IntoIterator<Item = impl Into<String>>) {
        self.rows = rows.into_iter().map(Into::into).collect();
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total height of all rows.
    #[must_use]
    pub fn content_height(&self) -> f32 {
        self.rows.len() as f32 * self.item_height
    }

    /// Scroll to an absolute offset, clamped to the content.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll());
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height() - self.bounds.height).max(0.0)
    }

    fn begin_drag(&mut self, source: DragSource, position: Point) {
        if self.drag.is_none() && self.bounds.contains_point(&position) {
            self.drag = Some(Drag {
                source,
                start_y: position.y,
                start_offset: self.scroll_offset,
            });
        }
    }

    fn drag_to(&mut self, source: DragSource, y: f32) -> Option<Box<dyn Any + Send>> {
        let drag = self.drag.filter(|d| d.source == source)?;
        let raw = drag.start_offset - (y - drag.start_y);
        let floor = if self.bounces { f32::NEG_INFINITY } else { 0.0 };
        let ceiling = if self.bounces {
            f32::INFINITY
        } else {
            self.max_scroll()
        };
        self.set_offset(raw.clamp(floor, ceiling))
    }

    fn release(&mut self, source: DragSource) -> Option<Box<dyn Any + Send>> {
        self.drag.filter(|d| d.source == source)?;
        self.drag = None;
        let settled = self.scroll_offset.clamp(0.0, self.max_scroll());
        self.set_offset(settled)
    }

    fn set_offset(&mut self, offset: f32) -> Option<Box<dyn Any + Send>> {
        if offset == self.scroll_offset {
            return None;
        }
        self.scroll_offset = offset;
        Some(Box::new(ListScrolled { offset }))
    }
}

impl ScrollableList for ListView {
    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn bounces(&self) -> bool {
        self.bounces
    }

    fn set_bounces(&mut self, bounces: bool) {
        self.bounces = bounces;
    }
}

impl Widget for ListView {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(Size::new(constraints.max_width, self.content_height()))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if self.item_height <= 0.0 {
            return;
        }
        canvas.push_clip(self.bounds);

        let first = (self.scroll_offset.max(0.0) / self.item_height) as usize;
        let visible = (self.bounds.height / self.item_height).ceil() as usize + 1;
        for (i, row) in self.rows.iter().enumerate().skip(first).take(visible) {
            let y = (i as f32).mul_add(self.item_height, self.bounds.y - self.scroll_offset);
            let row_rect = Rect::new(self.bounds.x, y, self.bounds.width, self.item_height);
            canvas.fill_rect(row_rect, self.row_color);
            let baseline = Point::new(
                self.bounds.x + 16.0,
                y + (self.item_height + self.text_style.size) / 2.0,
            );
            canvas.draw_text(row, baseline, &self.text_style);
        }

        canvas.pop_clip();
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match *event {
            Event::Scroll { delta_y } => {
                let target = (self.scroll_offset + delta_y).clamp(0.0, self.max_scroll());
                self.set_offset(target)
            }
            Event::TouchStart { id, position } => {
                self.begin_drag(DragSource::Touch(id), position);
                None
            }
            Event::PointerDown {
                pointer_id,
                position,
                is_primary: true,
            } => {
                self.begin_drag(DragSource::Pointer(pointer_id), position);
                None
            }
            Event::TouchMove { id, position } => self.drag_to(DragSource::Touch(id), position.y),
            Event::PointerMove {
                pointer_id,
                position,
            } => self.drag_to(DragSource::Pointer(pointer_id), position.y),
            Event::TouchEnd { id, .. } | Event::TouchCancel { id } => {
                self.release(DragSource::Touch(id))
            }
            Event::PointerUp { pointer_id, .. } | Event::PointerCancel { pointer_id } => {
                self.release(DragSource::Pointer(pointer_id))
            }
            Event::PointerDown { .. } => None,
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::List
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Message emitted when the list scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListScrolled {
    /// New scroll offset
    pub offset: f32,
}
