//! Pull offset tracking: merges list scroll and pan gestures into one offset.
//!
//! Scroll positions from the wrapped list and pan updates from the recognizer
//! arrive on two sources; both are pushed into an [`EventQueue`] and consumed
//! strictly in arrival order.

use crate::animation::{AnimatedValue, Channel, MotionConfig};
use crate::gesture::PanEvent;
use std::collections::VecDeque;
use tracing::trace;

/// One ordered input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The wrapped list reported a new vertical scroll offset.
    Scroll {
        /// Absolute scroll offset (0 at the top, negative while overscrolled)
        offset_y: f32,
    },
    /// The pan recognizer produced an update or end.
    Pan(PanEvent),
}

/// FIFO merge point of the scroll and pan sources.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue any input.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Enqueue a scroll position.
    pub fn push_scroll(&mut self, offset_y: f32) {
        self.events.push_back(InputEvent::Scroll { offset_y });
    }

    /// Enqueue a pan event.
    pub fn push_pan(&mut self, pan: PanEvent) {
        self.events.push_back(InputEvent::Pan(pan));
    }

    /// Take the oldest event.
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop everything pending.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Result of a drag release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// A refresh is in flight; the release was ignored.
    Locked,
    /// The pull reached the threshold.
    Commit {
        /// Offset at release
        offset: f32,
    },
    /// The pull fell short.
    Cancelled {
        /// Offset at release
        offset: f32,
    },
}

/// Owns the pull offset, the mirrored list scroll position and the
/// indicator-active flag.
#[derive(Debug, Clone)]
pub struct PullTracker {
    list_offset: f32,
    pull: AnimatedValue,
    indicator_active: bool,
}

impl Default for PullTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PullTracker {
    /// A tracker at rest with the list at its top.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list_offset: 0.0,
            pull: AnimatedValue::new(0.0),
            indicator_active: false,
        }
    }

    /// Current pull offset.
    #[must_use]
    pub fn pull_offset(&self) -> f32 {
        self.pull.value()
    }

    /// Mirrored list scroll position.
    #[must_use]
    pub const fn list_offset(&self) -> f32 {
        self.list_offset
    }

    /// Whether the indicator is showing.
    #[must_use]
    pub const fn indicator_active(&self) -> bool {
        self.indicator_active
    }

    /// Whether the offset is animating toward a target.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.pull.is_animating()
    }

    /// Record the wrapped list's scroll position. Only gates admission.
    pub fn on_scroll(&mut self, offset_y: f32) {
        self.list_offset = offset_y;
    }

    /// Apply a drag update. Returns whether the translation was admitted.
    ///
    /// A pull may only start with the list at its top and the finger moving
    /// down, or continue once the indicator is already out. While `locked`
    /// neither the offset nor the indicator flag changes.
    pub fn on_drag_update(&mut self, translation_y: f32, velocity_y: f32, locked: bool) -> bool {
        if !locked {
            self.indicator_active = self.pull.value() > 0.0;
        }

        let at_top = self.list_offset <= 0.0 && velocity_y >= 0.0;
        let admitted = (at_top || self.indicator_active) && !locked;
        if admitted {
            self.pull.set_immediate(translation_y);
        }
        trace!(
            translation_y,
            velocity_y,
            list_offset = self.list_offset,
            locked,
            admitted,
            "drag update"
        );
        admitted
    }

    /// Classify a drag release against `refresh_height`.
    ///
    /// The tracker only decides; returning the offset home on a short pull
    /// is an effect of the refresh transition.
    #[must_use]
    pub fn on_drag_end(&self, refresh_height: f32, locked: bool) -> Release {
        if locked {
            return Release::Locked;
        }
        let offset = self.pull.value();
        if offset >= refresh_height {
            Release::Commit { offset }
        } else {
            Release::Cancelled { offset }
        }
    }

    /// Drive the offset toward `channel`.
    pub fn animate_offset(&mut self, channel: Channel, motion: &MotionConfig) {
        self.pull.apply(channel, motion);
    }

    /// Force the indicator flag (managed loading and completion).
    pub fn set_indicator_active(&mut self, active: bool) {
        self.indicator_active = active;
    }

    /// Advance the offset animation by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.pull.update(dt);
    }
}
