//! Vertical pan recognition from touch and pointer events.
//!
//! The recognizer follows a single finger (the first touch or the primary
//! pointer) and reports its vertical translation since touch-down together
//! with an instantaneous velocity. Timing comes from the caller's frame clock
//! rather than the wall clock so replays are deterministic.

use crate::event::{Event, PointerId, TouchId};
use crate::geometry::{HitSlop, Point, Rect};

/// Frame interval assumed when two samples share a timestamp.
const FALLBACK_FRAME_SECS: f64 = 1.0 / 60.0;

/// High-level pan gesture output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanEvent {
    /// The finger moved.
    Update {
        /// Vertical distance from the touch-down point (positive is downward)
        translation_y: f32,
        /// Vertical velocity in px/s (positive is downward)
        velocity_y: f32,
    },
    /// The finger lifted or the gesture was cancelled.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanSource {
    Touch(TouchId),
    Pointer(PointerId),
}

#[derive(Debug, Clone)]
struct ActivePan {
    source: PanSource,
    start: Point,
    last: Point,
    last_time: f64,
}

/// Single-finger vertical pan recognizer.
#[derive(Debug, Clone, Default)]
pub struct PanRecognizer {
    hit_slop: Option<HitSlop>,
    active: Option<ActivePan>,
}

impl PanRecognizer {
    /// Create a recognizer whose hit region is exactly the widget bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend (or shrink) the region in which a pan may begin.
    #[must_use]
    pub const fn with_hit_slop(mut self, hit_slop: Option<HitSlop>) -> Self {
        self.hit_slop = hit_slop;
        self
    }

    /// Whether a finger is currently being tracked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Region in which a touch-down starts a pan.
    #[must_use]
    pub fn hit_region(&self, bounds: Rect) -> Rect {
        self.hit_slop
            .as_ref()
            .map_or(bounds, |slop| bounds.expand(slop))
    }

    /// Feed one raw event. `now` is the frame clock in seconds.
    pub fn process(&mut self, event: &Event, bounds: Rect, now: f64) -> Option<PanEvent> {
        match *event {
            Event::TouchStart { id, position } => {
                self.begin(PanSource::Touch(id), position, bounds, now);
                None
            }
            Event::PointerDown {
                pointer_id,
                position,
                is_primary: true,
            } => {
                self.begin(PanSource::Pointer(pointer_id), position, bounds, now);
                None
            }
            Event::TouchMove { id, position } => self.track(PanSource::Touch(id), position, now),
            Event::PointerMove {
                pointer_id,
                position,
            } => self.track(PanSource::Pointer(pointer_id), position, now),
            Event::TouchEnd { id, .. } | Event::TouchCancel { id } => {
                self.finish(PanSource::Touch(id))
            }
            Event::PointerUp { pointer_id, .. } | Event::PointerCancel { pointer_id } => {
                self.finish(PanSource::Pointer(pointer_id))
            }
            Event::PointerDown { .. } | Event::Scroll { .. } => None,
        }
    }

    /// Drop any tracked finger without emitting an end.
    pub fn reset(&mut self) {
        self.active = None;
    }

    fn begin(&mut self, source: PanSource, position: Point, bounds: Rect, now: f64) {
        if self.active.is_some() || !self.hit_region(bounds).contains_point(&position) {
            return;
        }
        self.active = Some(ActivePan {
            source,
            start: position,
            last: position,
            last_time: now,
        });
    }

    fn track(&mut self, source: PanSource, position: Point, now: f64) -> Option<PanEvent> {
        let pan = self.active.as_mut().filter(|pan| pan.source == source)?;

        let dy = f64::from(position.y - pan.last.y);
        let dt = now - pan.last_time;
        let dt = if dt > 0.0 { dt } else { FALLBACK_FRAME_SECS };
        let velocity_y = (dy / dt) as f32;

        pan.last = position;
        pan.last_time = now;

        Some(PanEvent::Update {
            translation_y: (position - pan.start).y,
            velocity_y,
        })
    }

    fn finish(&mut self, source: PanSource) -> Option<PanEvent> {
        match &self.active {
            Some(pan) if pan.source == source => {
                self.active = None;
                Some(PanEvent::End)
            }
            _ => None,
        }
    }
}
