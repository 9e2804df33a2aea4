//! Pull-to-refresh wrapper around a scrollable list.
//!
//! The wrapper owns a [`RefreshController`] and composes two input sources
//! over the same events: the child list scrolls natively while a pan
//! recognizer tracks the finger. Both feed the controller's queue in
//! arrival order.

use crate::dispatch::{Dispatcher, InlineDispatcher, RefreshCallback};
use crate::list::ScrollableList;
use refreshable_core::{
    AccessibleRole, Canvas, Color, Constraints, ContentOffset, Event, InputEvent, LayoutResult,
    Outcome, PanRecognizer, Point, Rect, RefreshConfig, RefreshController, RefreshPhase, Size,
    TextStyle, Transform2D, TypeId, Widget, RING_INNER_RADIUS, RING_STROKE_WIDTH,
};
use std::any::Any;
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Gap between the status label and the ring.
const LABEL_GAP: f32 = 12.0;

/// Message emitted when the refresh phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPhaseChanged {
    /// Phase before the change
    pub from: RefreshPhase,
    /// Phase after the change
    pub to: RefreshPhase,
}

fn phase_message(outcome: Outcome) -> Option<RefreshPhaseChanged> {
    outcome.phase_change.map(|change| RefreshPhaseChanged {
        from: change.from,
        to: change.to,
    })
}

/// Wraps a [`ScrollableList`] with a pull-to-refresh indicator.
pub struct RefreshableWrapper<L: ScrollableList> {
    child: L,
    controller: RefreshController,
    pan: PanRecognizer,
    on_refresh: Option<RefreshCallback>,
    dispatcher: Arc<dyn Dispatcher>,
    progress_color: Color,
    track_color: Color,
    label_style: TextStyle,
    bounds: Rect,
    clock: f64,
}

impl<L: ScrollableList> fmt::Debug for RefreshableWrapper<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshableWrapper")
            .field("controller", &self.controller)
            .field("bounds", &self.bounds)
            .field("has_on_refresh", &self.on_refresh.is_some())
            .finish_non_exhaustive()
    }
}

impl<L: ScrollableList> RefreshableWrapper<L> {
    /// Wrap `child`. The config's `bounces` is pushed into the child.
    #[must_use]
    pub fn new(mut child: L, config: RefreshConfig) -> Self {
        child.set_bounces(config.bounces);
        let pan = PanRecognizer::new().with_hit_slop(config.hit_slop);
        let mut controller = RefreshController::new(config);
        controller.handle(InputEvent::Scroll {
            offset_y: child.scroll_offset(),
        });
        Self {
            child,
            controller,
            pan,
            on_refresh: None,
            dispatcher: Arc::new(InlineDispatcher),
            progress_color: Color::BLUE,
            track_color: Color::GRAY,
            label_style: TextStyle {
                size: 12.0,
                ..TextStyle::default()
            },
            bounds: Rect::default(),
            clock: 0.0,
        }
    }

    /// Set the refresh callback.
    #[must_use]
    pub fn on_refresh<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_refresh = Some(Arc::new(f));
        self
    }

    /// Route the refresh callback through `dispatcher`.
    #[must_use]
    pub fn dispatcher(mut self, dispatcher: impl Dispatcher + 'static) -> Self {
        self.dispatcher = Arc::new(dispatcher);
        self
    }

    /// Set the progress arc colour.
    #[must_use]
    pub const fn progress_color(mut self, color: Color) -> Self {
        self.progress_color = color;
        self
    }

    /// Mirror the pull offset into `offset`.
    #[must_use]
    pub fn content_offset(mut self, offset: ContentOffset) -> Self {
        self.controller.set_content_offset(offset);
        self
    }

    /// The wrapped list.
    #[must_use]
    pub const fn child(&self) -> &L {
        &self.child
    }

    /// The wrapped list, mutably. Scroll changes made here are picked up on
    /// the next event.
    pub fn child_mut(&mut self) -> &mut L {
        &mut self.child
    }

    /// The refresh state.
    #[must_use]
    pub const fn controller(&self) -> &RefreshController {
        &self.controller
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RefreshPhase {
        self.controller.phase()
    }

    /// Push the caller's loading flag.
    pub fn set_loading(&mut self, loading: bool) -> Option<RefreshPhaseChanged> {
        let outcome = self.controller.set_loading(loading);
        self.finish(outcome)
    }

    /// Advance animations and timers by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f64) -> Option<RefreshPhaseChanged> {
        self.clock += dt_ms.max(0.0) / 1000.0;
        let outcome = self.controller.advance(dt_ms);
        self.finish(outcome)
    }

    fn finish(&self, outcome: Outcome) -> Option<RefreshPhaseChanged> {
        if outcome.refresh_requested {
            match &self.on_refresh {
                Some(callback) => {
                    info!("dispatching refresh");
                    self.dispatcher.dispatch(Arc::clone(callback));
                }
                None => debug!("refresh committed without a callback"),
            }
        }
        phase_message(outcome)
    }

    fn paint_indicator(&self, canvas: &mut dyn Canvas) {
        let indicator = self.controller.indicator();
        let h = self.controller.config().refresh_height;
        let center = Point::new(self.bounds.center().x, self.bounds.y + h / 2.0);

        canvas.push_transform(
            Transform2D::translate(center.x, center.y + indicator.loader_translate_y)
                * Transform2D::scale(indicator.loader_scale, indicator.loader_scale),
        );

        let label_width = indicator.label.len() as f32 * self.label_style.size * 0.5;
        canvas.draw_text(
            indicator.label,
            Point::new(-label_width / 2.0, -(RING_INNER_RADIUS + LABEL_GAP)),
            &self.label_style,
        );
        canvas.stroke_circle(
            Point::ORIGIN,
            RING_INNER_RADIUS,
            self.track_color,
            RING_STROKE_WIDTH,
        );

        let sweep = indicator.sweep();
        if sweep > 0.0 {
            canvas.push_transform(Transform2D::rotate(indicator.rotation));
            canvas.stroke_arc(
                Point::ORIGIN,
                RING_INNER_RADIUS,
                -FRAC_PI_2,
                sweep - FRAC_PI_2,
                self.progress_color,
                RING_STROKE_WIDTH,
            );
            canvas.pop_transform();
        }

        canvas.pop_transform();
    }
}

impl<L: ScrollableList> Widget for RefreshableWrapper<L> {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        self.child.measure(constraints)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.child.layout(bounds);
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.push_clip(self.bounds);
        self.paint_indicator(canvas);

        let offset = self.controller.indicator().content_translate_y;
        canvas.push_transform(Transform2D::translate(0.0, offset));
        self.child.paint(canvas);
        canvas.pop_transform();

        canvas.pop_clip();
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let before = self.child.scroll_offset();
        let child_msg = self.child.event(event);
        let after = self.child.scroll_offset();
        if after != before {
            self.controller.enqueue(InputEvent::Scroll { offset_y: after });
        }

        if let Some(pan) = self.pan.process(event, self.bounds, self.clock) {
            self.controller.enqueue(InputEvent::Pan(pan));
        }

        let outcome = self.controller.process_pending();
        match self.finish(outcome) {
            Some(changed) => Some(Box::new(changed)),
            None => child_msg,
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

impl<L: ScrollableList> Drop for RefreshableWrapper<L> {
    fn drop(&mut self) {
        self.controller.unmount();
    }
}
