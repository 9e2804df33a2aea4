//! Integration tests for refreshable-core.
//!
//! These drive the public API end to end: raw touch events through the pan
//! recognizer into a controller, with time advanced frame by frame.

use proptest::prelude::*;
use refreshable_core::{
    Event, InputEvent, PanRecognizer, Point, Rect, RefreshConfig, RefreshController,
    RefreshPhase, StrokeMode, TouchId, RING_CIRCUMFERENCE,
};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 360.0, 640.0);
const FRAME_MS: f64 = 1000.0 / 60.0;

/// A controller plus the recognizer and clock a widget would own.
struct Harness {
    controller: RefreshController,
    pan: PanRecognizer,
    now: f64,
    refreshes: usize,
}

impl Harness {
    fn new(config: RefreshConfig) -> Self {
        Self {
            controller: RefreshController::new(config),
            pan: PanRecognizer::new(),
            now: 0.0,
            refreshes: 0,
        }
    }

    fn feed(&mut self, event: &Event) {
        if let Some(pan) = self.pan.process(event, BOUNDS, self.now) {
            let outcome = self.controller.handle(InputEvent::Pan(pan));
            self.refreshes += usize::from(outcome.refresh_requested);
        }
    }

    fn tick(&mut self) {
        self.now += FRAME_MS / 1000.0;
        self.controller.advance(FRAME_MS);
    }

    fn run_for(&mut self, ms: f64) {
        let frames = (ms / FRAME_MS).ceil() as usize;
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Touch down at y=100, move through `translations`, then lift.
    fn swipe(&mut self, translations: &[f32]) {
        let id = TouchId(1);
        self.feed(&Event::TouchStart {
            id,
            position: Point::new(180.0, 100.0),
        });
        let mut last = 100.0;
        for &dy in translations {
            self.tick();
            last = 100.0 + dy;
            self.feed(&Event::TouchMove {
                id,
                position: Point::new(180.0, last),
            });
        }
        self.feed(&Event::TouchEnd {
            id,
            position: Point::new(180.0, last),
        });
    }

    fn scroll_list(&mut self, offset_y: f32) {
        self.controller.handle(InputEvent::Scroll { offset_y });
    }
}

// =============================================================================
// Gesture scenarios
// =============================================================================

#[test]
fn test_swipe_past_threshold_refreshes_once() {
    let mut h = Harness::new(RefreshConfig::default());
    h.swipe(&[20.0, 60.0, 110.0]);
    assert_eq!(h.refreshes, 1);
    assert_eq!(h.controller.phase(), RefreshPhase::Committed);
    assert_eq!(h.controller.indicator().label, "Refreshing...");
}

#[test]
fn test_swipe_back_below_threshold_cancels() {
    let mut h = Harness::new(RefreshConfig::default());
    h.swipe(&[20.0, 60.0, 40.0]);
    assert_eq!(h.refreshes, 0);
    assert_eq!(h.controller.phase(), RefreshPhase::Idle);

    h.run_for(400.0);
    assert_eq!(h.controller.pull_offset(), 0.0);
    assert_eq!(h.controller.indicator().content_translate_y, 0.0);
}

#[test]
fn test_swipe_on_scrolled_list_does_nothing() {
    let mut h = Harness::new(RefreshConfig::default());
    h.scroll_list(480.0);
    h.swipe(&[30.0, 90.0, 150.0]);
    assert_eq!(h.refreshes, 0);
    assert_eq!(h.controller.pull_offset(), 0.0);
}

#[test]
fn test_refresh_cycle_with_caller_loading() {
    let mut h = Harness::new(RefreshConfig::default());
    h.swipe(&[40.0, 120.0]);
    assert_eq!(h.refreshes, 1);

    h.controller.set_loading(true);
    h.run_for(400.0);
    assert_eq!(h.controller.phase(), RefreshPhase::Refreshing);
    let indicator = h.controller.indicator();
    assert!((indicator.content_translate_y - 100.0).abs() < 1e-3);
    assert!((indicator.stroke_dash_offset - 0.75 * RING_CIRCUMFERENCE).abs() < 1e-3);

    // Swiping again mid-refresh is ignored.
    h.swipe(&[50.0, 200.0]);
    assert_eq!(h.refreshes, 1);

    h.controller.set_loading(false);
    assert_eq!(h.controller.phase(), RefreshPhase::Done);
    h.run_for(600.0);
    assert_eq!(h.controller.phase(), RefreshPhase::Idle);
    assert_eq!(h.controller.pull_offset(), 0.0);

    // A fresh pull is accepted again.
    h.swipe(&[60.0, 130.0]);
    assert_eq!(h.refreshes, 2);
}

#[test]
fn test_swipe_while_settling_springs_home_without_refresh() {
    let mut h = Harness::new(RefreshConfig::default());
    h.swipe(&[40.0, 120.0]);
    h.controller.set_loading(true);
    h.run_for(400.0);
    h.controller.set_loading(false);
    assert_eq!(h.controller.phase(), RefreshPhase::Done);

    h.swipe(&[20.0, 150.0]);
    assert_eq!(h.refreshes, 1);
    assert_eq!(h.controller.phase(), RefreshPhase::Done);
    assert!(!h.controller.indicator_active());

    h.run_for(1000.0);
    assert_eq!(h.controller.phase(), RefreshPhase::Idle);
    assert!(h.controller.pull_offset().abs() < 1e-3);
    assert!(!h.controller.indicator_active());
    assert!(h.controller.indicator().content_translate_y.abs() < 0.5);
}

#[test]
fn test_managed_loading_shows_indicator_without_drag() {
    let config = RefreshConfig::default()
        .with_managed_loading(true)
        .with_default_animation(true);
    let mut h = Harness::new(config);
    h.controller.set_loading(true);
    assert_eq!(h.controller.phase(), RefreshPhase::Refreshing);

    h.run_for(2000.0);
    assert!((h.controller.pull_offset() - 100.0).abs() < 1e-3);
    let indicator = h.controller.indicator();
    assert!((indicator.loader_scale - 1.0).abs() < 0.01);
    assert!((indicator.loader_translate_y - 10.0).abs() < 1e-3);
    assert_eq!(h.refreshes, 0);
}

#[test]
fn test_teardown_mid_settle() {
    let mut h = Harness::new(RefreshConfig::default().with_managed_loading(true));
    h.controller.set_loading(true);
    h.controller.set_loading(false);
    h.controller.unmount();
    h.run_for(1000.0);
    assert_eq!(h.controller.phase(), RefreshPhase::Done);
    assert!(!h.controller.is_mounted());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_toml_config_drives_controller() {
    let config = RefreshConfig::from_toml_str(
        r#"
        refresh_height = 60.0
        settle_delay_ms = 1000
        stroke_mode = "loading"
        "#,
    )
    .expect("valid config");
    assert_eq!(config.stroke_mode, StrokeMode::Loading);

    let mut h = Harness::new(config);
    h.swipe(&[30.0, 65.0]);
    assert_eq!(h.refreshes, 1);
    assert_eq!(h.controller.indicator().stroke_dash_offset, 0.0);

    h.controller.set_loading(true);
    h.controller.set_loading(false);
    h.run_for(600.0);
    assert_eq!(h.controller.phase(), RefreshPhase::Done);
    h.run_for(500.0);
    assert_eq!(h.controller.phase(), RefreshPhase::Idle);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_any_swipe_refreshes_iff_final_offset_reaches_threshold(
        translations in proptest::collection::vec(1.0f32..250.0, 1..15),
    ) {
        let mut h = Harness::new(RefreshConfig::default());
        h.swipe(&translations);
        let last = *translations.last().unwrap_or(&0.0);
        let expected = usize::from(h.controller.pull_offset() >= 100.0);
        prop_assert_eq!(h.refreshes, expected);
        if last >= 100.0 && h.controller.pull_offset() == last {
            prop_assert_eq!(h.refreshes, 1);
        }
    }

    #[test]
    fn prop_scrolled_list_never_pulls(
        list_offset in 0.5f32..2000.0,
        translations in proptest::collection::vec(-200.0f32..300.0, 1..15),
    ) {
        let mut h = Harness::new(RefreshConfig::default());
        h.scroll_list(list_offset);
        h.swipe(&translations);
        prop_assert_eq!(h.controller.pull_offset(), 0.0);
        prop_assert_eq!(h.refreshes, 0);
    }
}
