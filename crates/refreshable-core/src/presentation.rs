//! Indicator presentation as a pure function of refresh state.
//!
//! [`present`] is re-evaluated every frame and returns per-channel targets.
//! [`IndicatorAnimator`] owns the animated values and moves them toward those
//! targets with the motion each channel asks for.

use crate::animation::{interpolate, AnimatedValue, Channel, MotionConfig};
use crate::machine::RefreshPhase;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Outer radius of the progress ring.
pub const RING_RADIUS: f32 = 15.0;
/// Stroke width of the progress ring.
pub const RING_STROKE_WIDTH: f32 = 4.0;
/// Radius of the stroked path (outer radius minus half the stroke).
pub const RING_INNER_RADIUS: f32 = RING_RADIUS - RING_STROKE_WIDTH / 2.0;
/// Length of the stroked path.
pub const RING_CIRCUMFERENCE: f32 = 2.0 * PI * RING_INNER_RADIUS;

/// Loader rest position above the content.
const LOADER_HIDDEN_Y: f32 = -10.0;
/// Loader position once fully pulled.
const LOADER_SHOWN_Y: f32 = 10.0;
/// Scale of a collapsed loader. Zero would make the transform singular.
const LOADER_HIDDEN_SCALE: f32 = 0.01;
/// Fraction of the ring left undrawn while loading.
const LOADING_DASH_FRACTION: f32 = 0.75;
/// Loader travel finishes this far before the refresh height.
const LOADER_TRAVEL_INSET: f32 = 20.0;

/// What the progress ring's stroke follows when not loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeMode {
    /// Ring fills as the pull offset grows across `pull_fraction_span`
    #[default]
    PullFraction,
    /// Ring reflects the loading flag only
    Loading,
}

/// Static parameters of the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationConfig {
    /// Pull distance that commits a refresh
    pub refresh_height: f32,
    /// Whether the loader slides and scales in
    pub default_animation_enabled: bool,
    /// Stroke source outside of loading
    pub stroke_mode: StrokeMode,
    /// Pull distance that fills the ring in [`StrokeMode::PullFraction`]
    pub pull_fraction_span: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            refresh_height: 100.0,
            default_animation_enabled: false,
            stroke_mode: StrokeMode::PullFraction,
            pull_fraction_span: 200.0,
        }
    }
}

/// Snapshot of refresh state the mapping reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationInput {
    /// Current phase
    pub phase: RefreshPhase,
    /// Current pull offset
    pub pull_offset: f32,
    /// Caller's loading flag
    pub is_loading: bool,
    /// Whether the indicator is out
    pub indicator_active: bool,
    /// Spinner oscillator value in `[0, 0.5]`
    pub spinner: f32,
}

/// Per-frame indicator targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorFrame {
    /// Loader vertical translation
    pub loader_translate_y: Channel,
    /// Loader uniform scale
    pub loader_scale: Channel,
    /// Content vertical translation
    pub content_translate_y: Channel,
    /// Ring rotation in radians
    pub rotation: f32,
    /// Undrawn length of the ring stroke
    pub stroke_dash_offset: f32,
    /// Status line
    pub label: &'static str,
}

/// Map refresh state to indicator targets.
#[must_use]
pub fn present(input: &PresentationInput, config: &PresentationConfig) -> IndicatorFrame {
    let h = config.refresh_height;
    let active = input.indicator_active;

    let (loader_translate_y, loader_scale) = if !config.default_animation_enabled {
        (Channel::immediate(0.0), Channel::immediate(1.0))
    } else if active {
        let y = interpolate(
            input.pull_offset,
            [0.0, h - LOADER_TRAVEL_INSET],
            [LOADER_HIDDEN_Y, LOADER_SHOWN_Y],
        );
        (Channel::immediate(y), Channel::spring(1.0))
    } else {
        (
            Channel::timing(LOADER_HIDDEN_Y),
            Channel::timing(LOADER_HIDDEN_SCALE),
        )
    };

    let content_translate_y = if !active {
        Channel::timing(0.0)
    } else if input.phase.holds_content() {
        Channel::timing(h)
    } else {
        Channel::immediate(interpolate(input.pull_offset, [0.0, h], [0.0, h]))
    };

    let rotation = if input.is_loading {
        input.spinner * 4.0 * PI
    } else {
        0.0
    };

    IndicatorFrame {
        loader_translate_y,
        loader_scale,
        content_translate_y,
        rotation,
        stroke_dash_offset: stroke_dash_offset(input, config),
        label: input.phase.label(),
    }
}

fn stroke_dash_offset(input: &PresentationInput, config: &PresentationConfig) -> f32 {
    if input.is_loading {
        return LOADING_DASH_FRACTION * RING_CIRCUMFERENCE;
    }
    match config.stroke_mode {
        StrokeMode::Loading => 0.0,
        StrokeMode::PullFraction => {
            let span = config.pull_fraction_span;
            let filled = if span > 0.0 {
                (input.pull_offset / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (1.0 - filled) * RING_CIRCUMFERENCE
        }
    }
}

/// Current animated indicator values, ready to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    /// Loader vertical translation
    pub loader_translate_y: f32,
    /// Loader uniform scale
    pub loader_scale: f32,
    /// Content vertical translation
    pub content_translate_y: f32,
    /// Ring rotation in radians
    pub rotation: f32,
    /// Undrawn length of the ring stroke
    pub stroke_dash_offset: f32,
    /// Status line
    pub label: &'static str,
}

impl IndicatorState {
    /// Sweep angle of the drawn part of the ring.
    #[must_use]
    pub fn sweep(&self) -> f32 {
        let drawn = 1.0 - (self.stroke_dash_offset / RING_CIRCUMFERENCE).clamp(0.0, 1.0);
        drawn * 2.0 * PI
    }
}

/// Animated channels behind the indicator.
#[derive(Debug, Clone)]
pub struct IndicatorAnimator {
    loader_translate_y: AnimatedValue,
    loader_scale: AnimatedValue,
    content_translate_y: AnimatedValue,
    rotation: f32,
    stroke_dash_offset: f32,
    label: &'static str,
}

impl Default for IndicatorAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorAnimator {
    /// Start with the loader collapsed and the content at rest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader_translate_y: AnimatedValue::new(LOADER_HIDDEN_Y),
            loader_scale: AnimatedValue::new(LOADER_HIDDEN_SCALE),
            content_translate_y: AnimatedValue::new(0.0),
            rotation: 0.0,
            stroke_dash_offset: RING_CIRCUMFERENCE,
            label: RefreshPhase::Idle.label(),
        }
    }

    /// Retarget every channel from `frame`.
    pub fn apply(&mut self, frame: &IndicatorFrame, motion: &MotionConfig) {
        self.loader_translate_y.apply(frame.loader_translate_y, motion);
        self.loader_scale.apply(frame.loader_scale, motion);
        self.content_translate_y.apply(frame.content_translate_y, motion);
        self.rotation = frame.rotation;
        self.stroke_dash_offset = frame.stroke_dash_offset;
        self.label = frame.label;
    }

    /// Advance running channel animations by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        self.loader_translate_y.update(dt);
        self.loader_scale.update(dt);
        self.content_translate_y.update(dt);
    }

    /// Whether any channel is still moving.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.loader_translate_y.is_animating()
            || self.loader_scale.is_animating()
            || self.content_translate_y.is_animating()
    }

    /// Current values.
    #[must_use]
    pub fn state(&self) -> IndicatorState {
        IndicatorState {
            loader_translate_y: self.loader_translate_y.value(),
            loader_scale: self.loader_scale.value(),
            content_translate_y: self.content_translate_y.value(),
            rotation: self.rotation,
            stroke_dash_offset: self.stroke_dash_offset,
            label: self.label,
        }
    }
}
