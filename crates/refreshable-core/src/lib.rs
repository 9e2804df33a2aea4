//! Core types for pull-to-refresh list wrappers.
//!
//! This crate provides the pieces a refresh wrapper is built from:
//! - Geometric primitives and colours: [`Point`], [`Size`], [`Rect`], [`Color`]
//! - Raw input: [`Event`], recognized by [`PanRecognizer`] into [`PanEvent`]s
//! - The pull offset: [`PullTracker`] fed through an [`EventQueue`]
//! - The refresh lifecycle: [`transition`] over [`RefreshPhase`]
//! - Indicator presentation: [`present`] and [`IndicatorAnimator`]
//! - [`RefreshController`], which owns all of the above for one wrapper
//! - Framework seams: [`Widget`], [`Canvas`], [`State`]/[`Command`]
//!
//! # Examples
//!
//! ```
//! use refreshable_core::{InputEvent, PanEvent, RefreshController, RefreshPhase};
//!
//! let mut controller = RefreshController::default();
//! for translation_y in [20.0, 60.0, 110.0] {
//!     controller.handle(InputEvent::Pan(PanEvent::Update { translation_y, velocity_y: 120.0 }));
//! }
//! let outcome = controller.handle(InputEvent::Pan(PanEvent::End));
//! assert!(outcome.refresh_requested);
//! assert_eq!(controller.phase(), RefreshPhase::Committed);
//! ```

mod animation;
mod binding;
pub mod canvas;
mod color;
mod config;
mod constraints;
mod controller;
mod error;
mod event;
mod geometry;
mod gesture;
mod machine;
mod presentation;
mod state;
mod tracker;
pub mod widget;

pub use animation::{
    interpolate, AnimatedValue, Channel, EasedValue, Easing, Motion, MotionConfig,
    Oscillator, Spring, SpringConfig, TimingConfig,
};
pub use binding::ContentOffset;
pub use canvas::{DrawCommand, RecordingCanvas};
pub use color::Color;
pub use config::RefreshConfig;
pub use constraints::Constraints;
pub use controller::{Outcome, PhaseChange, RefreshController};
pub use error::{ColorParseError, ConfigError};
pub use event::{Event, PointerId, TouchId};
pub use geometry::{HitSlop, Point, Rect, Size};
pub use gesture::{PanEvent, PanRecognizer};
pub use machine::{transition, Effect, MachineConfig, PhaseEvent, RefreshPhase, Transition};
pub use presentation::{
    present, IndicatorAnimator, IndicatorFrame, IndicatorState, PresentationConfig,
    PresentationInput, StrokeMode, RING_CIRCUMFERENCE, RING_INNER_RADIUS, RING_RADIUS,
    RING_STROKE_WIDTH,
};
pub use state::{Command, State};
pub use tracker::{EventQueue, InputEvent, PullTracker, Release};
pub use widget::{AccessibleRole, Canvas, LayoutResult, TextStyle, Transform2D, TypeId, Widget};
