//! Animation curves driving the pull offset and indicator channels.
//!
//! Three motions cover every channel of the indicator: an immediate write
//! (finger tracking), a timed ease toward a target, and a spring. An
//! [`AnimatedValue`] owns one channel and retargets only when the requested
//! target or motion actually changes, so re-requesting the same animation on
//! every frame does not restart it.

use serde::{Deserialize, Serialize};

/// Longest physics step taken by a spring in one integration pass (seconds).
const MAX_SPRING_STEP: f64 = 1.0 / 120.0;

// =============================================================================
// Easing
// =============================================================================

/// Standard easing functions for timed animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing)
    Linear,
    /// Quadratic ease in (slow start)
    EaseIn,
    /// Quadratic ease out (slow end)
    EaseOut,
    /// Quadratic ease in and out
    #[default]
    EaseInOut,
    /// Cubic ease out
    CubicOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

// =============================================================================
// Timing and spring parameters
// =============================================================================

/// Parameters of a timed (eased) animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Easing curve
    pub easing: Easing,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: Easing::EaseInOut,
        }
    }
}

/// Spring physics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Mass of the object (affects inertia)
    pub mass: f64,
    /// Stiffness of the spring (affects speed)
    pub stiffness: f64,
    /// Damping coefficient (affects bounciness)
    pub damping: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::BOUNCY
    }
}

impl SpringConfig {
    /// Slightly bouncy spring used for the indicator pop-in.
    pub const BOUNCY: Self = Self {
        mass: 1.0,
        stiffness: 100.0,
        damping: 10.0,
    };

}

/// Timing and spring parameters shared by every animated channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Timed animation parameters
    pub timing: TimingConfig,
    /// Spring parameters
    pub spring: SpringConfig,
}

// =============================================================================
// Spring
// =============================================================================

/// A spring-animated value.
#[derive(Debug, Clone)]
pub struct Spring {
    /// Current value
    pub value: f64,
    /// Target value
    pub target: f64,
    /// Current velocity
    pub velocity: f64,
    /// Spring configuration
    pub config: SpringConfig,
    /// Whether animation is complete
    pub at_rest: bool,
    /// Precision threshold for settling
    pub precision: f64,
}

impl Spring {
    /// Create a new spring at an initial value.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            target: initial,
            velocity: 0.0,
            config: SpringConfig::default(),
            at_rest: true,
            precision: 0.001,
        }
    }

    /// Set spring configuration.
    #[must_use]
    pub const fn with_config(mut self, config: SpringConfig) -> Self {
        self.config = config;
        self
    }

    /// Set target value, keeping the current velocity.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > f64::EPSILON {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Advance the physics by `dt` seconds, sub-stepping long frames.
    pub fn update(&mut self, dt: f64) {
        let mut remaining = dt;
        while remaining > 0.0 && !self.at_rest {
            let step = remaining.min(MAX_SPRING_STEP);
            self.step(step);
            remaining -= step;
        }
    }

    fn step(&mut self, dt: f64) {
        // F = -k * x - c * v
        let displacement = self.value - self.target;
        let spring_force = -self.config.stiffness * displacement;
        let damping_force = -self.config.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.config.mass;

        self.velocity += acceleration * dt;
        self.value += self.velocity * dt;

        let displacement = self.value - self.target;
        if displacement.abs() < self.precision && self.velocity.abs() < self.precision {
            self.value = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    /// Immediately set value without animation.
    pub fn set_immediate(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }
}

// =============================================================================
// EasedValue
// =============================================================================

/// An easing-based animated value.
#[derive(Debug, Clone)]
pub struct EasedValue {
    /// Start value
    pub from: f64,
    /// End value
    pub to: f64,
    /// Total duration in seconds
    pub duration: f64,
    /// Elapsed time
    pub elapsed: f64,
    /// Easing function
    pub easing: Easing,
}

impl EasedValue {
    /// Create new eased animation.
    #[must_use]
    pub const fn new(from: f64, to: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing: Easing::EaseInOut,
        }
    }

    /// Set easing function.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Get current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        let eased = self.easing.apply(self.progress());
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Whether animation is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Update animation.
    pub fn update(&mut self, dt: f64) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Progress from 0.0 to 1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

// =============================================================================
// Motion + AnimatedValue
// =============================================================================

/// How a channel should reach its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Jump to the target this frame
    Immediate,
    /// Ease toward the target over the configured duration
    Timing,
    /// Spring toward the target
    Spring,
}

/// A target value paired with the motion used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Where the channel is heading
    pub target: f32,
    /// How it gets there
    pub motion: Motion,
}

impl Channel {
    /// Jump straight to `target`.
    #[must_use]
    pub const fn immediate(target: f32) -> Self {
        Self {
            target,
            motion: Motion::Immediate,
        }
    }

    /// Ease toward `target`.
    #[must_use]
    pub const fn timing(target: f32) -> Self {
        Self {
            target,
            motion: Motion::Timing,
        }
    }

    /// Spring toward `target`.
    #[must_use]
    pub const fn spring(target: f32) -> Self {
        Self {
            target,
            motion: Motion::Spring,
        }
    }
}

#[derive(Debug, Clone)]
enum Driver {
    Rest,
    Eased(EasedValue),
    Spring(Spring),
}

/// A single animated scalar. The latest request always wins: a new target or
/// motion replaces whatever animation was running, starting from the current
/// value.
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    value: f64,
    target: f64,
    motion: Motion,
    driver: Driver,
}

impl AnimatedValue {
    /// Create a value at rest.
    #[must_use]
    pub fn new(initial: f32) -> Self {
        Self {
            value: f64::from(initial),
            target: f64::from(initial),
            motion: Motion::Immediate,
            driver: Driver::Rest,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value as f32
    }

    /// Value the channel is heading to.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target as f32
    }

    /// Whether an animation is still running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        !matches!(self.driver, Driver::Rest)
    }

    /// Write a value now, cancelling any running animation.
    pub fn set_immediate(&mut self, value: f32) {
        self.value = f64::from(value);
        self.target = self.value;
        self.motion = Motion::Immediate;
        self.driver = Driver::Rest;
    }

    /// Request `channel`. Re-requesting the running target and motion is a
    /// no-op so per-frame callers do not restart the curve.
    pub fn apply(&mut self, channel: Channel, config: &MotionConfig) {
        let target = f64::from(channel.target);
        let unchanged = (self.target - target).abs() <= f64::EPSILON && self.motion == channel.motion;
        if unchanged {
            return;
        }

        self.target = target;
        self.motion = channel.motion;
        self.driver = match channel.motion {
            Motion::Immediate => {
                self.value = target;
                Driver::Rest
            }
            Motion::Timing => {
                let duration = config.timing.duration_ms as f64 / 1000.0;
                Driver::Eased(
                    EasedValue::new(self.value, target, duration).with_easing(config.timing.easing),
                )
            }
            Motion::Spring => {
                let velocity = match &self.driver {
                    Driver::Spring(spring) => spring.velocity,
                    _ => 0.0,
                };
                let mut spring = Spring::new(self.value).with_config(config.spring);
                spring.velocity = velocity;
                spring.set_target(target);
                Driver::Spring(spring)
            }
        };
    }

    /// Advance any running animation by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let finished = match &mut self.driver {
            Driver::Rest => return,
            Driver::Eased(eased) => {
                eased.update(dt);
                self.value = eased.value();
                eased.is_complete()
            }
            Driver::Spring(spring) => {
                spring.update(dt);
                self.value = spring.value;
                spring.at_rest
            }
        };
        if finished {
            self.value = self.target;
            self.driver = Driver::Rest;
        }
    }
}

// =============================================================================
// Oscillator
// =============================================================================

/// A spring that bounces between two values forever, reversing at each end.
#[derive(Debug, Clone)]
pub struct Oscillator {
    spring: Spring,
    low: f64,
    high: f64,
}

impl Oscillator {
    /// Oscillate between `low` and `high`, starting at `low`.
    #[must_use]
    pub fn new(low: f64, high: f64, config: SpringConfig) -> Self {
        let mut spring = Spring::new(low).with_config(config);
        spring.precision = (high - low).abs().max(f64::EPSILON) * 0.01;
        spring.set_target(high);
        Self { spring, low, high }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.spring.value
    }

    /// Advance by `dt` seconds, flipping direction on settle.
    pub fn update(&mut self, dt: f64) {
        self.spring.update(dt);
        if self.spring.at_rest {
            let next = if (self.spring.target - self.high).abs() <= f64::EPSILON {
                self.low
            } else {
                self.high
            };
            self.spring.set_target(next);
        }
    }
}

// =============================================================================
// Interpolation
// =============================================================================

/// Map `value` linearly from `input` onto `output`, pinned to the output
/// bounds outside the input range.
#[must_use]
pub fn interpolate(value: f32, input: [f32; 2], output: [f32; 2]) -> f32 {
    let span = input[1] - input[0];
    if span.abs() <= f32::EPSILON {
        return if value < input[0] { output[0] } else { output[1] };
    }
    let t = ((value - input[0]) / span).clamp(0.0, 1.0);
    (output[1] - output[0]).mul_add(t, output[0])
}
