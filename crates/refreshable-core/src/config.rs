//! Wrapper configuration, loadable from TOML.

use crate::animation::MotionConfig;
use crate::error::ConfigError;
use crate::geometry::HitSlop;
use crate::machine::MachineConfig;
use crate::presentation::{PresentationConfig, StrokeMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Everything a refresh wrapper can be configured with.
///
/// ```toml
/// refresh_height = 100.0
/// managed_loading = true
/// settle_delay_ms = 1000
/// stroke_mode = "loading"
///
/// [motion.timing]
/// duration_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Pull distance that commits a refresh
    pub refresh_height: f32,
    /// Slide and scale the loader in with the pull
    pub default_animation_enabled: bool,
    /// Passed through to the wrapped list
    pub bounces: bool,
    /// Let the loading flag alone drive the indicator
    pub managed_loading: bool,
    /// Pause between loading finishing and the indicator returning to idle
    pub settle_delay_ms: u64,
    /// What the progress ring follows outside of loading
    pub stroke_mode: StrokeMode,
    /// Pull distance that fills the ring
    pub pull_fraction_span: f32,
    /// Extra touch area around the wrapper
    pub hit_slop: Option<HitSlop>,
    /// Timing and spring curves
    pub motion: MotionConfig,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            refresh_height: 100.0,
            default_animation_enabled: false,
            bounces: true,
            managed_loading: false,
            settle_delay_ms: 500,
            stroke_mode: StrokeMode::PullFraction,
            pull_fraction_span: 200.0,
            hit_slop: None,
            motion: MotionConfig::default(),
        }
    }
}

impl RefreshConfig {
    /// Parse from TOML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.warn_suspicious();
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set the refresh height.
    #[must_use]
    pub const fn with_refresh_height(mut self, refresh_height: f32) -> Self {
        self.refresh_height = refresh_height;
        self
    }

    /// Enable or disable managed loading.
    #[must_use]
    pub const fn with_managed_loading(mut self, managed: bool) -> Self {
        self.managed_loading = managed;
        self
    }

    /// Set the settle delay.
    #[must_use]
    pub const fn with_settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Enable or disable the loader slide-in.
    #[must_use]
    pub const fn with_default_animation(mut self, enabled: bool) -> Self {
        self.default_animation_enabled = enabled;
        self
    }

    /// Set the ring stroke source.
    #[must_use]
    pub const fn with_stroke_mode(mut self, mode: StrokeMode) -> Self {
        self.stroke_mode = mode;
        self
    }

    /// Parameters of the refresh transition function.
    #[must_use]
    pub const fn machine(&self) -> MachineConfig {
        MachineConfig {
            refresh_height: self.refresh_height,
            managed_loading: self.managed_loading,
        }
    }

    /// Parameters of the presentation mapping.
    #[must_use]
    pub const fn presentation(&self) -> PresentationConfig {
        PresentationConfig {
            refresh_height: self.refresh_height,
            default_animation_enabled: self.default_animation_enabled,
            stroke_mode: self.stroke_mode,
            pull_fraction_span: self.pull_fraction_span,
        }
    }

    /// Log values that are accepted but unlikely to behave well.
    pub fn warn_suspicious(&self) {
        if self.refresh_height <= 0.0 {
            warn!(
                refresh_height = self.refresh_height,
                "refresh height is not positive; any release will commit"
            );
        }
        if self.pull_fraction_span <= 0.0 && self.stroke_mode == StrokeMode::PullFraction {
            warn!(
                span = self.pull_fraction_span,
                "pull fraction span is not positive; ring stays empty"
            );
        }
    }
}
