//! Configuration for the animation registry.
//!
//! [`AnimatorConfig`] derives [`serde::Deserialize`] with per-field defaults, so
//! an embedding page can ship partial JSON such as `{"frame_rate": 30}`.

use serde::{Deserialize, Serialize};

/// Nominal frame rate handed to callbacks when none is configured.
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Interval between two frame statistics reports, in milliseconds.
pub const DEFAULT_REPORT_INTERVAL_MS: f64 = 1000.0;

/// Settings for an [`Animator`](crate::Animator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Nominal frame rate. Only used to build the default [`FrameData`]; it
    /// never throttles the host's frame rate.
    pub frame_rate: u32,
    /// Minimum time between two statistics reports, in milliseconds.
    pub report_interval_ms: f64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
        }
    }
}

impl AnimatorConfig {
    /// Returns a configuration with the given nominal frame rate.
    #[must_use]
    pub const fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Returns a configuration with the given statistics report interval.
    #[must_use]
    pub const fn with_report_interval(mut self, millis: f64) -> Self {
        self.report_interval_ms = millis;
        self
    }

    /// The payload passed to callbacks registered without explicit data.
    #[must_use]
    pub const fn frame_data(&self) -> FrameData {
        FrameData {
            frame_rate: self.frame_rate,
        }
    }
}

/// Default per-entry payload: the nominal frame rate, useful for computing
/// per-frame deltas inside a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameData {
    /// Frames per second the callback may assume.
    pub frame_rate: u32,
}

impl Default for FrameData {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}
