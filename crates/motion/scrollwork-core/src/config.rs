//! Core configuration for scrollwork-core.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;

/// Engine-wide knobs. Effect-specific constants live in each effect's own config.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smallest viewport width (px) considered "wide". Anything narrower is "narrow".
    pub wide_min_width: f32,
    /// Tween duration used when a tween doesn't specify one (seconds).
    pub default_duration: f32,
    /// Ease used when a tween doesn't specify one.
    pub default_ease: Ease,
    /// Smoothed scrub progress snaps to its target once within this distance.
    pub smoothing_epsilon: f32,
    /// Maximum events to retain per update; later events are dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wide_min_width: 768.0,
            default_duration: 0.5,
            default_ease: Ease::Power1Out,
            smoothing_epsilon: 1e-4,
            max_events_per_tick: 1024,
        }
    }
}
