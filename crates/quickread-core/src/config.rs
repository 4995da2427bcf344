//! Tunables for playback and session control.

use std::time::Duration;

/// Reading rate bounds and default, in words per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub min_rate: u32,
    pub max_rate: u32,
    /// Rate of a freshly created scheduler.
    pub default_rate: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            min_rate: 100,
            max_rate: 1000,
            default_rate: 300,
        }
    }
}

impl PlaybackConfig {
    /// Clamp a requested rate into `[min_rate, max_rate]`.
    pub fn clamp_rate(&self, rate: u32) -> u32 {
        rate.clamp(self.min_rate, self.max_rate)
    }

    /// Delay between two word advances: `round(60000 / rate)` milliseconds,
    /// never below one millisecond.
    pub fn tick_interval(&self, rate: u32) -> Duration {
        let rate = u64::from(self.clamp_rate(rate).max(1));
        Duration::from_millis(((60_000 + rate / 2) / rate).max(1))
    }
}

/// Configuration for the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub playback: PlaybackConfig,
    /// Pause between the last word and the quiz appearing.
    pub quiz_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            quiz_delay: Duration::from_millis(1000),
        }
    }
}
