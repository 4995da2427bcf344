//! Time sources for reading statistics.

use chrono::Utc;
use tokio::time::Instant;

/// Supplies the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock anchored once, then advanced by Tokio's monotonic clock.
///
/// Under a paused Tokio runtime this clock only moves when Tokio time is
/// advanced, which keeps timer tests deterministic.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor_epoch_ms: i64,
    anchor: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            anchor_epoch_ms: Utc::now().timestamp_millis(),
            anchor: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        let elapsed = Instant::now().saturating_duration_since(self.anchor);
        self.anchor_epoch_ms + elapsed.as_millis() as i64
    }
}
