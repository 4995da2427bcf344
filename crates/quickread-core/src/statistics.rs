//! Live and final reading statistics.
//!
//! Statistics are a pure function of the session and a timestamp supplied by
//! the caller, so they can be recomputed at any point without hidden state.

use crate::model::{ReadingSession, ReadingStats};

/// Derive reading metrics for `session` as of `now_epoch_ms`.
///
/// - `words_read` is the cursor.
/// - `elapsed_seconds` is whole seconds since the first start, or 0.
/// - `current_speed` is `round(words_read * 60 / elapsed)` (at least 1) once a
///   second has passed, otherwise the configured rate.
pub fn compute(session: &ReadingSession, now_epoch_ms: i64) -> ReadingStats {
    let words_read = session.cursor;
    let elapsed_seconds = session
        .started_at_epoch_ms
        .map(|started| (now_epoch_ms.saturating_sub(started) / 1000).max(0) as u64)
        .unwrap_or(0);

    let current_speed = if elapsed_seconds > 0 {
        let speed = (words_read as f64 * 60.0 / elapsed_seconds as f64).round() as u32;
        speed.max(1)
    } else {
        session.rate_per_minute
    };

    let progress_fraction = if session.words.is_empty() {
        0.0
    } else {
        words_read as f64 / session.words.len() as f64
    };

    ReadingStats {
        words_read,
        elapsed_seconds,
        current_speed,
        average_speed: current_speed,
        progress_fraction,
    }
}
