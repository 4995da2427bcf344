//! Timed, cancellable word playback.
//!
//! The scheduler owns a [`ReadingSession`] and, while running, a single Tokio
//! task that reveals one word per tick. Every command that changes the loop
//! (start, pause, reset, rate change, load) first invalidates the current
//! loop by bumping a generation counter under the session lock, then aborts
//! its task. A tick only mutates the session while holding the lock and only
//! if its generation is still current, so two loops can never both advance
//! the cursor.
//!
//! Observers are notified while the lock is held. Notifications therefore
//! arrive in exactly the order the session was mutated.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::clock::{Clock, TokioClock};
use crate::config::PlaybackConfig;
use crate::error::PlaybackError;
use crate::model::{ReadingSession, ReadingStats};
use crate::statistics;

/// What changed in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Loaded,
    Started,
    Paused,
    Reset,
    RateChanged,
    /// One word was revealed.
    Tick,
    /// The last word's display interval elapsed; playback stopped by itself.
    Completed,
}

impl fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackEvent::Loaded => "loaded",
            PlaybackEvent::Started => "started",
            PlaybackEvent::Paused => "paused",
            PlaybackEvent::Reset => "reset",
            PlaybackEvent::RateChanged => "rate_changed",
            PlaybackEvent::Tick => "tick",
            PlaybackEvent::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A consistent copy of the session and its statistics.
#[derive(Debug, Clone)]
pub struct PlaybackFrame {
    pub session: ReadingSession,
    pub stats: ReadingStats,
}

/// Receives a frame after every session mutation.
///
/// Called with the scheduler's lock held: implementations must not call back
/// into the scheduler.
pub trait PlaybackObserver: Send + Sync {
    fn on_playback(&self, event: PlaybackEvent, frame: &PlaybackFrame);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl PlaybackObserver for NoopObserver {
    fn on_playback(&self, _: PlaybackEvent, _: &PlaybackFrame) {}
}

struct Playback {
    session: ReadingSession,
    /// Bumped whenever the active tick loop is invalidated.
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Playback {
    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.session.running
    }

    /// Invalidate the active loop, if any, and return the next generation.
    fn cancel_loop(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation
    }
}

struct Shared {
    state: Mutex<Playback>,
    config: PlaybackConfig,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn PlaybackObserver>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Playback> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn frame(&self, session: &ReadingSession) -> PlaybackFrame {
        PlaybackFrame {
            session: session.clone(),
            stats: statistics::compute(session, self.clock.now_ms()),
        }
    }

    fn notify(&self, state: &Playback, event: PlaybackEvent) {
        let frame = self.frame(&state.session);
        self.observer.on_playback(event, &frame);
    }

    /// Advance one tick for loop `generation`.
    ///
    /// Returns the delay before the next tick, or `None` when the loop is
    /// stale or the session just completed.
    fn tick(&self, generation: u64) -> Option<Duration> {
        let mut state = self.lock();
        if !state.is_current(generation) {
            return None;
        }

        if state.session.cursor < state.session.word_count() {
            state.session.cursor += 1;
            tracing::debug!(
                cursor = state.session.cursor,
                words = state.session.word_count(),
                "tick"
            );
            self.notify(&state, PlaybackEvent::Tick);
            Some(self.config.tick_interval(state.session.rate_per_minute))
        } else {
            state.session.running = false;
            state.task = None;
            tracing::info!(
                session_id = %state.session.session_id,
                words = state.session.word_count(),
                "playback completed"
            );
            self.notify(&state, PlaybackEvent::Completed);
            None
        }
    }
}

async fn run_ticks(shared: Arc<Shared>, generation: u64, first_delay: Option<Duration>) {
    if let Some(delay) = first_delay {
        tokio::time::sleep(delay).await;
    }
    while let Some(interval) = shared.tick(generation) {
        tokio::time::sleep(interval).await;
    }
}

/// Drives a reading session one word at a time.
pub struct PlaybackScheduler {
    shared: Arc<Shared>,
}

impl PlaybackScheduler {
    pub fn new(config: PlaybackConfig, observer: Arc<dyn PlaybackObserver>) -> Self {
        Self::with_clock(config, Arc::new(TokioClock::new()), observer)
    }

    pub fn with_clock(
        config: PlaybackConfig,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn PlaybackObserver>,
    ) -> Self {
        let session = ReadingSession::new(Vec::new(), config.clamp_rate(config.default_rate));
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(Playback {
                    session,
                    generation: 0,
                    task: None,
                }),
                config,
                clock,
                observer,
            }),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.shared.config
    }

    /// Current session and statistics.
    pub fn frame(&self) -> PlaybackFrame {
        let state = self.shared.lock();
        self.shared.frame(&state.session)
    }

    pub fn session(&self) -> ReadingSession {
        self.shared.lock().session.clone()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().session.running
    }

    /// Replace the session with `words`, keeping the current rate. A running
    /// loop is stopped first.
    pub fn load(&self, words: Vec<String>) {
        let mut state = self.shared.lock();
        state.cancel_loop();
        let rate = state.session.rate_per_minute;
        state.session = ReadingSession::new(words, rate);
        tracing::info!(
            session_id = %state.session.session_id,
            words = state.session.word_count(),
            "text loaded"
        );
        self.shared.notify(&state, PlaybackEvent::Loaded);
    }

    /// Begin or resume playback from the cursor.
    ///
    /// A no-op while already running. The first word is revealed right away;
    /// if every word was already shown, the loop completes on its first tick.
    pub fn start(&self) -> Result<(), PlaybackError> {
        let runtime = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;
        let mut state = self.shared.lock();

        if state.session.is_empty() {
            return Err(PlaybackError::NoTextLoaded);
        }
        if state.session.running {
            return Ok(());
        }
        state.session.running = true;
        if state.session.started_at_epoch_ms.is_none() {
            state.session.started_at_epoch_ms = Some(self.shared.clock.now_ms());
        }
        let generation = state.cancel_loop();
        state.task = Some(runtime.spawn(run_ticks(Arc::clone(&self.shared), generation, None)));

        tracing::info!(
            cursor = state.session.cursor,
            rate = state.session.rate_per_minute,
            "playback started"
        );
        self.shared.notify(&state, PlaybackEvent::Started);
        Ok(())
    }

    /// Stop the loop, keeping the cursor and the elapsed-time basis.
    pub fn pause(&self) {
        let mut state = self.shared.lock();
        if !state.session.running {
            return;
        }
        state.cancel_loop();
        state.session.running = false;
        tracing::info!(cursor = state.session.cursor, "playback paused");
        self.shared.notify(&state, PlaybackEvent::Paused);
    }

    /// Stop the loop and rewind to the first word.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        state.cancel_loop();
        state.session.running = false;
        state.session.cursor = 0;
        state.session.started_at_epoch_ms = None;
        tracing::info!("playback reset");
        self.shared.notify(&state, PlaybackEvent::Reset);
    }

    /// Change the reading rate, clamped into the configured bounds.
    ///
    /// While running, the loop is restarted so the next word arrives one new
    /// interval from now. Returns the rate actually applied.
    pub fn set_rate(&self, rate: u32) -> Result<u32, PlaybackError> {
        let rate = self.shared.config.clamp_rate(rate);
        let mut state = self.shared.lock();
        state.session.rate_per_minute = rate;

        if state.session.running {
            let runtime = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;
            let generation = state.cancel_loop();
            let delay = self.shared.config.tick_interval(rate);
            state.task = Some(runtime.spawn(run_ticks(
                Arc::clone(&self.shared),
                generation,
                Some(delay),
            )));
        }

        tracing::info!(rate, "rate changed");
        self.shared.notify(&state, PlaybackEvent::RateChanged);
        Ok(rate)
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.cancel_loop();
        state.session.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(PlaybackEvent, usize, bool)>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<(PlaybackEvent, usize, bool)> {
            self.events.lock().unwrap().clone()
        }

        fn tick_cursors(&self) -> Vec<usize> {
            self.events()
                .into_iter()
                .filter(|(event, _, _)| *event == PlaybackEvent::Tick)
                .map(|(_, cursor, _)| cursor)
                .collect()
        }

        fn count(&self, wanted: PlaybackEvent) -> usize {
            self.events()
                .iter()
                .filter(|(event, _, _)| *event == wanted)
                .count()
        }
    }

    impl PlaybackObserver for Recorder {
        fn on_playback(&self, event: PlaybackEvent, frame: &PlaybackFrame) {
            self.events
                .lock()
                .unwrap()
                .push((event, frame.session.cursor, frame.session.running));
        }
    }

    fn scheduler(text: &str, rate: u32) -> (PlaybackScheduler, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let scheduler = PlaybackScheduler::new(PlaybackConfig::default(), recorder.clone());
        scheduler.set_rate(rate).unwrap();
        scheduler.load(tokenize(text));
        (scheduler, recorder)
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn plays_five_words_then_completes() {
        let (scheduler, recorder) = scheduler("the quick brown fox jumps", 600);
        scheduler.start().unwrap();

        sleep_ms(50).await;
        assert_eq!(scheduler.session().cursor, 1);
        assert!(scheduler.is_running());

        sleep_ms(400).await; // t = 450
        assert_eq!(scheduler.session().cursor, 5);
        assert!(scheduler.is_running());
        assert_eq!(recorder.count(PlaybackEvent::Completed), 0);

        sleep_ms(100).await; // t = 550
        let frame = scheduler.frame();
        assert_eq!(frame.session.cursor, 5);
        assert!(!frame.session.running);
        assert_eq!(frame.stats.progress_fraction, 1.0);
        assert_eq!(recorder.count(PlaybackEvent::Completed), 1);
        assert_eq!(recorder.tick_cursors(), vec![1, 2, 3, 4, 5]);

        sleep_ms(1_000).await;
        assert_eq!(recorder.count(PlaybackEvent::Completed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_without_text_fails() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = PlaybackScheduler::new(PlaybackConfig::default(), recorder.clone());
        assert_eq!(scheduler.start(), Err(PlaybackError::NoTextLoaded));
        assert!(!scheduler.is_running());
        assert_eq!(recorder.count(PlaybackEvent::Started), 0);
    }

    #[test]
    fn start_outside_runtime_fails() {
        let (scheduler, _) = scheduler("one two", 300);
        assert_eq!(scheduler.start(), Err(PlaybackError::NoRuntime));
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_is_noop() {
        let (scheduler, recorder) = scheduler("a b c d e f g h", 600);
        scheduler.start().unwrap();
        sleep_ms(10).await;
        scheduler.start().unwrap();
        sleep_ms(240).await; // t = 250: ticks at 0, 100, 200
        assert_eq!(scheduler.session().cursor, 3);
        assert_eq!(recorder.count(PlaybackEvent::Started), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_then_start_resumes_without_skipping() {
        let (scheduler, recorder) = scheduler("a b c d e f g h", 600);
        scheduler.start().unwrap();
        sleep_ms(250).await;
        scheduler.pause();
        let paused = scheduler.session();
        assert_eq!(paused.cursor, 3);
        assert!(!paused.running);

        sleep_ms(1_000).await;
        assert_eq!(scheduler.session().cursor, 3);

        scheduler.start().unwrap();
        assert_eq!(scheduler.session().started_at_epoch_ms, paused.started_at_epoch_ms);
        sleep_ms(150).await;
        assert_eq!(scheduler.session().cursor, 5);
        assert_eq!(recorder.tick_cursors(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_change_applies_to_next_tick() {
        let (scheduler, recorder) = scheduler("a b c d e f g h", 600);
        scheduler.start().unwrap();
        sleep_ms(150).await; // ticks at 0, 100
        assert_eq!(scheduler.session().cursor, 2);

        assert_eq!(scheduler.set_rate(300), Ok(300));
        assert!(scheduler.is_running());
        sleep_ms(190).await; // t = 340, next tick due at 350
        assert_eq!(scheduler.session().cursor, 2);
        sleep_ms(20).await; // t = 360
        assert_eq!(scheduler.session().cursor, 3);
        sleep_ms(200).await; // t = 560
        assert_eq!(scheduler.session().cursor, 4);
        assert_eq!(recorder.tick_cursors(), vec![1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_is_clamped() {
        let (scheduler, _) = scheduler("a b", 300);
        assert_eq!(scheduler.set_rate(50), Ok(100));
        assert_eq!(scheduler.session().rate_per_minute, 100);
        assert_eq!(scheduler.set_rate(5_000), Ok(1_000));
        assert_eq!(scheduler.session().rate_per_minute, 1_000);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_is_idempotent() {
        let (scheduler, _) = scheduler("a b c d e f g h", 600);
        scheduler.start().unwrap();
        sleep_ms(1_250).await;

        scheduler.reset();
        let once = scheduler.frame();
        scheduler.reset();
        let twice = scheduler.frame();

        for frame in [&once, &twice] {
            assert_eq!(frame.session.cursor, 0);
            assert!(!frame.session.running);
            assert_eq!(frame.session.started_at_epoch_ms, None);
            assert_eq!(frame.stats.words_read, 0);
            assert_eq!(frame.stats.elapsed_seconds, 0);
            assert_eq!(frame.stats.progress_fraction, 0.0);
        }
        assert_eq!(once.stats, twice.stats);

        sleep_ms(500).await;
        assert_eq!(scheduler.session().cursor, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn load_while_running_stops_first() {
        let (scheduler, recorder) = scheduler("a b c d e f g h", 600);
        let first_id = scheduler.session().session_id;
        scheduler.start().unwrap();
        sleep_ms(150).await;

        scheduler.load(tokenize("new words here"));
        let session = scheduler.session();
        assert!(!session.running);
        assert_eq!(session.cursor, 0);
        assert_eq!(session.word_count(), 3);
        assert_eq!(session.rate_per_minute, 600);
        assert_ne!(session.session_id, first_id);

        sleep_ms(500).await;
        assert_eq!(scheduler.session().cursor, 0);
        assert_eq!(recorder.count(PlaybackEvent::Completed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_completion_completes_again() {
        let (scheduler, recorder) = scheduler("a b", 1_000);
        scheduler.start().unwrap();
        sleep_ms(500).await;
        assert!(scheduler.session().is_exhausted());
        assert_eq!(recorder.count(PlaybackEvent::Completed), 1);

        assert_eq!(scheduler.start(), Ok(()));
        assert!(scheduler.is_running());
        sleep_ms(10).await;
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.session().cursor, 2);
        assert_eq!(recorder.count(PlaybackEvent::Started), 2);
        assert_eq!(recorder.count(PlaybackEvent::Completed), 2);
        assert_eq!(recorder.tick_cursors(), vec![1, 2]);

        scheduler.reset();
        assert_eq!(scheduler.start(), Ok(()));
        assert_eq!(scheduler.session().cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_stats_use_elapsed_time() {
        let (scheduler, _) = scheduler("a b c d e f g h i j", 600);
        scheduler.start().unwrap();
        sleep_ms(1_050).await; // completes at t = 1000
        let frame = scheduler.frame();
        assert!(!frame.session.running);
        assert_eq!(frame.stats.words_read, 10);
        assert_eq!(frame.stats.elapsed_seconds, 1);
        assert_eq!(frame.stats.current_speed, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_never_decreases_while_playing() {
        let (scheduler, recorder) = scheduler("a b c d e f g h i j k l", 1_000);
        scheduler.start().unwrap();
        sleep_ms(130).await;
        scheduler.set_rate(700).unwrap();
        sleep_ms(100).await;
        scheduler.pause();
        scheduler.start().unwrap();
        scheduler.set_rate(900).unwrap();
        sleep_ms(2_000).await;

        let cursors = recorder.tick_cursors();
        assert_eq!(cursors, (1..=12).collect::<Vec<_>>());
        let all: Vec<usize> = recorder.events().iter().map(|(_, c, _)| *c).collect();
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
    }
}
