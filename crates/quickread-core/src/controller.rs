//! Session controller: the command surface over playback and quiz.
//!
//! The controller reacts to commands (load, start, pause, reset, speed,
//! answers) by driving the scheduler and quiz engine, then publishes an
//! immutable [`SessionSnapshot`] on a watch channel. New subscribers see the
//! latest snapshot immediately.
//!
//! Lock order is scheduler state, then controller state. Playback
//! notifications arrive with the scheduler lock held, so controller commands
//! never call into the scheduler while holding their own lock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::clock::{Clock, TokioClock};
use crate::config::ControllerConfig;
use crate::error::{QuizError, SessionError};
use crate::model::{
    QuizState, ReadingSession, ReadingStats, SessionRecord, TextDifficulty, TextInfo,
};
use crate::quiz::{AnswerOutcome, QuizGenerator};
use crate::scheduler::{PlaybackEvent, PlaybackFrame, PlaybackObserver, PlaybackScheduler};
use crate::scoring::ScoringEngine;
use crate::tokenizer::tokenize;
use crate::traits::{ContentProvider, FeedbackContent, QuizContent};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No text loaded.
    Idle,
    /// Text loaded, not playing.
    Loaded,
    Playing,
    /// Every word shown; the quiz opens after a short delay.
    Completed,
    QuizActive,
    QuizCompleted,
}

impl SessionPhase {
    pub fn shows_quiz(&self) -> bool {
        matches!(self, SessionPhase::QuizActive | SessionPhase::QuizCompleted)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Loaded => "loaded",
            SessionPhase::Playing => "playing",
            SessionPhase::Completed => "completed",
            SessionPhase::QuizActive => "quiz_active",
            SessionPhase::QuizCompleted => "quiz_completed",
        };
        f.write_str(name)
    }
}

/// Display-oriented view of the reading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub current_word: Option<String>,
    pub cursor: usize,
    pub word_count: usize,
    pub rate_per_minute: u32,
    pub running: bool,
}

impl From<&ReadingSession> for SessionView {
    fn from(session: &ReadingSession) -> Self {
        Self {
            session_id: session.session_id,
            current_word: session.current_word().map(str::to_string),
            cursor: session.cursor,
            word_count: session.word_count(),
            rate_per_minute: session.rate_per_minute,
            running: session.running,
        }
    }
}

/// Flags the presentation layer renders; the core only reports into them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStatus {
    /// A content request is in flight.
    pub loading: bool,
    /// Last user-visible error, if any.
    pub error: Option<String>,
    pub focus_mode: bool,
}

/// Immutable picture of everything the UI needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session: SessionView,
    pub stats: ReadingStats,
    pub text: Option<TextInfo>,
    pub show_quiz: bool,
    pub quiz: QuizState,
    pub ui: UiStatus,
}

struct ControllerState {
    phase: SessionPhase,
    frame: PlaybackFrame,
    text: Option<TextInfo>,
    /// Topic of the text being loaded. Only written under the load lock.
    pending_topic: Option<String>,
    /// Stats frozen when the last word was shown; the quiz is scored from these.
    completion_stats: Option<ReadingStats>,
    /// Content requests still awaiting the provider.
    requests_in_flight: usize,
    quiz: QuizState,
    ui: UiStatus,
    /// Bumped to invalidate a pending quiz timer.
    quiz_ticket: u64,
    quiz_timer: Option<JoinHandle<()>>,
    history: Vec<SessionRecord>,
}

impl ControllerState {
    fn cancel_quiz_timer(&mut self) {
        self.quiz_ticket = self.quiz_ticket.wrapping_add(1);
        if let Some(timer) = self.quiz_timer.take() {
            timer.abort();
        }
    }

    fn resting_phase(&self) -> SessionPhase {
        if self.frame.session.is_empty() {
            SessionPhase::Idle
        } else {
            SessionPhase::Loaded
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            session: SessionView::from(&self.frame.session),
            stats: self.frame.stats,
            text: self.text.clone(),
            show_quiz: self.phase.shows_quiz(),
            quiz: self.quiz.clone(),
            ui: self.ui.clone(),
        }
    }
}

struct ControllerShared {
    me: Weak<ControllerShared>,
    state: Mutex<ControllerState>,
    snapshots: watch::Sender<SessionSnapshot>,
    quiz: QuizGenerator,
    scoring: ScoringEngine,
    quiz_delay: Duration,
}

impl ControllerShared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &ControllerState) {
        self.snapshots.send_replace(state.snapshot());
    }

    fn report(&self, err: SessionError) {
        tracing::warn!(error = %err, "session error");
        let mut state = self.lock();
        state.ui.error = Some(err.to_string());
        self.publish(&state);
    }

    fn schedule_quiz(&self, state: &mut ControllerState) {
        state.cancel_quiz_timer();
        let ticket = state.quiz_ticket;
        let (Some(shared), Ok(runtime)) = (self.me.upgrade(), Handle::try_current()) else {
            tracing::warn!("cannot schedule quiz without a runtime");
            return;
        };
        let delay = self.quiz_delay;
        state.quiz_timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.open_quiz(ticket);
        }));
    }

    fn open_quiz(&self, ticket: u64) {
        let mut state = self.lock();
        if state.quiz_ticket != ticket || state.phase != SessionPhase::Completed {
            return;
        }
        state.quiz_timer = None;
        let text = state.frame.session.text();
        state.quiz = self.quiz.generate(&text);
        state.phase = SessionPhase::QuizActive;
        tracing::info!(questions = state.quiz.questions.len(), "quiz opened");
        self.publish(&state);
    }
}

impl PlaybackObserver for ControllerShared {
    fn on_playback(&self, event: PlaybackEvent, frame: &PlaybackFrame) {
        let mut state = self.lock();
        state.frame = frame.clone();

        match event {
            PlaybackEvent::Loaded => {
                state.cancel_quiz_timer();
                state.quiz.close();
                state.completion_stats = None;
                let topic = state.pending_topic.take();
                state.text = (!frame.session.is_empty()).then(|| TextInfo {
                    topic,
                    word_count: frame.session.word_count(),
                    difficulty: TextDifficulty::from_word_count(frame.session.word_count()),
                });
                state.phase = state.resting_phase();
                if !frame.session.is_empty() {
                    state.ui.error = None;
                }
            }
            PlaybackEvent::Started => {
                state.cancel_quiz_timer();
                state.phase = SessionPhase::Playing;
                state.ui.error = None;
            }
            PlaybackEvent::Paused => {
                state.phase = state.resting_phase();
            }
            PlaybackEvent::Reset => {
                state.cancel_quiz_timer();
                state.quiz.close();
                state.completion_stats = None;
                state.phase = state.resting_phase();
            }
            PlaybackEvent::RateChanged | PlaybackEvent::Tick => {}
            PlaybackEvent::Completed => {
                // A replay after closing the quiz keeps the first reading's stats.
                state.completion_stats.get_or_insert(frame.stats);
                state.phase = SessionPhase::Completed;
                self.schedule_quiz(&mut state);
            }
        }

        self.publish(&state);
    }
}

/// Orchestrates a reading session and its quiz.
///
/// Commands that start timers (`start`, `set_speed`, and playback
/// completion) must run inside a Tokio runtime.
pub struct SessionController {
    scheduler: PlaybackScheduler,
    shared: Arc<ControllerShared>,
    provider: Arc<dyn ContentProvider>,
    /// Serializes loads so each `Loaded` event picks up its own topic.
    load_lock: Mutex<()>,
}

impl SessionController {
    pub fn new(
        config: ControllerConfig,
        provider: Arc<dyn ContentProvider>,
        quiz_content: Arc<dyn QuizContent>,
        feedback: Arc<dyn FeedbackContent>,
    ) -> Self {
        Self::with_clock(
            config,
            Arc::new(TokioClock::new()),
            provider,
            quiz_content,
            feedback,
        )
    }

    pub fn with_clock(
        config: ControllerConfig,
        clock: Arc<dyn Clock>,
        provider: Arc<dyn ContentProvider>,
        quiz_content: Arc<dyn QuizContent>,
        feedback: Arc<dyn FeedbackContent>,
    ) -> Self {
        let initial_session = ReadingSession::new(
            Vec::new(),
            config.playback.clamp_rate(config.playback.default_rate),
        );
        let initial_frame = PlaybackFrame {
            stats: crate::statistics::compute(&initial_session, clock.now_ms()),
            session: initial_session,
        };
        let initial_state = ControllerState {
            phase: SessionPhase::Idle,
            frame: initial_frame,
            text: None,
            pending_topic: None,
            completion_stats: None,
            requests_in_flight: 0,
            quiz: QuizState::default(),
            ui: UiStatus::default(),
            quiz_ticket: 0,
            quiz_timer: None,
            history: Vec::new(),
        };
        let (snapshots, _) = watch::channel(initial_state.snapshot());

        let shared = Arc::new_cyclic(|me| ControllerShared {
            me: me.clone(),
            state: Mutex::new(initial_state),
            snapshots,
            quiz: QuizGenerator::new(quiz_content),
            scoring: ScoringEngine::new(feedback),
            quiz_delay: config.quiz_delay,
        });

        let observer: Arc<dyn PlaybackObserver> = shared.clone();
        let scheduler = PlaybackScheduler::with_clock(config.playback, clock, observer);

        {
            let mut state = shared.lock();
            state.frame = scheduler.frame();
            shared.publish(&state);
        }

        Self {
            scheduler,
            shared,
            provider,
            load_lock: Mutex::new(()),
        }
    }

    fn load(&self, text: &str, topic: Option<String>) {
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.shared.lock().pending_topic = topic;
        self.scheduler.load(tokenize(text));
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Subscribe to snapshots. The receiver starts at the latest value.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Finished quizzes since this controller was created, oldest first.
    pub fn history(&self) -> Vec<SessionRecord> {
        self.shared.lock().history.clone()
    }

    /// Load user-supplied text. Stops playback and discards any quiz.
    pub fn load_custom_text(&self, text: &str) -> SessionSnapshot {
        self.load(text, None);
        self.snapshot()
    }

    /// Ask the content provider for a paragraph about `topic` and load it.
    ///
    /// Playback timers keep running while the provider is awaited. On
    /// failure the current session is left untouched and the error is
    /// reported in the snapshot.
    pub async fn request_generated_text(&self, topic: &str) -> SessionSnapshot {
        {
            let mut state = self.shared.lock();
            state.requests_in_flight += 1;
            state.ui.loading = true;
            self.shared.publish(&state);
        }

        tracing::info!(provider = self.provider.name(), topic, "requesting text");
        let outcome = self.provider.lookup_paragraph(topic).await;
        {
            let mut state = self.shared.lock();
            state.requests_in_flight = state.requests_in_flight.saturating_sub(1);
            state.ui.loading = state.requests_in_flight > 0;
        }

        match outcome {
            Ok(generated) => self.load(&generated.content, Some(generated.topic)),
            Err(err) => {
                tracing::warn!(topic, error = %format!("{err:#}"), "content generation failed");
                let mut state = self.shared.lock();
                state.ui.error =
                    Some(SessionError::ContentGenerationFailure(format!("{err:#}")).to_string());
                self.shared.publish(&state);
            }
        }
        self.snapshot()
    }

    /// Start or resume playback.
    ///
    /// Ignored while the quiz is pending or open. After the quiz is closed
    /// the loop runs once more, finds every word shown, and completes again.
    pub fn start(&self) -> SessionSnapshot {
        let phase = self.shared.lock().phase;
        if matches!(
            phase,
            SessionPhase::Completed | SessionPhase::QuizActive | SessionPhase::QuizCompleted
        ) {
            tracing::debug!(%phase, "start ignored until the quiz is closed");
            return self.snapshot();
        }
        if let Err(err) = self.scheduler.start() {
            self.shared.report(err.into());
        }
        self.snapshot()
    }

    pub fn pause(&self) -> SessionSnapshot {
        self.scheduler.pause();
        self.snapshot()
    }

    /// Rewind to the first word and discard any quiz or pending quiz.
    pub fn reset(&self) -> SessionSnapshot {
        self.scheduler.reset();
        self.snapshot()
    }

    /// Change the reading speed; out-of-range values are clamped.
    pub fn set_speed(&self, words_per_minute: u32) -> SessionSnapshot {
        if let Err(err) = self.scheduler.set_rate(words_per_minute) {
            self.shared.report(err.into());
        }
        self.snapshot()
    }

    /// Record an answer. Invalid or repeated answers are ignored.
    pub fn select_answer(&self, question: usize, option: usize) -> SessionSnapshot {
        let mut state = self.shared.lock();
        if state.phase != SessionPhase::QuizActive {
            tracing::debug!(question, option, error = %QuizError::NotActive, "answer ignored");
            return state.snapshot();
        }

        match state.quiz.select_answer(question, option) {
            Ok(AnswerOutcome::Recorded) => {}
            Ok(AnswerOutcome::ReadyToScore) => {
                let stats = state.completion_stats.unwrap_or(state.frame.stats);
                let result = self.shared.scoring.score(&state.quiz, stats.current_speed);
                tracing::info!(
                    comprehension = result.comprehension_rate_percent,
                    final_score = result.final_score,
                    "quiz completed"
                );
                let record = SessionRecord {
                    session_id: state.frame.session.session_id,
                    completed_at: Utc::now(),
                    topic: state.text.as_ref().and_then(|t| t.topic.clone()),
                    reading_speed: result.reading_speed,
                    comprehension_rate: result.comprehension_rate_percent,
                    final_score: result.final_score,
                    duration_secs: stats.elapsed_seconds,
                };
                state.history.push(record);
                state.quiz.complete(result);
                state.phase = SessionPhase::QuizCompleted;
            }
            Err(err) => {
                tracing::debug!(question, option, error = %err, "answer ignored");
                return state.snapshot();
            }
        }

        self.shared.publish(&state);
        state.snapshot()
    }

    /// Dismiss the quiz (or a pending one) and return to the loaded text.
    pub fn close_quiz(&self) -> SessionSnapshot {
        let mut state = self.shared.lock();
        if matches!(
            state.phase,
            SessionPhase::Completed | SessionPhase::QuizActive | SessionPhase::QuizCompleted
        ) {
            state.cancel_quiz_timer();
            state.quiz.close();
            state.phase = state.resting_phase();
            tracing::info!("quiz closed");
            self.shared.publish(&state);
        }
        state.snapshot()
    }

    pub fn toggle_focus_mode(&self) -> SessionSnapshot {
        let mut state = self.shared.lock();
        state.ui.focus_mode = !state.ui.focus_mode;
        self.shared.publish(&state);
        state.snapshot()
    }

    /// Clear the reported error message.
    pub fn clear_error(&self) -> SessionSnapshot {
        let mut state = self.shared.lock();
        if state.ui.error.take().is_some() {
            self.shared.publish(&state);
        }
        state.snapshot()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shared.lock().cancel_quiz_timer();
    }
}
