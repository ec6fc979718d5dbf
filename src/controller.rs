//! Session controller: the state machine behind every player intent.
//!
//! All intents, whether typed, clicked or sent programmatically, go through
//! [`SessionController::dispatch`]. Network calls and timers run as tasks in
//! a [`JoinSet`] owned by the controller; their results come back through
//! [`SessionController::run`] (or [`SessionController::settle`] in tests)
//! and are applied on the same task that handles intents. Because the
//! controller keeps handling intents while a guess is in flight, a second
//! guess is refused by the phase guard instead of queueing behind the first.

use crate::error::{SessionError, SessionErrorKind, ValidationError};
use crate::gateway::{
    Direction, EngineGateway, EngineState, GatewayError, ProbabilitySnapshot, StatsService,
    StatsSummary,
};
use crate::hints::{HintBudget, HintState, HintTick};
use crate::navigator::{Step, next_active, select_direct};
use crate::pipeline::{self, PendingGuess};
use crate::session::{DECK_COUNT_RANGE, Phase, Session};
use crate::signals::{Signal, SoundCue};
use derive_new::new;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, instrument, warn};

/// Timing and budget knobs for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct SessionSettings {
    /// Delay between the flip and the authoritative commit.
    pub presentation_delay: Duration,
    /// How long the win celebration stays up.
    pub celebration: Duration,
    /// Hints per session.
    pub hint_budget: u32,
    /// Rounds a hint stays visible.
    pub hint_window: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(800),
            Duration::from_millis(5000),
            crate::hints::DEFAULT_HINT_BUDGET,
            crate::hints::DEFAULT_HINT_WINDOW,
        )
    }
}

/// A player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Deal a new game with this many decks.
    Start(usize),
    /// Select a deck directly.
    SelectDeck(usize),
    /// Move the selection to the neighbouring live deck.
    Step(Step),
    /// Guess on the selected deck.
    Guess(Direction),
    /// Spend a hint.
    ActivateHint,
    /// Discard the game.
    Reset,
}

/// Whether an intent took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The intent changed state or started work.
    Accepted,
    /// Refused silently by the phase guard, or a no-op.
    Ignored,
}

/// Result of a task owned by the controller.
#[derive(Debug)]
enum Completion {
    Started {
        deck_count: usize,
        result: Result<EngineState, GatewayError>,
    },
    Guessed {
        deck: usize,
        result: Result<EngineState, GatewayError>,
    },
    Presented,
    CelebrationElapsed,
    ProbabilitiesFetched {
        generation: u64,
        result: Result<ProbabilitySnapshot, GatewayError>,
    },
    ResultSaved(Result<(), GatewayError>),
    SummaryFetched(Result<StatsSummary, GatewayError>),
    ResetDone {
        prior: Phase,
        result: Result<(), GatewayError>,
    },
}

/// Owns the [`Session`] and [`HintBudget`] and drives them against the engine.
pub struct SessionController {
    engine: Arc<dyn EngineGateway>,
    stats: Arc<dyn StatsService>,
    settings: SessionSettings,
    session: Session,
    hints: HintBudget,
    pending: Option<PendingGuess>,
    /// Bumped whenever the decks change; odds fetched for an older deal are dropped.
    odds_generation: u64,
    tasks: JoinSet<Completion>,
    signals: mpsc::UnboundedSender<Signal>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("session", &self.session)
            .field("hints", &self.hints)
            .field("pending", &self.pending)
            .field("odds_generation", &self.odds_generation)
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Creates a controller with no game dealt.
    #[instrument(skip_all)]
    pub fn new(
        engine: Arc<dyn EngineGateway>,
        stats: Arc<dyn StatsService>,
        settings: SessionSettings,
        signals: mpsc::UnboundedSender<Signal>,
    ) -> Self {
        info!(?settings, "Creating session controller");
        Self {
            engine,
            stats,
            settings,
            session: Session::default(),
            hints: HintBudget::new(settings.hint_budget, settings.hint_window),
            pending: None,
            odds_generation: 0,
            tasks: JoinSet::new(),
            signals,
        }
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current hint counters.
    pub fn hints(&self) -> &HintState {
        self.hints.state()
    }

    /// Odds to display, only while a hint is visible.
    pub fn visible_probabilities(&self) -> Option<&ProbabilitySnapshot> {
        self.hints
            .state()
            .visible()
            .then_some(&self.session.probabilities)
    }

    /// Processes intents until the sender side closes.
    ///
    /// Returns the final session. Outstanding tasks are aborted on exit.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut intents: mpsc::UnboundedReceiver<Intent>) -> Session {
        info!("Session controller running");
        loop {
            tokio::select! {
                intent = intents.recv() => {
                    let Some(intent) = intent else {
                        info!("Intent channel closed");
                        break;
                    };
                    if let Err(e) = self.dispatch(intent).await {
                        debug!(error = %e, "Intent rejected");
                    }
                }
                Some(joined) = self.tasks.join_next() => self.on_joined(joined).await,
            }
        }
        self.tasks.shutdown().await;
        self.session
    }

    /// Applies completions until no task is outstanding.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            self.on_joined(joined).await;
        }
    }

    /// Applies the next completion. Returns false if nothing was outstanding.
    pub async fn advance(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(joined) => {
                self.on_joined(joined).await;
                true
            }
            None => false,
        }
    }

    /// Single entry point for every intent.
    #[instrument(skip(self), fields(phase = %self.session.phase))]
    pub async fn dispatch(&mut self, intent: Intent) -> Result<Dispatch, SessionError> {
        debug!("Dispatching intent");
        match intent {
            Intent::Start(deck_count) => self.start(deck_count),
            Intent::SelectDeck(index) => Ok(self.select_deck(index)),
            Intent::Step(step) => Ok(self.step_selection(step)),
            Intent::Guess(direction) => self.guess(direction),
            Intent::ActivateHint => self.activate_hint(),
            Intent::Reset => Ok(self.reset().await),
        }
    }

    /// Asks the engine to deal `deck_count` decks.
    #[instrument(skip(self))]
    pub fn start(&mut self, deck_count: usize) -> Result<Dispatch, SessionError> {
        if self.session.phase != Phase::NotStarted {
            debug!(phase = %self.session.phase, "Start ignored");
            return Ok(Dispatch::Ignored);
        }
        if !DECK_COUNT_RANGE.contains(&deck_count) {
            return Err(self.reject(ValidationError::DeckCountOutOfRange {
                requested: deck_count,
            }));
        }

        info!("Starting session");
        self.session.phase = Phase::Starting;
        let engine = Arc::clone(&self.engine);
        self.tasks.spawn(async move {
            Completion::Started {
                deck_count,
                result: engine.start(deck_count).await,
            }
        });
        Ok(Dispatch::Accepted)
    }

    /// Selects a live deck by index. No wraparound.
    #[instrument(skip(self))]
    pub fn select_deck(&mut self, index: usize) -> Dispatch {
        if self.session.phase != Phase::Playing {
            return Dispatch::Ignored;
        }
        match select_direct(&self.session.decks, index) {
            Some(index) => self.set_selection(index),
            None => {
                debug!("Deck not selectable");
                Dispatch::Ignored
            }
        }
    }

    /// Moves the selection to the next live deck in `step` direction.
    #[instrument(skip(self))]
    pub fn step_selection(&mut self, step: Step) -> Dispatch {
        if self.session.phase != Phase::Playing {
            return Dispatch::Ignored;
        }
        match next_active(&self.session.decks, self.session.selected_deck, step) {
            Some(index) => self.set_selection(index),
            None => Dispatch::Ignored,
        }
    }

    fn set_selection(&mut self, index: usize) -> Dispatch {
        self.session.selected_deck = Some(index);
        self.emit(Signal::SelectionChanged {
            selected_deck: Some(index),
        });
        self.emit(Signal::Sound(SoundCue::Select));
        Dispatch::Accepted
    }

    /// Guesses on the selected deck.
    ///
    /// Refused with a notice when nothing is selected, silently when the
    /// session is not in [`Phase::Playing`].
    #[instrument(skip(self))]
    pub fn guess(&mut self, direction: Direction) -> Result<Dispatch, SessionError> {
        if self.session.phase != Phase::Playing {
            debug!(phase = %self.session.phase, "Guess ignored");
            return Ok(Dispatch::Ignored);
        }
        let Some(deck) = self.session.selected_deck else {
            return Err(self.reject(ValidationError::NoDeckSelected));
        };

        info!(deck, "Submitting guess");
        self.session.phase = Phase::Resolving;
        let engine = Arc::clone(&self.engine);
        self.tasks.spawn(async move {
            Completion::Guessed {
                deck,
                result: engine.guess(deck, direction).await,
            }
        });
        Ok(Dispatch::Accepted)
    }

    /// Spends a hint, making odds visible for the configured window.
    #[instrument(skip(self))]
    pub fn activate_hint(&mut self) -> Result<Dispatch, SessionError> {
        if self.session.phase != Phase::Playing {
            return Ok(Dispatch::Ignored);
        }
        if let Err(rejection) = self.hints.activate() {
            return Err(self.reject(rejection.into()));
        }

        let state = *self.hints.state();
        self.emit(Signal::HintActivated {
            hints_remaining: *state.hints_remaining(),
            rounds_remaining: *state.rounds_remaining(),
        });
        self.emit(Signal::Sound(SoundCue::Hint));
        if self.session.probabilities.is_empty() {
            self.spawn_probabilities();
        }
        Ok(Dispatch::Accepted)
    }

    /// Discards the game.
    ///
    /// Refused while a start, guess or earlier reset is in flight. Every
    /// timer and fetch of the current session is cancelled first.
    #[instrument(skip(self))]
    pub async fn reset(&mut self) -> Dispatch {
        let prior = self.session.phase;
        if self.session.is_busy() {
            debug!(phase = %prior, "Reset ignored");
            return Dispatch::Ignored;
        }

        info!("Resetting session");
        self.tasks.shutdown().await;
        self.session.phase = Phase::Resetting;
        let engine = Arc::clone(&self.engine);
        self.tasks.spawn(async move {
            Completion::ResetDone {
                prior,
                result: engine.reset().await,
            }
        });
        Dispatch::Accepted
    }

    async fn on_joined(&mut self, joined: Result<Completion, JoinError>) {
        match joined {
            Ok(completion) => self.complete(completion).await,
            Err(e) if e.is_cancelled() => debug!("Task cancelled"),
            Err(e) => {
                error!(error = %e, "Task failed");
                self.recover_lost_task();
            }
        }
    }

    /// A panicked task can strand a transient phase; fall back to the last stable one.
    fn recover_lost_task(&mut self) {
        let fallback = match self.session.phase {
            Phase::Starting => Phase::NotStarted,
            Phase::Resolving if self.pending.is_none() => Phase::Playing,
            _ => return,
        };
        warn!(from = %self.session.phase, to = %fallback, "Recovering phase after task failure");
        self.session.phase = fallback;
        self.session.flipping = false;
    }

    #[instrument(skip(self, completion), fields(phase = %self.session.phase))]
    async fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Started { deck_count, result } => {
                self.on_started(deck_count, result).await
            }
            Completion::Guessed { deck, result } => self.on_guessed(deck, result).await,
            Completion::Presented => self.on_presented(),
            Completion::CelebrationElapsed => {
                if self.session.celebrating {
                    self.session.celebrating = false;
                    self.emit(Signal::CelebrationCleared);
                }
            }
            Completion::ProbabilitiesFetched { generation, result } => {
                self.on_probabilities(generation, result).await
            }
            Completion::ResultSaved(result) => self.on_result_saved(result),
            Completion::SummaryFetched(result) => self.on_summary(result),
            Completion::ResetDone { prior, result } => self.on_reset(prior, result).await,
        }
    }

    async fn on_started(&mut self, deck_count: usize, result: Result<EngineState, GatewayError>) {
        match result {
            Ok(state) => {
                if state.decks.len() != deck_count {
                    warn!(
                        requested = deck_count,
                        dealt = state.decks.len(),
                        "Engine dealt a different deck count"
                    );
                }
                self.session = Session::started(deck_count, state);
                self.hints.reset();
                self.pending = None;
                self.odds_generation += 1;
                self.emit(Signal::SessionStarted {
                    decks: self.session.decks.clone(),
                    score: self.session.score,
                    selected_deck: self.session.selected_deck,
                });
                if !self.session.message.is_empty() {
                    self.emit(Signal::Message(self.session.message.clone()));
                }
                self.spawn_probabilities();
            }
            Err(e) => {
                warn!(error = %e, "Start failed");
                self.session.phase = Phase::NotStarted;
                self.engine_failure(e, "Error starting game. Make sure the engine is running!")
                    .await;
            }
        }
    }

    async fn on_guessed(&mut self, deck: usize, result: Result<EngineState, GatewayError>) {
        match result {
            Ok(state) => {
                let pending = PendingGuess { deck, state };
                let card = pipeline::reveal(&mut self.session, &pending);
                self.pending = Some(pending);
                self.emit(Signal::Flip { card });
                self.emit(Signal::Sound(SoundCue::CardFlip));

                let delay = self.settings.presentation_delay;
                self.tasks.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Completion::Presented
                });
            }
            Err(e) => {
                warn!(error = %e, deck, "Guess failed");
                self.session.phase = Phase::Playing;
                self.engine_failure(e, "Error making guess!").await;
            }
        }
    }

    /// Commit, then hint tick, then celebration, then statistics or odds.
    fn on_presented(&mut self) {
        let Some(pending) = self.pending.take() else {
            warn!("Presentation elapsed with no pending guess");
            return;
        };

        let report = pipeline::commit(&mut self.session, &mut self.hints, pending);
        self.odds_generation += 1;
        self.emit(Signal::Committed {
            decks: self.session.decks.clone(),
            score: self.session.score,
            selected_deck: self.session.selected_deck,
        });
        if !self.session.message.is_empty() {
            self.emit(Signal::Message(self.session.message.clone()));
        }
        self.emit(Signal::Sound(if report.deck_survived {
            SoundCue::Correct
        } else {
            SoundCue::Wrong
        }));

        if report.hint == HintTick::Expired {
            self.emit(Signal::HintExpired);
        }

        if report.celebrate() {
            self.emit(Signal::Celebrate);
            self.emit(Signal::Sound(SoundCue::Victory));
            let celebration = self.settings.celebration;
            self.tasks.spawn(async move {
                tokio::time::sleep(celebration).await;
                Completion::CelebrationElapsed
            });
        } else if report.game_over {
            self.emit(Signal::Sound(SoundCue::GameOver));
        }

        if report.game_over {
            self.persist_result();
        } else {
            self.spawn_probabilities();
        }
    }

    fn persist_result(&mut self) {
        let (score, deck_count, won) = (
            self.session.score,
            self.session.deck_count,
            self.session.won,
        );
        info!(score, deck_count, won, "Persisting game result");
        self.emit(Signal::PersistResult {
            score,
            deck_count,
            won,
        });

        // The save outlives a reset; only its follow-up belongs to this session.
        let stats = Arc::clone(&self.stats);
        let save =
            tokio::spawn(async move { stats.save_result(score, deck_count, won).await });
        self.tasks.spawn(async move {
            let result = save.await.unwrap_or_else(|e| {
                Err(GatewayError::unavailable(format!("save task failed: {}", e)))
            });
            Completion::ResultSaved(result)
        });
    }

    fn on_result_saved(&mut self, result: Result<(), GatewayError>) {
        match result {
            Ok(()) => {
                debug!("Game result saved, fetching summary");
                let stats = Arc::clone(&self.stats);
                self.tasks.spawn(async move {
                    Completion::SummaryFetched(stats.fetch_my_summary().await)
                });
            }
            Err(e) => {
                warn!(error = %e, "Saving game result failed");
                self.stats_failure(e, "Your result could not be saved to your statistics.");
            }
        }
    }

    fn on_summary(&mut self, result: Result<StatsSummary, GatewayError>) {
        match result {
            Ok(summary) => {
                info!(best_score = ?summary.best_score, "Statistics refreshed");
                self.session.summary = Some(summary.clone());
                self.emit(Signal::Summary(summary));
            }
            Err(e) => {
                warn!(error = %e, "Fetching statistics failed");
                self.stats_failure(e, "Your statistics could not be loaded.");
            }
        }
    }

    /// Statistics failures never touch the finished game.
    ///
    /// A rejected credential still prompts for sign-in, since the same
    /// credential backs the next engine call.
    fn stats_failure(&self, e: GatewayError, notice: &str) {
        if e.is_auth_expired() {
            let err = SessionError::new(SessionErrorKind::AuthExpired, e.message);
            self.emit(Signal::ReauthRequired);
            self.emit(Signal::Notice(err.user_message()));
        } else {
            let err = SessionError::new(SessionErrorKind::StatsPersist, notice);
            self.emit(Signal::Notice(err.user_message()));
        }
    }

    fn spawn_probabilities(&mut self) {
        let engine = Arc::clone(&self.engine);
        let generation = self.odds_generation;
        self.tasks.spawn(async move {
            Completion::ProbabilitiesFetched {
                generation,
                result: engine.probabilities().await,
            }
        });
    }

    async fn on_probabilities(
        &mut self,
        generation: u64,
        result: Result<ProbabilitySnapshot, GatewayError>,
    ) {
        if generation != self.odds_generation {
            debug!(
                generation,
                current = self.odds_generation,
                "Dropping odds fetched for an earlier deal"
            );
            return;
        }
        match result {
            Ok(snapshot) => {
                self.session.probabilities = snapshot.clone();
                self.emit(Signal::ProbabilitiesUpdated(snapshot));
            }
            Err(e) if e.is_auth_expired() => self.force_reauth().await,
            Err(e) => {
                let err = SessionError::new(SessionErrorKind::ProbabilityFetch, e.message);
                debug!(error = %err, "Keeping stale probabilities");
            }
        }
    }

    async fn on_reset(&mut self, prior: Phase, result: Result<(), GatewayError>) {
        match result {
            Ok(()) => {
                info!("Session reset");
                self.session = Session::default();
                self.hints.reset();
                self.pending = None;
                self.odds_generation += 1;
                self.emit(Signal::SessionReset);
            }
            Err(e) => {
                warn!(error = %e, "Reset failed");
                self.session.phase = prior;
                if self.session.celebrating {
                    self.session.celebrating = false;
                    self.emit(Signal::CelebrationCleared);
                }
                self.engine_failure(e, "Error resetting game!").await;
            }
        }
    }

    /// Surfaces an engine failure; auth failures force a fresh session.
    async fn engine_failure(&mut self, e: GatewayError, notice: &str) {
        if e.is_auth_expired() {
            self.force_reauth().await;
        } else {
            let err = SessionError::new(SessionErrorKind::EngineUnavailable, notice);
            self.emit(Signal::Notice(err.user_message()));
        }
    }

    /// Drops everything and asks the player to sign in again.
    #[instrument(skip(self))]
    async fn force_reauth(&mut self) {
        warn!("Credential rejected, forcing session reset");
        self.tasks.shutdown().await;
        self.session = Session::default();
        self.hints.reset();
        self.pending = None;
        self.odds_generation += 1;
        let err = SessionError::new(SessionErrorKind::AuthExpired, "credential rejected");
        self.emit(Signal::ReauthRequired);
        self.emit(Signal::Notice(err.user_message()));
    }

    #[track_caller]
    fn reject(&self, error: ValidationError) -> SessionError {
        let err = SessionError::validation(error);
        warn!(error = %err, "Intent refused");
        self.emit(Signal::Notice(err.user_message()));
        err
    }

    fn emit(&self, signal: Signal) {
        debug!(?signal, "Emitting signal");
        if self.signals.send(signal).is_err() {
            debug!("Signal receiver dropped");
        }
    }
}
