//! Scripted engine and statistics fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use highlow::{
    DeckOdds, DeckSlot, Direction, EngineGateway, EngineState, GatewayError, ProbabilitySnapshot,
    SessionController, SessionSettings, Signal, StatsService, StatsSummary,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// A call the controller made against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    Start(usize),
    Guess(usize, Direction),
    Probabilities,
    Reset,
    Health,
}

/// Engine whose responses are queued up front.
///
/// An empty queue falls back to a benign default, except for guesses,
/// which fail so a missing script is noticed.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    starts: Mutex<VecDeque<Result<EngineState, GatewayError>>>,
    guesses: Mutex<VecDeque<Result<EngineState, GatewayError>>>,
    probabilities: Mutex<VecDeque<(Duration, Result<ProbabilitySnapshot, GatewayError>)>>,
    resets: Mutex<VecDeque<Result<(), GatewayError>>>,
    health: Mutex<VecDeque<Result<(), GatewayError>>>,
    calls: Mutex<Vec<EngineCall>>,
}

impl ScriptedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_start(&self, result: Result<EngineState, GatewayError>) {
        self.starts.lock().unwrap().push_back(result);
    }

    pub fn push_guess(&self, result: Result<EngineState, GatewayError>) {
        self.guesses.lock().unwrap().push_back(result);
    }

    pub fn push_probabilities(&self, result: Result<ProbabilitySnapshot, GatewayError>) {
        self.push_probabilities_after(Duration::ZERO, result);
    }

    /// Queues a snapshot that arrives only after `delay`.
    pub fn push_probabilities_after(
        &self,
        delay: Duration,
        result: Result<ProbabilitySnapshot, GatewayError>,
    ) {
        self.probabilities
            .lock()
            .unwrap()
            .push_back((delay, result));
    }

    pub fn push_reset(&self, result: Result<(), GatewayError>) {
        self.resets.lock().unwrap().push_back(result);
    }

    pub fn push_health(&self, result: Result<(), GatewayError>) {
        self.health.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: EngineCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn guess_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, EngineCall::Guess(..)))
            .count()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EngineGateway for ScriptedEngine {
    async fn start(&self, deck_count: usize) -> Result<EngineState, GatewayError> {
        self.record(EngineCall::Start(deck_count));
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(fresh_deal(deck_count)))
    }

    async fn guess(&self, deck: usize, direction: Direction) -> Result<EngineState, GatewayError> {
        self.record(EngineCall::Guess(deck, direction));
        self.guesses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::unavailable("no scripted guess")))
    }

    async fn probabilities(&self) -> Result<ProbabilitySnapshot, GatewayError> {
        self.record(EngineCall::Probabilities);
        let scripted = self.probabilities.lock().unwrap().pop_front();
        let (delay, result) = scripted.unwrap_or_else(|| (Duration::ZERO, Ok(odds(&[(0, 20, 24)]))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn reset(&self) -> Result<(), GatewayError> {
        self.record(EngineCall::Reset);
        self.resets.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn health(&self) -> Result<(), GatewayError> {
        self.record(EngineCall::Health);
        self.health.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Statistics fake recording every saved result.
#[derive(Debug, Default)]
pub struct RecordingStats {
    saves: Mutex<Vec<(u32, usize, bool)>>,
    save_results: Mutex<VecDeque<Result<(), GatewayError>>>,
    summaries: Mutex<VecDeque<Result<StatsSummary, GatewayError>>>,
    summary_fetches: Mutex<usize>,
}

impl RecordingStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_save(&self, result: Result<(), GatewayError>) {
        self.save_results.lock().unwrap().push_back(result);
    }

    pub fn push_summary(&self, result: Result<StatsSummary, GatewayError>) {
        self.summaries.lock().unwrap().push_back(result);
    }

    pub fn saves(&self) -> Vec<(u32, usize, bool)> {
        self.saves.lock().unwrap().clone()
    }

    pub fn summary_fetches(&self) -> usize {
        *self.summary_fetches.lock().unwrap()
    }
}

#[async_trait]
impl StatsService for RecordingStats {
    async fn save_result(&self, score: u32, deck_count: usize, won: bool) -> Result<(), GatewayError> {
        self.saves.lock().unwrap().push((score, deck_count, won));
        self.save_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn fetch_my_summary(&self) -> Result<StatsSummary, GatewayError> {
        *self.summary_fetches.lock().unwrap() += 1;
        self.summaries.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(StatsSummary {
                total_games: 4,
                games_won: 1,
                win_rate: 25.0,
                best_score: Some(52),
                ..StatsSummary::default()
            })
        })
    }
}

/// Parses wire codes into deck slots.
pub fn slots(codes: &[&str]) -> Vec<DeckSlot> {
    codes.iter().map(|code| code.parse().unwrap()).collect()
}

/// Engine state with the given decks and score.
pub fn state(codes: &[&str], score: u32, message: &str) -> EngineState {
    EngineState {
        decks: slots(codes),
        score,
        message: message.to_string(),
        game_over: false,
        won: false,
        drawn_card: None,
    }
}

/// Final engine state.
pub fn game_over(codes: &[&str], score: u32, won: bool, message: &str) -> EngineState {
    EngineState {
        game_over: true,
        won,
        ..state(codes, score, message)
    }
}

/// A deal of `deck_count` live decks.
pub fn fresh_deal(deck_count: usize) -> EngineState {
    const TOPS: [&str; 10] = ["AS", "5H", "9D", "KC", "2S", "7H", "JD", "3C", "10S", "QH"];
    state(&TOPS[..deck_count.min(TOPS.len())], 0, "Game started!")
}

/// Snapshot from `(deck, higher, lower)` triples over a 46-card pool.
pub fn odds(entries: &[(usize, u32, u32)]) -> ProbabilitySnapshot {
    entries
        .iter()
        .map(|&(deck, higher, lower)| {
            (
                deck,
                DeckOdds {
                    higher,
                    lower,
                    equal: 46 - higher - lower,
                    total: 46,
                },
            )
        })
        .collect()
}

/// Settings with the production delays.
pub fn settings() -> SessionSettings {
    SessionSettings::new(Duration::from_millis(800), Duration::from_millis(5000), 3, 3)
}

/// Controller wired to the fakes, plus its signal stream.
pub fn controller(
    engine: &Arc<ScriptedEngine>,
    stats: &Arc<RecordingStats>,
) -> (SessionController, mpsc::UnboundedReceiver<Signal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = SessionController::new(engine.clone(), stats.clone(), settings(), tx);
    (controller, rx)
}

/// Everything emitted so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Signal>) -> Vec<Signal> {
    let mut signals = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        signals.push(signal);
    }
    signals
}
