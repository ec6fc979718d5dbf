//! Plain-text terminal front end.
//!
//! Keys are read in raw mode on a blocking thread and submitted to the
//! controller's intent queue; every emitted signal is printed as a line of text.

use crate::cards::DeckSlot;
use crate::config::ClientConfig;
use crate::controller::{Intent, SessionController};
use crate::gateway::{
    Credentials, EngineGateway, ProbabilitySnapshot, RestEngineGateway, RestStatsClient,
    TokenCredentials, warm_up,
};
use crate::input::{KeyAction, map_key};
use crate::signals::Signal;
use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

const KEY_POLL: Duration = Duration::from_millis(50);

const HELP: &str = "<-/-> select  1-9,0 deck  up/h higher  down/l lower  t hint  r reset  s start  q quit";

/// Checks the engine and reports whether it is up.
#[instrument(skip(config), fields(engine_url = %config.engine_url()))]
pub async fn health(config: &ClientConfig) -> Result<()> {
    let credentials: Arc<dyn Credentials> = Arc::new(TokenCredentials::from_env());
    let engine = RestEngineGateway::new(
        config.engine_url(),
        credentials,
        config.request_timeout(),
    )?;
    warm_up(&engine, config.health_retry_delay()).await?;
    println!("Engine at {} is up", config.engine_url());
    Ok(())
}

/// Runs one interactive session until the player quits.
#[instrument(skip(config), fields(engine_url = %config.engine_url()))]
pub async fn play(config: &ClientConfig, deck_count: usize) -> Result<()> {
    let credentials: Arc<dyn Credentials> = Arc::new(TokenCredentials::from_env());
    let engine = Arc::new(RestEngineGateway::new(
        config.engine_url(),
        Arc::clone(&credentials),
        config.request_timeout(),
    )?);
    let stats = Arc::new(RestStatsClient::new(
        config.stats_url(),
        credentials,
        config.request_timeout(),
    )?);

    if let Err(e) = warm_up(engine.as_ref(), config.health_retry_delay()).await {
        warn!(error = %e, "Engine did not answer the health check");
        println!("Engine is not responding yet; starting anyway.");
    }

    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let engine: Arc<dyn EngineGateway> = engine;
    let controller = SessionController::new(engine, stats, config.session_settings(), signal_tx);
    let handle = tokio::spawn(controller.run(intent_rx));

    intent_tx.send(Intent::Start(deck_count))?;
    println!("{}", HELP);

    enable_raw_mode()?;
    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let reader = tokio::task::spawn_blocking(move || read_keys(key_tx, deck_count));
    let res = event_loop(&intent_tx, &mut signal_rx, &mut key_rx).await;
    drop(key_rx);
    match reader.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = ?e, "Key reader failed"),
        Err(e) => error!(error = %e, "Key reader task failed"),
    }
    disable_raw_mode()?;

    drop(intent_tx);
    match handle.await {
        Ok(session) => info!(score = session.score(), phase = %session.phase(), "Session ended"),
        Err(e) => error!(error = %e, "Controller task failed"),
    }

    if let Err(err) = &res {
        error!(error = ?err, "Terminal loop error");
    }
    res
}

/// Blocking key reader. Stops once the receiving side is dropped.
fn read_keys(keys: mpsc::UnboundedSender<KeyAction>, deck_count: usize) -> Result<()> {
    while !keys.is_closed() {
        if !event::poll(KEY_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && let Some(action) = map_key(key, deck_count)
            && keys.send(action).is_err()
        {
            break;
        }
    }
    Ok(())
}

async fn event_loop(
    intents: &mpsc::UnboundedSender<Intent>,
    signals: &mut mpsc::UnboundedReceiver<Signal>,
    keys: &mut mpsc::UnboundedReceiver<KeyAction>,
) -> Result<()> {
    let mut view = TextView::default();
    loop {
        tokio::select! {
            Some(signal) = signals.recv() => {
                if let Some(line) = view.describe(&signal) {
                    print!("{}\r\n", line);
                    io::stdout().flush()?;
                }
            }
            key = keys.recv() => match key {
                Some(KeyAction::Intent(intent)) => {
                    debug!(?intent, "Key mapped to intent");
                    intents.send(intent)?;
                }
                Some(KeyAction::Quit) => {
                    info!("User quit");
                    return Ok(());
                }
                None => {
                    warn!("Key reader stopped");
                    return Ok(());
                }
            },
        }
    }
}

/// Tracks just enough to print signals meaningfully.
#[derive(Debug, Default)]
struct TextView {
    decks: Vec<DeckSlot>,
    selected: Option<usize>,
    hint_visible: bool,
    odds: ProbabilitySnapshot,
}

impl TextView {
    fn describe(&mut self, signal: &Signal) -> Option<String> {
        match signal {
            Signal::SessionStarted {
                decks,
                score,
                selected_deck,
            }
            | Signal::Committed {
                decks,
                score,
                selected_deck,
            } => {
                self.decks = decks.clone();
                self.selected = *selected_deck;
                Some(format!("{}  score {}", self.board(), score))
            }
            Signal::SelectionChanged { selected_deck } => {
                self.selected = *selected_deck;
                Some(self.board())
            }
            Signal::Flip { card: Some(card) } => Some(format!("Drew {}", card)),
            Signal::Flip { card: None } => None,
            Signal::Message(message) | Signal::Notice(message) => Some(message.clone()),
            Signal::HintActivated {
                hints_remaining,
                rounds_remaining,
            } => {
                self.hint_visible = true;
                let mut line = format!(
                    "Hint on for {} rounds ({} left)",
                    rounds_remaining, hints_remaining
                );
                if !self.odds.is_empty() {
                    line.push_str("  ");
                    line.push_str(&odds_line(&self.odds));
                }
                Some(line)
            }
            Signal::HintExpired => {
                self.hint_visible = false;
                Some("Hint expired".to_string())
            }
            Signal::ProbabilitiesUpdated(snapshot) => {
                self.odds = snapshot.clone();
                self.hint_visible.then(|| odds_line(snapshot))
            }
            Signal::Celebrate => Some("*** You cleared the pool! ***".to_string()),
            Signal::CelebrationCleared => None,
            Signal::PersistResult { score, won, .. } => Some(format!(
                "Final score {} ({})",
                score,
                if *won { "won" } else { "lost" }
            )),
            Signal::Summary(summary) => Some(format!(
                "Games {}  won {}  best {}",
                summary.total_games,
                summary.games_won,
                summary
                    .best_score
                    .map_or_else(|| "-".to_string(), |s| s.to_string())
            )),
            Signal::SessionReset => {
                self.decks.clear();
                self.selected = None;
                self.hint_visible = false;
                self.odds.clear();
                Some("Game reset. Press s to start.".to_string())
            }
            Signal::ReauthRequired => {
                self.hint_visible = false;
                self.odds.clear();
                Some("Sign in again and set HIGHLOW_TOKEN.".to_string())
            }
            Signal::Sound(cue) => {
                debug!(%cue, "Sound cue");
                None
            }
        }
    }

    fn board(&self) -> String {
        self.decks
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                if self.selected == Some(i) {
                    format!(">{}<", slot)
                } else {
                    format!(" {} ", slot)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

fn odds_line(snapshot: &ProbabilitySnapshot) -> String {
    snapshot
        .iter()
        .map(|(deck, odds)| format!("{}: {}H/{}L of {}", deck + 1, odds.higher, odds.lower, odds.total))
        .collect::<Vec<_>>()
        .join("  ")
}
