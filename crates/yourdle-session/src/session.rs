use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard,
};

use chrono::NaiveDate;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};
use yourdle_engine::LetterStateMerger;
use yourdle_feed::SessionFeed;
use yourdle_oracle::{oracle_error, ScoringOracle};
use yourdle_ops::{PersistedStateCodec, StateStore};
use yourdle_types::{
    config::YourdleConfig,
    events::{
        GuessRecordedEvent, GuessRejectedEvent, RejectionReason, RestoredEvent, SessionEvent,
        SessionPayload, SessionState,
    },
    keyboard::KeyboardLetterState,
    outcome::{GameOutcomeRecord, OutcomeLogEntry},
    rules::GameRules,
    stats::StatsRecord,
    Result, YourdleError,
};

use crate::{
    restore::{rebuild, SessionCore},
    session_error,
    view::{board_rows, share_url, BoardRow, StatsView},
};

/// Fixed inputs of one session: which puzzle, its rules and the calendar day.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub slug: String,
    pub rules: GameRules,
    pub today: NaiveDate,
    pub oracle_timeout: Duration,
    pub share_base_url: String,
}

impl SessionSettings {
    pub fn from_config(config: &YourdleConfig, today: NaiveDate) -> Self {
        Self {
            slug: config.game.slug.clone(),
            rules: config.game.rules(),
            today,
            oracle_timeout: Duration::from_millis(config.oracle.timeout_ms),
            share_base_url: config.game.base_url.clone(),
        }
    }
}

/// What a successful submission did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub entry: OutcomeLogEntry,
    /// Zero-based board row the guess landed on.
    pub row: usize,
    pub state: SessionState,
    /// Set on the submission that ended the game.
    pub completed: Option<GameOutcomeRecord>,
}

/// One player's game for one slug on one day.
///
/// Mutable state lives behind a short-lived lock that is never held across the
/// oracle round-trip, so the query methods stay usable while a guess is
/// being scored.
pub struct GameSession<O, S, F>
where
    O: ScoringOracle,
    S: StateStore,
    F: SessionFeed,
{
    settings: SessionSettings,
    oracle: O,
    store: S,
    feed: F,
    core: Mutex<SessionCore>,
    pending: AtomicBool,
}

impl<O, S, F> GameSession<O, S, F>
where
    O: ScoringOracle,
    S: StateStore,
    F: SessionFeed,
{
    /// A brand-new game with zeroed statistics. Nothing is read from the store.
    pub fn new(settings: SessionSettings, oracle: O, store: S, feed: F) -> Self {
        Self {
            settings,
            oracle,
            store,
            feed,
            core: Mutex::new(SessionCore::fresh()),
            pending: AtomicBool::new(false),
        }
    }

    /// Load the slug's stored state and pick up where the player left off.
    ///
    /// Missing or unreadable state starts a fresh game. Neither the oracle nor
    /// the statistics are touched for guesses already on record.
    pub async fn restore(settings: SessionSettings, oracle: O, store: S, feed: F) -> Result<Self> {
        let token = match store.load(&settings.slug).await {
            Ok(token) => token,
            Err(err) => {
                warn!("Could not read stored state for {}: {err}", settings.slug);
                None
            }
        };
        let (core, report) = rebuild(token.as_deref(), &settings.rules, settings.today)?;
        info!(
            "Restored {} in {:?} with {} guesses replayed",
            settings.slug, core.state, report.replayed
        );
        let restored = RestoredEvent {
            state: core.state,
            replayed_guesses: report.replayed,
            started_fresh: report.started_fresh,
        };

        let session = Self {
            settings,
            oracle,
            store,
            feed,
            core: Mutex::new(core),
            pending: AtomicBool::new(false),
        };
        if report.needs_write() {
            session.persist_quietly().await;
        }
        session.publish(SessionPayload::Restored(restored)).await;
        Ok(session)
    }

    pub async fn submit_guess(&self, text: &str) -> Result<GuessOutcome> {
        let guess = text.trim().to_uppercase();
        let state = self.session_state();
        if state.is_terminal() {
            return Err(YourdleError::InvalidState(format!(
                "game is already {state:?}; no more guesses"
            )));
        }

        let letters = guess.chars().count();
        if letters != self.settings.rules.word_length {
            self.reject(&guess, RejectionReason::InvalidLength).await;
            return Err(YourdleError::InvalidGuessLength {
                expected: self.settings.rules.word_length,
                actual: letters,
            });
        }
        if !guess.chars().all(|c| c.is_ascii_uppercase()) {
            self.reject(&guess, RejectionReason::InvalidCharacters).await;
            return Err(YourdleError::InvalidGuessCharacters(guess));
        }

        let _pending = PendingGuess::claim(&self.pending)?;
        let result = match timeout(
            self.settings.oracle_timeout,
            self.oracle.score(&self.settings.slug, &guess),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(YourdleError::UnrecognizedWord(word))) => {
                self.reject(&guess, RejectionReason::UnrecognizedWord).await;
                return Err(YourdleError::UnrecognizedWord(word));
            }
            Ok(Err(err)) => {
                warn!("Scoring failed for {}: {err}", self.settings.slug);
                self.reject(&guess, RejectionReason::OracleUnavailable).await;
                return Err(match err {
                    YourdleError::OracleUnavailable(_) => err,
                    other => oracle_error(other.to_string()),
                });
            }
            Err(_) => {
                warn!(
                    "Scoring timed out after {:?} for {}",
                    self.settings.oracle_timeout, self.settings.slug
                );
                self.reject(&guess, RejectionReason::OracleUnavailable).await;
                return Err(oracle_error("scoring timed out"));
            }
        };
        if result.len() != letters {
            self.reject(&guess, RejectionReason::OracleUnavailable).await;
            return Err(oracle_error(format!(
                "oracle returned {} outcomes for a {letters}-letter guess",
                result.len()
            )));
        }

        let entry = OutcomeLogEntry::new(guess, result);
        let outcome = {
            let mut core = self.lock()?;
            self.apply(&mut core, entry)?
        };
        debug!(
            "Recorded guess {} for {}: {:?}",
            outcome.row + 1,
            self.settings.slug,
            outcome.state
        );

        // The guess is committed from here on; later failures are only logged.
        self.persist_quietly().await;
        self.publish(SessionPayload::GuessRecorded(GuessRecordedEvent {
            entry: outcome.entry.clone(),
            row: outcome.row,
            state: outcome.state,
        }))
        .await;
        if let Some(record) = &outcome.completed {
            self.publish(SessionPayload::Completed(record.clone()))
                .await;
        }
        Ok(outcome)
    }

    /// Append a scored guess and run the terminal transition if it ends the game.
    fn apply(&self, core: &mut SessionCore, entry: OutcomeLogEntry) -> Result<GuessOutcome> {
        if core.state.is_terminal() {
            return Err(YourdleError::InvalidState(format!(
                "game ended while scoring: {:?}",
                core.state
            )));
        }
        core.log.append(entry.clone())?;
        LetterStateMerger::merge_into(&mut core.keyboard, &entry);

        let row = core.log.len() - 1;
        core.state = if entry.is_win() {
            SessionState::Won
        } else if core.log.is_full() {
            SessionState::Lost
        } else {
            SessionState::AwaitingGuess
        };

        let completed = if core.state.is_terminal() {
            let won = core.state == SessionState::Won;
            core.stats
                .record_completion(won, core.log.len(), self.settings.today)?;
            info!(
                "{} finished: won={} in {} guesses",
                self.settings.slug,
                won,
                core.log.len()
            );
            Some(GameOutcomeRecord {
                entries: core.log.entries().to_vec(),
                won,
            })
        } else {
            None
        };

        Ok(GuessOutcome {
            entry,
            row,
            state: core.state,
            completed,
        })
    }

    /// Statistics panel for the UI. Also writes the current record to the store.
    pub async fn view_stats(&self) -> Result<StatsView> {
        let (stats, log) = self.read(|core| {
            (
                core.stats.record().clone(),
                core.log.entries().to_vec(),
            )
        });
        self.persist().await?;
        self.publish(SessionPayload::StatsViewed(stats.clone()))
            .await;
        Ok(StatsView::build(
            &stats,
            &log,
            self.settings.today,
            &share_url(&self.settings.share_base_url, &self.settings.slug),
        ))
    }

    pub async fn persist(&self) -> Result<()> {
        let snapshot = self.read(|core| core.snapshot(self.settings.today));
        let token = PersistedStateCodec::encode(&snapshot);
        self.store.save(&self.settings.slug, &token).await
    }

    async fn persist_quietly(&self) {
        if let Err(err) = self.persist().await {
            warn!("Could not save state for {}: {err}", self.settings.slug);
        }
    }

    async fn reject(&self, guess: &str, reason: RejectionReason) {
        self.publish(SessionPayload::GuessRejected(GuessRejectedEvent {
            guess: guess.to_string(),
            reason,
        }))
        .await;
    }

    /// Feed delivery is best-effort and never fails the operation that produced the event.
    async fn publish(&self, payload: SessionPayload) {
        let event = SessionEvent::new(self.settings.slug.clone(), payload);
        if let Err(err) = self.feed.publish(event).await {
            warn!("Could not publish session event for {}: {err}", self.settings.slug);
        }
    }

    pub fn keyboard_state(&self) -> KeyboardLetterState {
        self.read(|core| core.keyboard.clone())
    }

    pub fn outcome_log(&self) -> Vec<OutcomeLogEntry> {
        self.read(|core| core.log.entries().to_vec())
    }

    pub fn stats(&self) -> StatsRecord {
        self.read(|core| core.stats.record().clone())
    }

    pub fn session_state(&self) -> SessionState {
        self.read(|core| core.state)
    }

    /// Row the next guess will land on, or `None` once the game is over.
    pub fn active_row(&self) -> Option<usize> {
        self.read(|core| (!core.state.is_terminal()).then(|| core.log.len()))
    }

    pub fn board(&self) -> Vec<BoardRow> {
        self.read(|core| {
            board_rows(
                &self.settings.rules,
                core.log.entries(),
                !core.state.is_terminal(),
            )
        })
    }

    pub fn is_scoring(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn slug(&self) -> &str {
        &self.settings.slug
    }

    pub fn rules(&self) -> GameRules {
        self.settings.rules
    }

    pub fn today(&self) -> NaiveDate {
        self.settings.today
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionCore>> {
        self.core
            .lock()
            .map_err(|_| session_error("session state lock poisoned"))
    }

    fn read<T>(&self, f: impl FnOnce(&SessionCore) -> T) -> T {
        match self.core.lock() {
            Ok(core) => f(&core),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

/// Marks a guess as in flight; released on drop, including cancellation.
struct PendingGuess<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PendingGuess<'a> {
    fn claim(flag: &'a AtomicBool) -> Result<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            Err(YourdleError::GuessPending)
        } else {
            Ok(Self { flag })
        }
    }
}

impl Drop for PendingGuess<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
