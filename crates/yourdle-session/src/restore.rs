use chrono::NaiveDate;
use tracing::{info, warn};
use yourdle_engine::{LetterStateMerger, OutcomeLog, StatsAggregator};
use yourdle_ops::PersistedStateCodec;
use yourdle_types::{
    events::SessionState, keyboard::KeyboardLetterState, rules::GameRules, state::PersistedState,
    Result,
};

/// Mutable game state owned by a session.
#[derive(Debug, Clone)]
pub(crate) struct SessionCore {
    pub state: SessionState,
    pub log: OutcomeLog,
    pub keyboard: KeyboardLetterState,
    pub stats: StatsAggregator,
}

impl SessionCore {
    pub fn fresh() -> Self {
        Self {
            state: SessionState::AwaitingGuess,
            log: OutcomeLog::new(),
            keyboard: KeyboardLetterState::new(),
            stats: StatsAggregator::new(),
        }
    }

    pub fn snapshot(&self, today: NaiveDate) -> PersistedState {
        let mut persisted = PersistedState::fresh(today);
        persisted.stats = self.stats.record().clone();
        persisted.outcome_log = self.log.entries().to_vec();
        persisted
    }
}

/// What happened while turning a stored token back into a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RestoreReport {
    pub started_fresh: bool,
    /// A game from an earlier day was left unfinished and counted as a loss.
    pub abandoned_recorded: bool,
    /// Stored guesses were dropped: an earlier day's game or a different word length.
    pub log_discarded: bool,
    pub replayed: usize,
}

impl RestoreReport {
    /// Whether the rebuilt state differs from what is stored.
    pub fn needs_write(&self) -> bool {
        self.abandoned_recorded || self.log_discarded
    }
}

/// Rebuild session state from an optional stored token without scoring anything.
pub(crate) fn rebuild(
    token: Option<&str>,
    rules: &GameRules,
    today: NaiveDate,
) -> Result<(SessionCore, RestoreReport)> {
    let mut report = RestoreReport::default();
    let Some(token) = token else {
        return Ok((SessionCore::fresh(), report));
    };
    let persisted = match PersistedStateCodec::decode(token) {
        Ok(persisted) => persisted,
        Err(err) => {
            warn!("Discarding unreadable game state: {err}");
            report.started_fresh = true;
            return Ok((SessionCore::fresh(), report));
        }
    };

    let mut stats = StatsAggregator::from_record(persisted.stats);
    let mut log = OutcomeLog::from_entries(persisted.outcome_log)?;

    if persisted.last_played_date != today {
        if !log.is_empty() && !log.is_complete() {
            info!(
                "Recording unfinished game from {} as a loss",
                persisted.last_played_date
            );
            stats.record_completion(false, log.len(), persisted.last_played_date)?;
            report.abandoned_recorded = true;
        }
        report.log_discarded = !log.is_empty();
        log = OutcomeLog::new();
    }

    if log
        .last()
        .is_some_and(|entry| entry.result.len() != rules.word_length)
    {
        warn!(
            "Stored guesses do not match {}-letter puzzle; starting today's game over",
            rules.word_length
        );
        report.log_discarded = true;
        log = OutcomeLog::new();
    }

    let keyboard = LetterStateMerger::replay(log.replay());
    let state = if log.is_won() {
        SessionState::Won
    } else if log.is_full() {
        SessionState::Lost
    } else {
        SessionState::AwaitingGuess
    };
    report.replayed = log.len();

    Ok((
        SessionCore {
            state,
            log,
            keyboard,
            stats,
        },
        report,
    ))
}
