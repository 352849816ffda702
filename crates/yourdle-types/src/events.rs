use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    outcome::{GameOutcomeRecord, OutcomeLogEntry},
    stats::StatsRecord,
};

/// Where a game session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    AwaitingGuess,
    Won,
    Lost,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Won | SessionState::Lost)
    }
}

/// Immutable event envelope published to UI subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub id: Uuid,
    pub slug: String,
    pub timestamp: DateTime<Utc>,
    pub payload: SessionPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionPayload {
    Restored(RestoredEvent),
    GuessRecorded(GuessRecordedEvent),
    GuessRejected(GuessRejectedEvent),
    Completed(GameOutcomeRecord),
    StatsViewed(StatsRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoredEvent {
    pub state: SessionState,
    pub replayed_guesses: usize,
    /// Whether the stored token had to be discarded.
    pub started_fresh: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRecordedEvent {
    pub entry: OutcomeLogEntry,
    pub row: usize,
    pub state: SessionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    InvalidLength,
    InvalidCharacters,
    UnrecognizedWord,
    OracleUnavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRejectedEvent {
    pub guess: String,
    pub reason: RejectionReason,
}

impl SessionEvent {
    pub fn new(slug: impl Into<String>, payload: SessionPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
