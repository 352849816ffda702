use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{outcome::OutcomeLogEntry, stats::StatsRecord};

/// Current schema version of the persisted record.
pub const STATE_VERSION: u32 = 1;

/// Everything the client keeps between page loads for one game slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub version: u32,
    #[serde(flatten)]
    pub stats: StatsRecord,
    pub last_played_date: NaiveDate,
    /// Guesses of the in-progress or most recent game.
    pub outcome_log: Vec<OutcomeLogEntry>,
}

impl PersistedState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            version: STATE_VERSION,
            stats: StatsRecord::default(),
            last_played_date: today,
            outcome_log: Vec::new(),
        }
    }
}
