use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rules::MAX_GUESSES;

/// Running statistics for every game played on this client for one slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub games_played: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    /// `distribution[i]` counts wins that took `i + 1` guesses.
    pub distribution: Vec<u32>,
    pub last_win_date: Option<NaiveDate>,
    pub last_loss_date: Option<NaiveDate>,
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            games_played: 0,
            current_streak: 0,
            max_streak: 0,
            distribution: vec![0; MAX_GUESSES],
            last_win_date: None,
            last_loss_date: None,
        }
    }
}

impl StatsRecord {
    pub fn wins(&self) -> u32 {
        self.distribution.iter().sum()
    }

    /// Whole-percent win rate, truncated. Zero when nothing has been played.
    pub fn win_rate(&self) -> u32 {
        percent_of(self.wins(), self.games_played)
    }

    /// Wins that took exactly `guesses` guesses.
    pub fn wins_in(&self, guesses: usize) -> u32 {
        guesses
            .checked_sub(1)
            .and_then(|idx| self.distribution.get(idx))
            .copied()
            .unwrap_or(0)
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        if self.distribution.len() != MAX_GUESSES {
            return Err(format!(
                "distribution has {} buckets, expected {MAX_GUESSES}",
                self.distribution.len()
            ));
        }
        if self.wins() > self.games_played {
            return Err(format!(
                "{} wins recorded across only {} games",
                self.wins(),
                self.games_played
            ));
        }
        if self.current_streak > self.max_streak {
            return Err(format!(
                "current streak {} exceeds max streak {}",
                self.current_streak, self.max_streak
            ));
        }
        Ok(())
    }
}

/// Truncating percentage that treats an empty total as zero.
pub fn percent_of(part: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as u64 * 100) / total as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_rate_without_games_is_zero() {
        assert_eq!(StatsRecord::default().win_rate(), 0);
    }

    #[test]
    fn win_rate_truncates() {
        let stats = StatsRecord {
            games_played: 3,
            current_streak: 2,
            max_streak: 2,
            distribution: vec![0, 1, 1, 0, 0, 0],
            ..Default::default()
        };
        assert_eq!(stats.win_rate(), 66);
        assert_eq!(stats.wins_in(2), 1);
        assert_eq!(stats.wins_in(0), 0);
        assert!(stats.check_invariants().is_ok());
    }

    #[test]
    fn invariants_catch_bad_records() {
        let mut stats = StatsRecord {
            games_played: 1,
            distribution: vec![2, 0, 0, 0, 0, 0],
            ..Default::default()
        };
        assert!(stats.check_invariants().is_err());
        stats.distribution = vec![0; 4];
        assert!(stats.check_invariants().is_err());
        stats.distribution = vec![0; MAX_GUESSES];
        stats.current_streak = 1;
        assert!(stats.check_invariants().is_err());
    }
}
