use chrono::NaiveDate;
use tracing::debug;
use yourdle_types::{rules::MAX_GUESSES, stats::StatsRecord, Result, YourdleError};

/// Applies finished games to a [`StatsRecord`].
///
/// Not idempotent: every call counts a game. Callers must invoke it once per
/// completed game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsAggregator {
    record: StatsRecord,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: StatsRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &StatsRecord {
        &self.record
    }

    pub fn into_record(self) -> StatsRecord {
        self.record
    }

    pub fn record_completion(
        &mut self,
        won: bool,
        guess_count: usize,
        played_date: NaiveDate,
    ) -> Result<StatsRecord> {
        if won && !(1..=MAX_GUESSES).contains(&guess_count) {
            return Err(YourdleError::InvalidState(format!(
                "a win must take between 1 and {MAX_GUESSES} guesses, got {guess_count}"
            )));
        }
        if self.record.distribution.len() != MAX_GUESSES {
            self.record.distribution.resize(MAX_GUESSES, 0);
        }

        let stats = &mut self.record;
        stats.games_played += 1;
        if won {
            stats.current_streak += 1;
            stats.max_streak = stats.max_streak.max(stats.current_streak);
            stats.distribution[guess_count - 1] += 1;
            stats.last_win_date = Some(played_date);
        } else {
            stats.current_streak = 0;
            stats.last_loss_date = Some(played_date);
        }
        debug!(
            won,
            guess_count,
            games_played = stats.games_played,
            current_streak = stats.current_streak,
            "recorded game completion"
        );
        Ok(stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    #[test]
    fn win_then_loss() {
        let mut stats = StatsAggregator::new();
        let after_win = stats.record_completion(true, 3, day(1)).unwrap();
        assert_eq!(after_win.wins_in(3), 1);
        assert_eq!(after_win.games_played, 1);
        assert_eq!(after_win.current_streak, 1);
        assert_eq!(after_win.max_streak, 1);
        assert_eq!(after_win.last_win_date, Some(day(1)));

        let after_loss = stats.record_completion(false, 6, day(2)).unwrap();
        assert_eq!(after_loss.current_streak, 0);
        assert_eq!(after_loss.max_streak, 1);
        assert_eq!(after_loss.games_played, 2);
        assert_eq!(after_loss.last_loss_date, Some(day(2)));
        assert_eq!(after_loss.last_win_date, Some(day(1)));
        assert_eq!(after_loss.win_rate(), 50);
    }

    #[test]
    fn max_streak_survives_reset() {
        let mut stats = StatsAggregator::new();
        for d in 1..=3 {
            stats.record_completion(true, 4, day(d)).unwrap();
        }
        stats.record_completion(false, 6, day(4)).unwrap();
        let record = stats.record_completion(true, 1, day(5)).unwrap();
        assert_eq!(record.current_streak, 1);
        assert_eq!(record.max_streak, 3);
        assert_eq!(record.wins_in(4), 3);
        assert_eq!(record.wins_in(1), 1);
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn impossible_win_leaves_record_untouched() {
        let mut stats = StatsAggregator::new();
        assert!(stats.record_completion(true, 0, day(1)).is_err());
        assert!(stats.record_completion(true, 7, day(1)).is_err());
        assert_eq!(stats.record(), &StatsRecord::default());
    }

    #[test]
    fn short_distribution_is_padded() {
        let mut stats = StatsAggregator::from_record(StatsRecord {
            distribution: vec![0; 2],
            ..Default::default()
        });
        let record = stats.record_completion(true, 6, day(1)).unwrap();
        assert_eq!(record.distribution, vec![0, 0, 0, 0, 0, 1]);
    }
}
