use yourdle_types::{outcome::OutcomeLogEntry, rules::MAX_GUESSES, Result, YourdleError};

/// Append-only record of the current game's scored guesses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeLog {
    entries: Vec<OutcomeLogEntry>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_GUESSES),
        }
    }

    /// Rebuild a log from persisted entries, rejecting more than the guess budget.
    pub fn from_entries(entries: Vec<OutcomeLogEntry>) -> Result<Self> {
        let mut log = Self::new();
        for entry in entries {
            log.append(entry)?;
        }
        Ok(log)
    }

    pub fn capacity(&self) -> usize {
        MAX_GUESSES
    }

    pub fn append(&mut self, entry: OutcomeLogEntry) -> Result<()> {
        if self.is_full() {
            return Err(YourdleError::CapacityExceeded {
                capacity: MAX_GUESSES,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Entries in submission order. Call again to start over.
    pub fn replay(&self) -> impl Iterator<Item = &OutcomeLogEntry> + Clone + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_GUESSES
    }

    pub fn last(&self) -> Option<&OutcomeLogEntry> {
        self.entries.last()
    }

    pub fn is_won(&self) -> bool {
        self.last().is_some_and(OutcomeLogEntry::is_win)
    }

    /// Won, or out of guesses.
    pub fn is_complete(&self) -> bool {
        self.is_won() || self.is_full()
    }

    pub fn entries(&self) -> &[OutcomeLogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<OutcomeLogEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yourdle_types::outcome::LetterOutcome::*;

    fn miss(guess: &str) -> OutcomeLogEntry {
        OutcomeLogEntry::new(guess, vec![Wrong; guess.len()].into())
    }

    #[test]
    fn append_until_capacity() {
        let mut log = OutcomeLog::new();
        for guess in ["AAAAA", "BBBBB", "CCCCC", "DDDDD", "EEEEE", "FFFFF"] {
            log.append(miss(guess)).expect("room left");
        }
        assert!(log.is_full());
        assert!(log.is_complete());
        assert!(!log.is_won());
        let err = log.append(miss("GGGGG")).unwrap_err();
        assert!(matches!(err, YourdleError::CapacityExceeded { capacity: 6 }));
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn replay_is_ordered_and_restartable() {
        let log =
            OutcomeLog::from_entries(vec![miss("SLATE"), miss("CRONY"), miss("BUMPH")]).unwrap();
        let first: Vec<_> = log.replay().map(|e| e.guess.as_str()).collect();
        let second: Vec<_> = log.replay().map(|e| e.guess.as_str()).collect();
        assert_eq!(first, vec!["SLATE", "CRONY", "BUMPH"]);
        assert_eq!(first, second);
    }

    #[test]
    fn from_entries_rejects_overfull_history() {
        let entries = (0..7).map(|_| miss("ABCDE")).collect();
        assert!(OutcomeLog::from_entries(entries).is_err());
    }

    #[test]
    fn winning_entry_completes_log() {
        let mut log = OutcomeLog::new();
        log.append(miss("CRANE")).unwrap();
        assert!(!log.is_complete());
        log.append(OutcomeLogEntry::new("CRATE", vec![Correct; 5].into()))
            .unwrap();
        assert!(log.is_won());
        assert!(log.is_complete());
    }
}
