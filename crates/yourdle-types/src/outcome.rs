use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-letter verdict from the scoring oracle.
///
/// Variant order is the quality order: `Correct` is the most informative and
/// compares lowest, so `min` picks the better of two outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterOutcome {
    Correct,
    Near,
    Wrong,
}

impl LetterOutcome {
    /// The more informative of two outcomes.
    pub fn best(self, other: LetterOutcome) -> LetterOutcome {
        self.min(other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LetterOutcome::Correct => "correct",
            LetterOutcome::Near => "near",
            LetterOutcome::Wrong => "wrong",
        }
    }

    /// Marker used in share summaries.
    pub fn emoji(self) -> &'static str {
        match self {
            LetterOutcome::Correct => "🟢",
            LetterOutcome::Near => "🟡",
            LetterOutcome::Wrong => "⚫",
        }
    }
}

impl fmt::Display for LetterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered outcomes for one guess, one per letter position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuessResult(Vec<LetterOutcome>);

impl GuessResult {
    pub fn new(outcomes: Vec<LetterOutcome>) -> Self {
        Self(outcomes)
    }

    pub fn outcomes(&self) -> &[LetterOutcome] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_win(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&o| o == LetterOutcome::Correct)
    }

    pub fn iter(&self) -> impl Iterator<Item = LetterOutcome> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<LetterOutcome>> for GuessResult {
    fn from(outcomes: Vec<LetterOutcome>) -> Self {
        Self(outcomes)
    }
}

/// One scored guess as recorded in the outcome log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeLogEntry {
    pub guess: String,
    pub result: GuessResult,
}

impl OutcomeLogEntry {
    pub fn new(guess: impl Into<String>, result: GuessResult) -> Self {
        Self {
            guess: guess.into(),
            result,
        }
    }

    pub fn is_win(&self) -> bool {
        self.result.is_win()
    }

    /// Letters paired with their outcome, position by position.
    pub fn letters(&self) -> impl Iterator<Item = (char, LetterOutcome)> + '_ {
        self.guess.chars().zip(self.result.iter())
    }

    /// Emoji row for share summaries, e.g. `🟢 🟡 ⚫ ⚫ 🟢`.
    pub fn emoji_row(&self) -> String {
        self.result
            .iter()
            .map(LetterOutcome::emoji)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Summary of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcomeRecord {
    pub entries: Vec<OutcomeLogEntry>,
    pub won: bool,
}

impl GameOutcomeRecord {
    pub fn guess_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterOutcome::*;

    #[test]
    fn correct_is_best() {
        assert_eq!(Wrong.best(Correct), Correct);
        assert_eq!(Near.best(Wrong), Near);
        assert_eq!(Near.best(Near), Near);
        assert!(Correct < Near && Near < Wrong);
    }

    #[test]
    fn outcomes_serialize_lowercase() {
        let result = GuessResult::new(vec![Correct, Near, Wrong]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"["correct","near","wrong"]"#);
    }

    #[test]
    fn win_requires_all_correct() {
        assert!(GuessResult::new(vec![Correct; 5]).is_win());
        assert!(!GuessResult::new(vec![Correct, Correct, Near, Correct, Correct]).is_win());
        assert!(!GuessResult::new(Vec::new()).is_win());
    }

    #[test]
    fn emoji_row_joins_with_spaces() {
        let entry = OutcomeLogEntry::new("CRANE", vec![Correct, Near, Wrong].into());
        assert_eq!(entry.emoji_row(), "🟢 🟡 ⚫");
    }
}
