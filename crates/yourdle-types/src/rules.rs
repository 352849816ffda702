use serde::{Deserialize, Serialize};

/// Number of guesses a player gets per puzzle.
pub const MAX_GUESSES: usize = 6;

pub const MIN_WORD_LENGTH: usize = 3;
pub const MAX_WORD_LENGTH: usize = 10;

/// Per-puzzle parameters. Every puzzle shares the guess budget; word length varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub word_length: usize,
}

impl GameRules {
    pub fn classic() -> Self {
        Self { word_length: 5 }
    }

    pub fn with_word_length(word_length: usize) -> Self {
        Self { word_length }
    }

    pub fn max_guesses(&self) -> usize {
        MAX_GUESSES
    }

    pub fn supports_word_length(word_length: usize) -> bool {
        (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&word_length)
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::classic()
    }
}
