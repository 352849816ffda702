use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::outcome::LetterOutcome;

/// Best outcome seen so far for each letter of the current game.
///
/// Letters are stored uppercase. A letter missing from the map is unseen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLetterState {
    letters: BTreeMap<char, LetterOutcome>,
}

impl KeyboardLetterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, letter: char) -> Option<LetterOutcome> {
        self.letters.get(&letter.to_ascii_uppercase()).copied()
    }

    /// Raise the letter's state to `outcome` if that is an improvement.
    /// Returns whether the stored state changed.
    pub fn improve(&mut self, letter: char, outcome: LetterOutcome) -> bool {
        let letter = letter.to_ascii_uppercase();
        match self.letters.get_mut(&letter) {
            Some(current) if outcome < *current => {
                *current = outcome;
                true
            }
            Some(_) => false,
            None => {
                self.letters.insert(letter, outcome);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, LetterOutcome)> + '_ {
        self.letters.iter().map(|(&letter, &outcome)| (letter, outcome))
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}
