use yourdle_types::{keyboard::KeyboardLetterState, outcome::OutcomeLogEntry};

/// Folds scored guesses into per-letter keyboard state.
///
/// A letter only ever moves towards `Correct`; a later, worse outcome for the
/// same letter (say, `Wrong` at a second position) is ignored.
pub struct LetterStateMerger;

impl LetterStateMerger {
    pub fn merge(current: &KeyboardLetterState, entry: &OutcomeLogEntry) -> KeyboardLetterState {
        let mut next = current.clone();
        Self::merge_into(&mut next, entry);
        next
    }

    pub fn merge_into(state: &mut KeyboardLetterState, entry: &OutcomeLogEntry) {
        for (letter, outcome) in entry.letters() {
            state.improve(letter, outcome);
        }
    }

    /// Rebuild keyboard state from scratch, in submission order.
    pub fn replay<'a, I>(entries: I) -> KeyboardLetterState
    where
        I: IntoIterator<Item = &'a OutcomeLogEntry>,
    {
        let mut state = KeyboardLetterState::new();
        for entry in entries {
            Self::merge_into(&mut state, entry);
        }
        state
    }
}
