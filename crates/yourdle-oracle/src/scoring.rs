use yourdle_types::outcome::{GuessResult, LetterOutcome};

/// Score `guess` against `secret`, both expected to be the same length.
///
/// Exact matches claim their secret letter first; remaining guess letters then
/// claim the leftmost unclaimed copy in the secret. Comparison ignores case.
pub fn score_guess(guess: &str, secret: &str) -> GuessResult {
    let guess: Vec<char> = guess.chars().map(|c| c.to_ascii_uppercase()).collect();
    let mut remaining: Vec<Option<char>> = secret
        .chars()
        .map(|c| Some(c.to_ascii_uppercase()))
        .collect();
    let mut outcomes = vec![LetterOutcome::Wrong; guess.len()];

    for (idx, &letter) in guess.iter().enumerate() {
        if remaining.get(idx).copied().flatten() == Some(letter) {
            remaining[idx] = None;
            outcomes[idx] = LetterOutcome::Correct;
        }
    }

    for (idx, &letter) in guess.iter().enumerate() {
        if outcomes[idx] != LetterOutcome::Wrong {
            continue;
        }
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(letter)) {
            *slot = None;
            outcomes[idx] = LetterOutcome::Near;
        }
    }

    GuessResult::new(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterOutcome::*;

    #[test]
    fn crane_against_crate() {
        assert_eq!(
            score_guess("CRANE", "CRATE").outcomes(),
            &[Correct, Correct, Correct, Wrong, Correct]
        );
    }

    #[test]
    fn duplicate_letters_are_claimed_once() {
        // Both Ls of the secret go to the exact matches, leaving none for the first L.
        assert_eq!(
            score_guess("LOLLY", "HELLO").outcomes(),
            &[Wrong, Near, Correct, Correct, Wrong]
        );
        assert_eq!(
            score_guess("SPEED", "ABIDE").outcomes(),
            &[Wrong, Wrong, Near, Wrong, Near]
        );
        assert_eq!(
            score_guess("EERIE", "STONE").outcomes(),
            &[Wrong, Wrong, Wrong, Wrong, Correct]
        );
    }

    #[test]
    fn case_is_ignored() {
        assert!(score_guess("crate", "CRATE").is_win());
    }
}
