use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use yourdle_types::{
    outcome::OutcomeLogEntry,
    rules::MAX_GUESSES,
    state::{PersistedState, STATE_VERSION},
    DecodeError,
};

/// Turns [`PersistedState`] into a cookie-safe token and back.
///
/// The token is the camelCase JSON form of the state, base64 encoded with the
/// URL-safe alphabet and no padding.
pub struct PersistedStateCodec;

impl PersistedStateCodec {
    pub fn encode(state: &PersistedState) -> String {
        // Plain data with string keys; serialization cannot fail.
        let json = serde_json::to_vec(state).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<PersistedState, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::Empty);
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|err| DecodeError::Encoding(err.to_string()))?;
        let json = std::str::from_utf8(&bytes).map_err(|_| DecodeError::Utf8)?;

        let version = serde_json::from_str::<VersionProbe>(json)
            .map_err(|err| DecodeError::Json(err.to_string()))?
            .version;
        if version != STATE_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let state: PersistedState =
            serde_json::from_str(json).map_err(|err| DecodeError::Json(err.to_string()))?;
        validate(&state)?;
        Ok(state)
    }
}

#[derive(serde::Deserialize)]
struct VersionProbe {
    version: u32,
}

fn validate(state: &PersistedState) -> Result<(), DecodeError> {
    state.stats.check_invariants().map_err(DecodeError::Invalid)?;

    let log = &state.outcome_log;
    if log.len() > MAX_GUESSES {
        return Err(DecodeError::Invalid(format!(
            "outcome log holds {} guesses, limit is {MAX_GUESSES}",
            log.len()
        )));
    }
    let lengths: HashSet<usize> = log.iter().map(|e| e.result.len()).collect();
    if lengths.len() > 1 {
        return Err(DecodeError::Invalid(
            "outcome log mixes guesses of different lengths".into(),
        ));
    }
    for (idx, entry) in log.iter().enumerate() {
        validate_entry(entry)
            .map_err(|reason| DecodeError::Invalid(format!("guess {}: {reason}", idx + 1)))?;
    }
    if let Some(win_at) = log.iter().position(OutcomeLogEntry::is_win) {
        if win_at + 1 != log.len() {
            return Err(DecodeError::Invalid(
                "outcome log continues after a winning guess".into(),
            ));
        }
    }
    Ok(())
}

fn validate_entry(entry: &OutcomeLogEntry) -> Result<(), String> {
    if entry.result.is_empty() {
        return Err("empty result".into());
    }
    if !entry.guess.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("'{}' is not made of letters", entry.guess));
    }
    if entry.guess.len() != entry.result.len() {
        return Err(format!(
            "'{}' has {} letters but {} outcomes",
            entry.guess,
            entry.guess.len(),
            entry.result.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use yourdle_types::{outcome::LetterOutcome::*, stats::StatsRecord};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn sample_state() -> PersistedState {
        PersistedState {
            version: STATE_VERSION,
            stats: StatsRecord {
                games_played: 4,
                current_streak: 2,
                max_streak: 3,
                distribution: vec![0, 1, 1, 1, 0, 0],
                last_win_date: NaiveDate::from_ymd_opt(2024, 5, 16),
                last_loss_date: NaiveDate::from_ymd_opt(2024, 5, 13),
            },
            last_played_date: today(),
            outcome_log: vec![
                OutcomeLogEntry::new("CRANE", vec![Correct, Correct, Correct, Wrong, Correct].into()),
                OutcomeLogEntry::new("CRATE", vec![Correct; 5].into()),
            ],
        }
    }

    fn encode_json(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    #[test]
    fn round_trip_is_lossless() {
        let state = sample_state();
        let token = PersistedStateCodec::encode(&state);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(PersistedStateCodec::decode(&token).unwrap(), state);

        let fresh = PersistedState::fresh(today());
        let token = PersistedStateCodec::encode(&fresh);
        assert_eq!(PersistedStateCodec::decode(&token).unwrap(), fresh);
    }

    #[test]
    fn empty_and_garbage_tokens_fail() {
        assert_eq!(PersistedStateCodec::decode(""), Err(DecodeError::Empty));
        assert_eq!(PersistedStateCodec::decode("   "), Err(DecodeError::Empty));
        assert!(matches!(
            PersistedStateCodec::decode("not base64!"),
            Err(DecodeError::Encoding(_))
        ));
        assert!(matches!(
            PersistedStateCodec::decode(&URL_SAFE_NO_PAD.encode([0xffu8, 0xfe, 0x00])),
            Err(DecodeError::Utf8)
        ));
        assert!(matches!(
            PersistedStateCodec::decode(&encode_json("\"hello\"")),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn truncated_token_fails() {
        let token = PersistedStateCodec::encode(&sample_state());
        for cut in [1, token.len() / 2, token.len() - 3] {
            assert!(
                PersistedStateCodec::decode(&token[..cut]).is_err(),
                "cut at {cut} decoded"
            );
        }
    }

    #[test]
    fn missing_field_fails() {
        let mut value = serde_json::to_value(sample_state()).unwrap();
        value.as_object_mut().unwrap().remove("gamesPlayed");
        let token = encode_json(&value.to_string());
        assert!(matches!(
            PersistedStateCodec::decode(&token),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn unknown_version_fails() {
        let mut value = serde_json::to_value(sample_state()).unwrap();
        value["version"] = serde_json::json!(2);
        let token = encode_json(&value.to_string());
        assert_eq!(
            PersistedStateCodec::decode(&token),
            Err(DecodeError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn structurally_invalid_states_fail() {
        let mut too_many_wins = sample_state();
        too_many_wins.stats.distribution = vec![5, 0, 0, 0, 0, 0];
        let mut bad_streak = sample_state();
        bad_streak.stats.current_streak = 9;
        let mut short_buckets = sample_state();
        short_buckets.stats.distribution = vec![1, 1];
        let mut mismatched = sample_state();
        mismatched.outcome_log[0].guess = "CRANES".into();
        let mut mixed = sample_state();
        mixed.outcome_log[0] = OutcomeLogEntry::new("CAT", vec![Wrong; 3].into());
        let mut after_win = sample_state();
        after_win.outcome_log.swap(0, 1);
        let mut overfull = sample_state();
        overfull.outcome_log = (0..7)
            .map(|_| OutcomeLogEntry::new("SLATE", vec![Wrong; 5].into()))
            .collect();
        let mut digits = sample_state();
        digits.outcome_log[0].guess = "CR4NE".into();

        for state in [
            too_many_wins,
            bad_streak,
            short_buckets,
            mismatched,
            mixed,
            after_win,
            overfull,
            digits,
        ] {
            let token = PersistedStateCodec::encode(&state);
            assert!(
                matches!(
                    PersistedStateCodec::decode(&token),
                    Err(DecodeError::Invalid(_))
                ),
                "accepted {state:?}"
            );
        }
    }
}
