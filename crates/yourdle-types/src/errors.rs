use thiserror::Error;

pub type Result<T, E = YourdleError> = std::result::Result<T, E>;

/// Unified error type covering guess submission, persistence and setup failures.
#[derive(Debug, Error)]
pub enum YourdleError {
    #[error("guess must be {expected} letters, got {actual}")]
    InvalidGuessLength { expected: usize, actual: usize },
    #[error("guess may only contain letters A-Z: {0}")]
    InvalidGuessCharacters(String),
    #[error("not a recognized word: {0}")]
    UnrecognizedWord(String),
    #[error("scoring oracle unavailable: {0}")]
    OracleUnavailable(String),
    #[error("outcome log already holds {capacity} guesses")]
    CapacityExceeded { capacity: usize },
    #[error("invalid session state: {0}")]
    InvalidState(String),
    #[error("a guess is already being scored")]
    GuessPending,
    #[error("persisted state unreadable: {0}")]
    Decode(#[from] DecodeError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("operational error: {0}")]
    Ops(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl YourdleError {
    /// Whether the player can simply try again. Sequencing bugs are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            YourdleError::InvalidGuessLength { .. }
                | YourdleError::InvalidGuessCharacters(_)
                | YourdleError::UnrecognizedWord(_)
                | YourdleError::OracleUnavailable(_)
                | YourdleError::GuessPending
                | YourdleError::Decode(_)
        )
    }
}

/// Reasons a persisted token could not be turned back into state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is empty")]
    Empty,
    #[error("token is not valid base64: {0}")]
    Encoding(String),
    #[error("token payload is not utf-8")]
    Utf8,
    #[error("token payload is not valid state json: {0}")]
    Json(String),
    #[error("unsupported state version {0}")]
    UnsupportedVersion(u32),
    #[error("structurally invalid state: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequencing_errors_are_not_recoverable() {
        assert!(!YourdleError::CapacityExceeded { capacity: 6 }.is_recoverable());
        assert!(!YourdleError::InvalidState("won".into()).is_recoverable());
        assert!(YourdleError::UnrecognizedWord("QZXJV".into()).is_recoverable());
        assert!(YourdleError::InvalidGuessCharacters("12345".into()).is_recoverable());
        assert!(YourdleError::from(DecodeError::Empty).is_recoverable());
    }
}
