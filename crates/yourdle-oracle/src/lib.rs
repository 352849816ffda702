//! Scoring oracle abstraction: the collaborator that knows the secret word.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};
use yourdle_types::{config::PuzzleConfig, outcome::GuessResult, Result, YourdleError};

mod scoring;

pub use scoring::score_guess;

/// Contract of the remote scorer.
///
/// Implementations answer `UnrecognizedWord` for words outside the puzzle's
/// list and `OracleUnavailable` for anything transient.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(&self, slug: &str, guess: &str) -> Result<GuessResult>;
    fn metrics(&self) -> OracleMetrics;
}

/// Counters kept by oracle implementations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OracleMetrics {
    pub scored: u64,
    pub unrecognized: u64,
    pub failures: u64,
}

struct Puzzle {
    secret: String,
    words: Vec<String>,
}

impl Puzzle {
    /// An empty word list accepts any letters-only guess of the right length.
    fn accepts(&self, guess: &str) -> bool {
        if !guess.chars().all(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        guess.eq_ignore_ascii_case(&self.secret)
            || self.words.is_empty()
            || self.words.iter().any(|w| w.eq_ignore_ascii_case(guess))
    }
}

/// In-process oracle serving a fixed set of puzzles, used by the CLI and tests.
pub struct LocalOracle {
    puzzles: HashMap<String, Puzzle>,
    latency: Duration,
    metrics: Arc<Mutex<OracleMetrics>>,
}

impl LocalOracle {
    pub fn new() -> Self {
        Self {
            puzzles: HashMap::new(),
            latency: Duration::ZERO,
            metrics: Arc::new(Mutex::new(OracleMetrics::default())),
        }
    }

    pub fn from_puzzles(puzzles: &[PuzzleConfig]) -> Self {
        puzzles.iter().fold(Self::new(), |oracle, puzzle| {
            oracle.with_puzzle(&puzzle.slug, &puzzle.secret, puzzle.words.clone())
        })
    }

    pub fn with_puzzle(
        mut self,
        slug: impl Into<String>,
        secret: &str,
        words: impl IntoIterator<Item = String>,
    ) -> Self {
        self.puzzles.insert(
            slug.into(),
            Puzzle {
                secret: secret.to_ascii_uppercase(),
                words: words.into_iter().collect(),
            },
        );
        self
    }

    /// Simulated round-trip delay applied before every answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn bump(&self, update: impl FnOnce(&mut OracleMetrics)) {
        if let Ok(mut metrics) = self.metrics.lock() {
            update(&mut metrics);
        }
    }
}

impl Default for LocalOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringOracle for LocalOracle {
    async fn score(&self, slug: &str, guess: &str) -> Result<GuessResult> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        let Some(puzzle) = self.puzzles.get(slug) else {
            self.bump(|m| m.failures += 1);
            return Err(oracle_error(format!("no puzzle published for '{slug}'")));
        };
        if guess.chars().count() != puzzle.secret.chars().count() || !puzzle.accepts(guess) {
            debug!("Rejecting unrecognized word {} for {}", guess, slug);
            self.bump(|m| m.unrecognized += 1);
            return Err(YourdleError::UnrecognizedWord(guess.to_string()));
        }
        let result = score_guess(guess, &puzzle.secret);
        info!("Scored guess for {}: win={}", slug, result.is_win());
        self.bump(|m| m.scored += 1);
        Ok(result)
    }

    fn metrics(&self) -> OracleMetrics {
        self.metrics.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

/// Generate an error aligned with oracle semantics.
pub fn oracle_error(message: impl Into<String>) -> YourdleError {
    YourdleError::OracleUnavailable(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yourdle_types::outcome::LetterOutcome::*;

    fn oracle() -> LocalOracle {
        LocalOracle::new().with_puzzle(
            "daily",
            "crate",
            ["CRANE", "SLATE", "TRACE"].map(String::from),
        )
    }

    #[tokio::test]
    async fn scores_listed_words() {
        let oracle = oracle();
        let result = oracle.score("daily", "CRANE").await.expect("listed word");
        assert_eq!(result.outcomes(), &[Correct, Correct, Correct, Wrong, Correct]);
        assert!(oracle.score("daily", "crate").await.unwrap().is_win());
        assert_eq!(oracle.metrics().scored, 2);
    }

    #[tokio::test]
    async fn unlisted_word_is_unrecognized() {
        let oracle = oracle();
        let err = oracle.score("daily", "QXZZY").await.unwrap_err();
        assert!(matches!(err, YourdleError::UnrecognizedWord(_)));
        assert_eq!(oracle.metrics().unrecognized, 1);
    }

    #[tokio::test]
    async fn unknown_slug_is_unavailable() {
        let err = oracle().score("weekly", "CRANE").await.unwrap_err();
        assert!(matches!(err, YourdleError::OracleUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_word_list_accepts_any_word_of_right_length() {
        let oracle = LocalOracle::new().with_puzzle("open", "PLUMB", Vec::new());
        assert!(oracle.score("open", "ZZZZZ").await.is_ok());
        assert!(oracle.score("open", "ZZZZ").await.is_err());
    }

    #[tokio::test]
    async fn open_puzzle_still_requires_letters() {
        let oracle = LocalOracle::new().with_puzzle("open", "PLUMB", Vec::new());
        for guess in ["12345", "ÉCRAN", "PL MB"] {
            let err = oracle.score("open", guess).await.unwrap_err();
            assert!(matches!(err, YourdleError::UnrecognizedWord(_)));
        }
        assert_eq!(oracle.metrics().scored, 0);
    }
}
