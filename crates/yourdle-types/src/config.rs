use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{rules::GameRules, Result, YourdleError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub slug: String,
    pub word_length: usize,
    /// Prefix for share links, e.g. `https://yourdle.edgecompute.app`.
    pub base_url: String,
}

impl GameConfig {
    pub fn rules(&self) -> GameRules {
        GameRules::with_word_length(self.word_length)
    }
}

/// A puzzle served by the in-process oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub slug: String,
    pub secret: String,
    #[serde(default)]
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub timeout_ms: u64,
    #[serde(default)]
    pub puzzles: Vec<PuzzleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub state_dir: String,
    pub cookie_prefix: String,
    pub cookie_max_age_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YourdleConfig {
    pub game: GameConfig,
    pub oracle: OracleConfig,
    pub storage: StorageConfig,
    pub ops: OpsConfig,
}

impl YourdleConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            YourdleError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            YourdleError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.game.slug.trim().is_empty() {
            return Err(YourdleError::Configuration(
                "game.slug must not be empty".into(),
            ));
        }
        if !GameRules::supports_word_length(self.game.word_length) {
            return Err(YourdleError::Configuration(format!(
                "game.word_length must be between 3 and 10, got {}",
                self.game.word_length
            )));
        }
        if self.oracle.timeout_ms == 0 {
            return Err(YourdleError::Configuration(
                "oracle.timeout_ms must be greater than zero".into(),
            ));
        }
        if self.storage.cookie_prefix.is_empty() {
            return Err(YourdleError::Configuration(
                "storage.cookie_prefix must not be empty".into(),
            ));
        }
        if self.storage.state_dir.is_empty() {
            return Err(YourdleError::Configuration(
                "storage.state_dir must not be empty".into(),
            ));
        }
        for puzzle in &self.oracle.puzzles {
            if puzzle.slug == self.game.slug
                && puzzle.secret.chars().count() != self.game.word_length
            {
                return Err(YourdleError::Configuration(format!(
                    "secret for puzzle '{}' must be {} letters",
                    puzzle.slug, self.game.word_length
                )));
            }
            if !puzzle.secret.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(YourdleError::Configuration(format!(
                    "secret for puzzle '{}' must be ASCII letters only",
                    puzzle.slug
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_config() -> YourdleConfig {
        YourdleConfig {
            game: GameConfig {
                slug: "pets".into(),
                word_length: 5,
                base_url: "https://yourdle.edgecompute.app".into(),
            },
            oracle: OracleConfig {
                timeout_ms: 2_000,
                puzzles: vec![PuzzleConfig {
                    slug: "pets".into(),
                    secret: "HOUND".into(),
                    words: vec!["HOUND".into(), "KITTY".into()],
                }],
            },
            storage: StorageConfig {
                state_dir: "state".into(),
                cookie_prefix: "yourdle".into(),
                cookie_max_age_secs: 365 * 24 * 60 * 60,
            },
            ops: OpsConfig {
                log_level: "debug".into(),
            },
        }
    }

    #[test]
    fn load_yourdle_config_from_file() {
        let temp_path = std::env::temp_dir().join("yourdle-config-test.toml");
        let config = sample_config();

        let doc = toml::to_string(&config).expect("serialize config");
        fs::write(&temp_path, doc).expect("write temp config");

        let loaded = YourdleConfig::from_file(&temp_path).expect("load config");
        assert_eq!(loaded.game.slug, config.game.slug);
        assert_eq!(loaded.game.rules(), GameRules::classic());
        assert_eq!(loaded.oracle.puzzles.len(), 1);
        assert_eq!(loaded.oracle.puzzles[0].secret, "HOUND");
        fs::remove_file(&temp_path).expect("cleanup temp config");
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let err = YourdleConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, YourdleError::Configuration(_)));
    }

    #[test]
    fn validate_configuration_rules() {
        let mut config = sample_config();
        assert!(config.validate().is_ok());

        config.game.word_length = 2;
        assert!(config.validate().is_err());
        config.game.word_length = 5;
        config.oracle.timeout_ms = 0;
        assert!(config.validate().is_err());
        config.oracle.timeout_ms = 500;
        config.storage.cookie_prefix.clear();
        assert!(config.validate().is_err());
        config.storage.cookie_prefix = "yourdle".into();
        config.oracle.puzzles[0].secret = "CAT".into();
        assert!(config.validate().is_err());
        config.oracle.puzzles[0].secret = "HOUND".into();
        config.game.slug = " ".into();
        assert!(config.validate().is_err());
        config.game.slug = "pets".into();
        assert!(config.validate().is_ok());
    }
}
