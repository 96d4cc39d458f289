//! Configuration via `studymatch.toml`
//!
//! A single config file holds encoder, index and ranking settings. Every
//! field has a default, so an empty file is a valid config.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "studymatch.toml";

/// Default base URL for study links.
pub const DEFAULT_STUDY_URL_BASE: &str = "https://lichess.org/study/";

// ============================================================================
// Sections
// ============================================================================

/// Position encoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Keep `/` between ranks (71 symbols instead of 64).
    #[serde(default)]
    pub rank_separators: bool,
    /// Placeholder emitted once per empty square.
    #[serde(default = "default_empty_symbol")]
    pub empty_symbol: char,
}

fn default_empty_symbol() -> char {
    '.'
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            rank_separators: false,
            empty_symbol: default_empty_symbol(),
        }
    }
}

impl EncoderConfig {
    /// Check that `symbol` can stand for an empty square.
    ///
    /// It must be a single-byte printable ASCII character, so every
    /// encoding of one layout has the same byte length, and it must not
    /// collide with a piece letter, a run-length digit or `/`.
    pub fn check_empty_symbol(symbol: char) -> Result<()> {
        if !symbol.is_ascii_graphic() {
            return Err(Error::config(format!(
                "encoder.empty_symbol {:?} must be a printable ASCII character",
                symbol
            )));
        }
        if symbol.is_ascii_digit() || symbol == '/' || "pnbrqkPNBRQK".contains(symbol) {
            return Err(Error::config(format!(
                "encoder.empty_symbol {:?} collides with board notation",
                symbol
            )));
        }
        Ok(())
    }
}

/// Corpus index build settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Build documents on a worker pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Worker count; `None` uses one per core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Ranking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Closest corpus positions considered for each ply of the game.
    #[serde(default = "default_top_n_ply_matches")]
    pub top_n_ply_matches: usize,
    /// Ranked chapters returned to the caller.
    #[serde(default = "default_top_n_results")]
    pub top_n_results: usize,
    /// Split each per-ply corpus scan across worker threads.
    #[serde(default)]
    pub parallel_scan: bool,
    /// Prefix for study links.
    #[serde(default = "default_study_url_base")]
    pub study_url_base: String,
}

fn default_top_n_ply_matches() -> usize {
    1
}

fn default_top_n_results() -> usize {
    3
}

fn default_study_url_base() -> String {
    DEFAULT_STUDY_URL_BASE.to_string()
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n_ply_matches: default_top_n_ply_matches(),
            top_n_results: default_top_n_results(),
            parallel_scan: false,
            study_url_base: default_study_url_base(),
        }
    }
}

// ============================================================================
// StudyMatchConfig
// ============================================================================

/// Configuration loaded from `studymatch.toml`.
///
/// # Example
///
/// ```toml
/// [encoder]
/// rank_separators = false
///
/// [ranking]
/// top_n_ply_matches = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMatchConfig {
    /// Encoder settings.
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Index settings.
    #[serde(default)]
    pub index: IndexConfig,
    /// Ranking settings.
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl StudyMatchConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# studymatch configuration

[encoder]
# Keep "/" between ranks in encoded positions (71 symbols instead of 64).
# Must match the setting used to build the corpus.
rank_separators = false
# Placeholder for an empty square.
empty_symbol = "."

[index]
# Replay studies on a worker pool.
parallel = true
# threads = 8

[ranking]
# Closest corpus positions considered per ply of the game.
top_n_ply_matches = 1
# Ranked chapters returned.
top_n_results = 3
# Split each per-ply corpus scan across worker threads.
parallel_scan = false
study_url_base = "https://lichess.org/study/"
"#
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_n_ply_matches == 0 {
            return Err(Error::config("ranking.top_n_ply_matches must be at least 1"));
        }
        if self.ranking.top_n_results == 0 {
            return Err(Error::config("ranking.top_n_results must be at least 1"));
        }
        if self.index.threads == Some(0) {
            return Err(Error::config("index.threads must be at least 1"));
        }
        EncoderConfig::check_empty_symbol(self.encoder.empty_symbol)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: StudyMatchConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_toml_parses_to_default() {
        let config: StudyMatchConfig = toml::from_str(StudyMatchConfig::default_toml()).unwrap();
        assert_eq!(config, StudyMatchConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = StudyMatchConfig::from_file(&path).unwrap();
        assert_eq!(config.ranking.top_n_ply_matches, 1);
        assert_eq!(config.ranking.top_n_results, 3);
        assert!(!config.encoder.rank_separators);
        assert!(config.index.parallel);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: StudyMatchConfig = toml::from_str(
            r#"
[ranking]
top_n_ply_matches = 4
"#,
        )
        .unwrap();
        assert_eq!(config.ranking.top_n_ply_matches, 4);
        assert_eq!(config.ranking.top_n_results, 3);
        assert_eq!(config.ranking.study_url_base, DEFAULT_STUDY_URL_BASE);
    }

    #[test]
    fn zero_ply_matches_rejected() {
        let mut config = StudyMatchConfig::default();
        config.ranking.top_n_ply_matches = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_threads_rejected() {
        let mut config = StudyMatchConfig::default();
        config.index.threads = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn piece_letter_empty_symbol_rejected() {
        let mut config = StudyMatchConfig::default();
        config.encoder.empty_symbol = 'k';
        assert!(config.validate().is_err());
        config.encoder.empty_symbol = '3';
        assert!(config.validate().is_err());
        config.encoder.empty_symbol = '-';
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_ascii_or_blank_empty_symbol_rejected() {
        let mut config = StudyMatchConfig::default();
        for symbol in ['·', ' ', '\t', 'é'] {
            config.encoder.empty_symbol = symbol;
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{:?}", symbol);
        }
        assert!(EncoderConfig::check_empty_symbol('_').is_ok());
    }

    #[test]
    fn non_ascii_empty_symbol_in_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[encoder]\nempty_symbol = \"·\"\n").unwrap();
        assert!(matches!(StudyMatchConfig::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[ranking]\ntop_n_results = \"many\"\n").unwrap();

        let err = StudyMatchConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[ranking]\ntop_n_results = 7\n").unwrap();

        StudyMatchConfig::write_default_if_missing(&path).unwrap();

        let config = StudyMatchConfig::from_file(&path).unwrap();
        assert_eq!(config.ranking.top_n_results, 7);
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = StudyMatchConfig::default();
        config.encoder.rank_separators = true;
        config.index.threads = Some(2);
        config.ranking.parallel_scan = true;

        config.write_to_file(&path).unwrap();
        let loaded = StudyMatchConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
