//! Compilation Configuration
//!
//! All knobs the pipeline honors, with defaults matching observed corpus
//! behavior. An optional TOML file can override them; a missing or
//! unparseable file falls back to defaults with a logged warning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::segmenter::NumberingMode;

/// Top-level configuration for a compilation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub document: DocumentConfig,
    pub pagination: PaginationConfig,
    pub placement: PlacementConfig,
    pub preview: PreviewConfig,
}

/// Corpus metadata carried into the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub title: String,
    pub author: String,
}

/// How chapter text is cut into pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Soft lower bound on words per page; only the final page of a scope
    /// may fall below it
    pub min_words: usize,
    /// Hard upper bound, except for single oversized paragraphs
    pub max_words: usize,
    /// When set, overrides the word band with a fixed paragraph count
    pub paragraphs_per_page: Option<usize>,
    pub numbering: NumberingMode,
}

/// How annotations land on pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Maximum annotations per page; overflow spills to later pages
    pub per_page_cap: usize,
    /// Scan chapter body text for embedded annotations
    pub extract_embedded: bool,
}

/// Caps for the reduced preview snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub chapters: usize,
    pub pages_per_chapter: usize,
    pub annotations_per_page: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Untitled Folio".to_string(),
            author: "Anonymous".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            min_words: 150,
            max_words: 250,
            paragraphs_per_page: None,
            numbering: NumberingMode::PerChapter,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            per_page_cap: 8,
            extract_embedded: true,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            chapters: 2,
            pages_per_chapter: 10,
            annotations_per_page: 6,
        }
    }
}

impl FolioConfig {
    /// Load configuration from `~/.config/folio/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, with the same fallback
    /// behavior as [`load`](Self::load).
    pub fn load_from(path: &PathBuf) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config at {}: {e} - using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!("No config file at {} - using defaults", path.display());
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("folio").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.pagination.min_words, 150);
        assert_eq!(config.pagination.max_words, 250);
        assert!(config.pagination.paragraphs_per_page.is_none());
        assert_eq!(config.placement.per_page_cap, 8);
        assert!(config.placement.extract_embedded);
        assert_eq!(config.preview.chapters, 2);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = FolioConfig::load_from(&PathBuf::from("/nonexistent/folio.toml"));
        assert_eq!(config.placement.per_page_cap, 8);
    }

    #[test]
    fn test_load_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[placement]\nper_page_cap = 4").unwrap();

        let config = FolioConfig::load_from(&file.path().to_path_buf());
        assert_eq!(config.placement.per_page_cap, 4);
        assert_eq!(config.pagination.max_words, 250);
    }

    #[test]
    fn test_load_unparseable_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        let config = FolioConfig::load_from(&file.path().to_path_buf());
        assert_eq!(config.placement.per_page_cap, 8);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = FolioConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: FolioConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.pagination.min_words, config.pagination.min_words);
    }
}
