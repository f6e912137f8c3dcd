//! Application configuration.
//!
//! Read from `notedex.config.json` in the working directory when that file
//! exists. Every field is optional; missing ones take their defaults.
//!
//! ```json
//! {
//!   "database_path": "notedex.sqlite3",
//!   "window_size": [520.0, 720.0],
//!   "study": { "distractor_count": 3, "dedupe_distractors": false }
//! }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "notedex.config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the deck document.
    pub database_path: PathBuf,
    pub window_size: [f32; 2],
    pub study: StudyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("notedex.sqlite3"),
            window_size: [520.0, 720.0],
            study: StudyConfig::default(),
        }
    }
}

/// Knobs for quiz option generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Wrong answers offered next to the right one, when the deck has enough cards.
    pub distractor_count: usize,
    /// Skip distractors whose text repeats the answer or another distractor.
    pub dedupe_distractors: bool,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            distractor_count: 3,
            dedupe_distractors: false,
        }
    }
}

impl AppConfig {
    /// Loads `CONFIG_FILE` from the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads the given file, or defaults if it does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
