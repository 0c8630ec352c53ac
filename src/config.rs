use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::history::MAX_HISTORY_COUNT;

/// Environment variable naming a JSON config file for [`EditorConfig::from_env`].
pub const CONFIG_ENV_VAR: &str = "GRID_EDITOR_CONFIG";

/// Decides which modifier key forms the undo/redo chords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Command (meta) key chords.
    Mac,
    /// Control key chords.
    #[default]
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub default_height: i32,
    pub default_width: i32,
    pub paint_char: char,
    pub max_history: usize,
    pub platform: Platform,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            default_height: 6,
            default_width: 8,
            paint_char: '#',
            max_history: MAX_HISTORY_COUNT,
            platform: Platform::current(),
        }
    }
}

impl EditorConfig {
    /// Reads a JSON config file. Fields missing from the file keep their
    /// default values.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Loads the file named by `GRID_EDITOR_CONFIG`, or the defaults when the
    /// variable is unset or the file cannot be read.
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => match Self::load(&path) {
                Ok(config) => {
                    log::debug!("loaded editor config from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("ignoring config file {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
