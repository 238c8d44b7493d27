use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::db::connection;
use crate::error::TaskpilotError;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Collaborator credentials and knobs. The API key is required before any
/// command processing starts; everything else has defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load from `GEMINI_API_KEY` and `.taskpilot/config.json`. The env var
    /// wins for the key; file values fill the rest.
    pub fn load() -> Result<Self, TaskpilotError> {
        let file = match connection::config_path() {
            Ok(path) => read_file_config(&path)?,
            Err(_) => FileConfig::default(),
        };

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or(file.api_key)
            .ok_or_else(TaskpilotError::missing_api_key)?;

        Ok(Self {
            api_key,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, TaskpilotError> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let content =
        fs::read_to_string(path).map_err(|e| TaskpilotError::database(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| {
        TaskpilotError::database(format!("invalid config at {}: {e}", path.display()))
    })
}
