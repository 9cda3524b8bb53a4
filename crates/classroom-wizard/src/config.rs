//! Configuration for the Classroom wizards.
//!
//! Settings are read from `classroom.json` in the working directory (or an
//! explicit path). A missing file means defaults; anything present is
//! validated before use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "classroom.json";

/// Default base URL of the backend API.
fn default_api_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

/// Default request timeout in seconds.
const fn default_request_timeout_secs() -> u64 {
    30
}

/// Default environment variable holding the bearer token.
fn default_token_env() -> String {
    "CLASSROOM_API_TOKEN".to_string()
}

/// Default value for boolean options that default to true.
const fn default_true() -> bool {
    true
}

/// Main configuration for the Classroom wizards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the backend REST API, without a trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for each backend request in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Name of the environment variable holding the session token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Whether to prompt for fields the form file leaves empty.
    #[serde(default = "default_true")]
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            token_env: default_token_env(),
            interactive: default_true(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            WizardError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `classroom.json` in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::ConfigParseError` if the file exists but is not
    /// valid JSON, and `WizardError::ConfigValidationError` if a value is
    /// out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(WizardError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| WizardError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(WizardError::config_validation(
                "apiBaseUrl must not be empty",
                "Set apiBaseUrl to your backend's address in classroom.json",
            ));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WizardError::config_validation(
                format!("apiBaseUrl '{url}' is not an http(s) URL"),
                "Use a full URL such as https://classroom.example.com/api in classroom.json",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(WizardError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Set requestTimeoutSecs to at least 1 second in classroom.json",
            ));
        }

        if self.token_env.trim().is_empty() {
            return Err(WizardError::config_validation(
                "tokenEnv must not be empty",
                "Name the environment variable that holds your API token in classroom.json",
            ));
        }

        Ok(())
    }

    /// Base URL with any trailing slash removed.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }
}
