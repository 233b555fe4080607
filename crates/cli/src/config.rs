//! Layered settings for the `discogs-pick` binary.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file,
//! environment variables, command-line flags. Environment variables and
//! flags arrive together through clap, so this module only merges
//! `Overrides` over a `FileConfig`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use discogs_client::{ClientConfig, RetryPolicy, Token, DEFAULT_BASE_URL};
use history::HistoryStore;
use serde::Deserialize;
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "discogs-picker.json";

const USERNAME_PLACEHOLDER: &str = "your_discogs_username";
const TOKEN_PLACEHOLDER: &str = "your_discogs_api_token";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Required setting absent from every layer
    #[error("Missing Discogs {field}; set it with --{field} or {env}")]
    Missing {
        field: &'static str,
        env: &'static str,
    },

    /// The template value from the sample config was left in place
    #[error("Discogs {field} is still the placeholder '{value}'")]
    Placeholder {
        field: &'static str,
        value: &'static str,
    },

    #[error("Invalid Discogs username '{0}' (letters, digits, '.', '_' and '-' only)")]
    InvalidUsername(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Contents of the optional JSON config file; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub username: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub folder_id: Option<u64>,
    pub history_file: Option<PathBuf>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read `path`; a missing file is only an error when it was asked for
    /// explicitly
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values taken from flags or the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub username: Option<String>,
    pub token: Option<String>,
    pub history_file: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub username: Option<String>,
    pub token: Option<String>,
    pub base_url: String,
    pub folder_id: u64,
    pub history_file: PathBuf,
    pub retry: RetryPolicy,
    pub max_attempts: u32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

/// Validated identity for API calls
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub token: Token,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            folder_id: 0,
            history_file: PathBuf::from(HistoryStore::DEFAULT_FILE),
            retry: RetryPolicy::default(),
            max_attempts: sampler::DEFAULT_MAX_ATTEMPTS,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let defaults = Self::default();
        Self {
            username: overrides.username.or(file.username),
            token: overrides.token.or(file.token),
            base_url: file.base_url.unwrap_or(defaults.base_url),
            folder_id: file.folder_id.unwrap_or(defaults.folder_id),
            history_file: overrides
                .history_file
                .or(file.history_file)
                .unwrap_or(defaults.history_file),
            retry: RetryPolicy::new(
                file.max_retries.unwrap_or(defaults.retry.max_retries),
                file.retry_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.retry.delay),
            ),
            max_attempts: file.max_attempts.unwrap_or(defaults.max_attempts),
            connect_timeout: file
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            read_timeout: file
                .read_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.read_timeout),
        }
    }

    /// Check username and token before anything talks to the API
    pub fn credentials(&self) -> Result<Credentials> {
        let username = required(&self.username, "username", "DISCOGS_USERNAME")?;
        if username == USERNAME_PLACEHOLDER {
            return Err(ConfigError::Placeholder {
                field: "username",
                value: USERNAME_PLACEHOLDER,
            });
        }
        if !is_valid_username(username) {
            return Err(ConfigError::InvalidUsername(username.to_string()));
        }

        let token = required(&self.token, "token", "DISCOGS_TOKEN")?;
        if token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::Placeholder {
                field: "token",
                value: TOKEN_PLACEHOLDER,
            });
        }

        Ok(Credentials {
            username: username.to_string(),
            token: Token::new(token),
        })
    }

    pub fn client_config(&self, credentials: &Credentials) -> ClientConfig {
        ClientConfig::new(credentials.username.clone())
            .with_base_url(self.base_url.clone())
            .with_folder(self.folder_id)
            .with_retry(self.retry)
            .with_timeouts(self.connect_timeout, self.read_timeout)
    }
}

/// Usernames end up as a URL path segment, so only unreserved characters
/// are accepted
fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing { field, env })
}
