//! Authenticated, rate-limit-aware access to a user's Discogs collection.

use std::fmt;
use std::thread;
use std::time::Duration;

use catalog::{parser, CollectionPage, CollectionSource, PickerError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::transport::{HttpTransport, UreqTransport};

/// Public Discogs API root
pub const DEFAULT_BASE_URL: &str = "https://api.discogs.com";

/// Sent with every request; Discogs rejects requests without a User-Agent
pub const USER_AGENT: &str = concat!("DiscogsRandomPicker/", env!("CARGO_PKG_VERSION"));

/// How often a throttled or failed request is repeated, and how long to wait
/// in between. The delay is the same before every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first request; `3` means at most 4 requests
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_DELAY)
    }
}

/// Personal access token from <https://www.discogs.com/settings/developers>
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn authorization_header(&self) -> String {
        format!("Discogs token={}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Where the collection lives and how patient to be with the API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    /// Collection folder; 0 is the implicit "All" folder
    pub folder_id: u64,
    pub retry: RetryPolicy,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl ClientConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: username.into(),
            folder_id: 0,
            retry: RetryPolicy::default(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_folder(mut self, folder_id: u64) -> Self {
        self.folder_id = folder_id;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }
}

/// Error payload Discogs sends along with 4xx/5xx statuses
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for one user's collection folder.
///
/// Holds no mutable state: every call builds its request from the
/// configuration and the token given at construction.
pub struct DiscogsClient<T = UreqTransport> {
    transport: T,
    config: ClientConfig,
    authorization: String,
}

impl DiscogsClient<UreqTransport> {
    /// Create a client that talks to the API over `ureq`
    pub fn new(config: ClientConfig, token: &Token) -> Self {
        let transport = UreqTransport::new(config.connect_timeout, config.read_timeout);
        Self::with_transport(transport, config, token)
    }
}

impl<T: HttpTransport> DiscogsClient<T> {
    /// Create a client on top of an arbitrary transport
    pub fn with_transport(transport: T, config: ClientConfig, token: &Token) -> Self {
        Self {
            transport,
            config,
            authorization: token.authorization_header(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn releases_url(&self, page: u64, per_page: u32) -> String {
        format!(
            "{}/users/{}/collection/folders/{}/releases?page={}&per_page={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.username,
            self.config.folder_id,
            page,
            per_page
        )
    }

    /// GET `url` and return the body of a 200 response.
    ///
    /// 429 and transport failures are retried up to `max_retries` times with
    /// a flat delay; 401, 404 and any other status fail on the spot.
    fn get(&self, url: &str) -> Result<String> {
        let headers = [
            ("Authorization", self.authorization.as_str()),
            ("User-Agent", USER_AGENT),
            ("Accept", "application/json"),
        ];
        let policy = self.config.retry;
        let mut retries = 0;

        loop {
            debug!("GET {} (attempt {})", url, retries + 1);

            match self.transport.get(url, &headers) {
                Ok(response) => match response.status {
                    200 => return Ok(response.body),
                    429 if retries < policy.max_retries => {
                        retries += 1;
                        warn!(
                            "Rate limited, retrying in {:?} (retry {}/{})",
                            policy.delay, retries, policy.max_retries
                        );
                        thread::sleep(policy.delay);
                    }
                    429 => {
                        return Err(PickerError::RateLimited {
                            status: 429,
                            retries,
                        });
                    }
                    401 => return Err(PickerError::Unauthorized),
                    404 => return Err(PickerError::NotFound),
                    status => {
                        return Err(PickerError::ApiError {
                            status: Some(status),
                            message: error_message(status, &response.body),
                        });
                    }
                },
                Err(err) if retries < policy.max_retries => {
                    retries += 1;
                    warn!(
                        "{}, retrying in {:?} (retry {}/{})",
                        err, policy.delay, retries, policy.max_retries
                    );
                    thread::sleep(policy.delay);
                }
                Err(err) => {
                    return Err(PickerError::NetworkError {
                        attempts: retries + 1,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}

impl<T: HttpTransport> CollectionSource for DiscogsClient<T> {
    fn fetch_page(&self, page: u64, per_page: u32) -> Result<CollectionPage> {
        let url = self.releases_url(page, per_page);
        let body = self.get(&url)?;
        let page = parser::parse_page(&body)?;
        debug!(
            "Fetched {} item(s), collection reports {} total",
            page.items.len(),
            page.total_items
        );
        Ok(page)
    }
}

/// Prefer the `message` Discogs puts into error bodies, fall back to the
/// status code
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| format!("HTTP {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_releases_url() {
        let config = ClientConfig::new("digger")
            .with_base_url("https://api.example.test/")
            .with_folder(3);
        let client = DiscogsClient::new(config, &Token::new("secret"));

        assert_eq!(
            client.releases_url(7, 1),
            "https://api.example.test/users/digger/collection/folders/3/releases?page=7&per_page=1"
        );
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token::new("very-secret");
        assert_eq!(format!("{:?}", token), "Token(***)");
        assert_eq!(token.authorization_header(), "Discogs token=very-secret");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(500, r#"{"message": "Internal server error"}"#),
            "Internal server error"
        );
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "HTTP 502");
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }
}
