//! Client configuration.

use std::fmt;
use std::time::Duration;

/// Production endpoint of the partner API.
pub const BASE_URL: &str = "https://api.uds.app/partner/v2";

pub const DEFAULT_RETRIES: u32 = 10;
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ru-RU, ru";

/// Fixed retry policy applied by the transport to failed round-trips.
///
/// Every request is retried the same way, including `POST /operations`.
/// That is only safe because `create_operation` always sends a nonce the
/// server deduplicates on; other non-idempotent calls (refund, reward,
/// complete) may be applied twice if a response is lost after the server
/// committed. Use `RetryPolicy::none()` when that matters more than
/// availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Pause between attempts. No backoff, no jitter.
    pub wait: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, wait: Duration) -> Self {
        Self { retries, wait }
    }

    pub fn none() -> Self {
        Self {
            retries: 0,
            wait: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES, DEFAULT_RETRY_WAIT)
    }
}

/// Settings fixed at client construction.
#[derive(Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Company id, the basic-auth user name.
    pub company_id: String,
    /// API key, the basic-auth password.
    pub api_key: String,
    pub retry: RetryPolicy,
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    pub accept_language: String,
}

impl ClientConfig {
    pub fn new(company_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            company_id: company_id.into(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }

    /// Point the client at another API root (a sandbox or a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = language.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("accept_language", &self.accept_language)
            .finish()
    }
}
