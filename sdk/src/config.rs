use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(10_500);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Configuration for the claim API client
#[derive(Debug, Clone)]
pub struct ClaimApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl ClaimApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("jito-distributor-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Pacing of a verification run.
///
/// The API rate-limits per window, so batches run one after another with `batch_delay`
/// between them, while the lookups inside one batch run concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationConfig {
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Total attempts per address, first try included.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl VerificationConfig {
    /// Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    /// Zero is treated as one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}
