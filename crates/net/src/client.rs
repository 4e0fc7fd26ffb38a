//! HTTP client with connection pooling and retry logic

use pga_config::NetworkConfig;
use pga_errors::{Error, NetworkError};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub retry_count: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // the catalog is large
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
            user_agent: format!("pga/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetConfig {
    /// Build from the `[network]` section of the configuration.
    ///
    /// The idle pool is sized to the concurrency budget so every in-flight
    /// digest lookup can keep its connection alive.
    #[must_use]
    pub fn from_config(network: &NetworkConfig, jobs: usize) -> Self {
        Self {
            timeout: Duration::from_secs(network.timeout),
            connect_timeout: Duration::from_secs(network.connect_timeout),
            retry_count: network.retries,
            retry_delay: Duration::from_secs(network.retry_delay),
            pool_max_idle_per_host: jobs.max(1),
            ..Self::default()
        }
    }
}

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl std::fmt::Debug for NetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Execute a GET request with retries
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retry attempts, including
    /// network timeouts, connection failures, or rate limiting.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.retry_request(|| self.client.get(url).send()).await
    }

    /// Execute a HEAD request with retries
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retry attempts, including
    /// network timeouts, connection failures, or rate limiting.
    pub async fn head(&self, url: &str) -> Result<Response, Error> {
        self.retry_request(|| self.client.head(url).send()).await
    }

    /// Execute a GET request and reject non-success statuses
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the final status is not 2xx.
    pub async fn get_ok(&self, url: &str) -> Result<Response, Error> {
        let response = self.get(url).await?;
        ensure_success(response)
    }

    /// Execute a GET request and decode the body as text
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx, or the
    /// body cannot be decoded.
    pub async fn get_text(&self, url: &str) -> Result<String, Error> {
        self.get_ok(url)
            .await?
            .text()
            .await
            .map_err(|e| NetworkError::RequestFailed(e.to_string()).into())
    }

    /// Execute a request with retries
    async fn retry_request<F, Fut>(&self, mut f: F) -> Result<Response, Error>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut last_error: Option<reqwest::Error> = None;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                tokio::time::sleep(self.backoff(attempt)).await;
            }

            match f().await {
                Ok(response) => {
                    // Check for rate limiting
                    if response.status() == StatusCode::TOO_MANY_REQUESTS {
                        if let Some(retry_after) = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                        {
                            return Err(NetworkError::RateLimited {
                                seconds: retry_after,
                            }
                            .into());
                        }
                    }

                    if response.status().is_server_error() && attempt < self.config.retry_count
                    {
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    let retry = Self::should_retry(&e);
                    last_error = Some(e);

                    // Don't retry on certain errors
                    if !retry {
                        break;
                    }
                }
            }
        }

        // Convert the last error
        match last_error {
            Some(e) if e.is_timeout() => Err(NetworkError::Timeout {
                url: e
                    .url()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default(),
            }
            .into()),
            Some(e) if e.is_connect() => Err(NetworkError::ConnectionRefused(e.to_string()).into()),
            Some(e) => Err(NetworkError::RequestFailed(e.to_string()).into()),
            None => Err(NetworkError::RequestFailed("Unknown error".to_string()).into()),
        }
    }

    /// Linear backoff before retry number `attempt`, saturating at `Duration::MAX`
    fn backoff(&self, attempt: u32) -> Duration {
        self.config.retry_delay.saturating_mul(attempt)
    }

    /// Determine if an error should be retried
    fn should_retry(error: &reqwest::Error) -> bool {
        // Retry on timeout, connection errors, and server errors
        error.is_timeout()
            || error.is_connect()
            || error.status().is_some_and(|s| s.is_server_error())
    }
}

/// Turn a non-2xx response into a `NetworkError::HttpError`
pub(crate) fn ensure_success(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(NetworkError::HttpError {
        status: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_linearly() {
        let client = NetClient::new(NetConfig {
            retry_delay: Duration::from_millis(250),
            ..NetConfig::default()
        })
        .unwrap();
        assert_eq!(client.backoff(1), Duration::from_millis(250));
        assert_eq!(client.backoff(3), Duration::from_millis(750));
    }

    #[test]
    fn test_backoff_saturates_on_huge_delay() {
        let client = NetClient::new(NetConfig {
            retry_delay: Duration::from_secs(u64::MAX),
            ..NetConfig::default()
        })
        .unwrap();
        assert_eq!(client.backoff(2), Duration::MAX);
    }
}
