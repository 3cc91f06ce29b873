//! Active HTTP health probing of the backend.
//!
//! Intentionally policy-light: a single check answers "did the endpoint
//! return 2xx", and `poll_health` retries it a bounded number of times.

use std::time::Duration;

use async_trait::async_trait;
use bracket_core::{ReadinessAttempt, ReadinessConfig};
use reqwest::Client;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use url::Url;

/// A failed health check.
#[derive(Debug, Error)]
pub enum HealthCheckError {
    /// Connection refused, reset, or any other transport failure.
    #[error("Health request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered, but not with a success status.
    #[error("Health endpoint returned status {0}")]
    Status(u16),

    /// No answer within the per-request timeout.
    #[error("Health check timed out after {0:?}")]
    Timeout(Duration),
}

/// One-shot backend health check.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<(), HealthCheckError>;
}

/// `GET <url>`; any 2xx response counts as healthy.
#[derive(Debug, Clone)]
pub struct HttpHealthCheck {
    client: Client,
    url: Url,
}

impl HttpHealthCheck {
    pub fn new(url: Url, request_timeout: Duration) -> Result<Self, HealthCheckError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, url })
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HealthCheck for HttpHealthCheck {
    async fn check(&self) -> Result<(), HealthCheckError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HealthCheckError::Status(status.as_u16()))
        }
    }
}

/// Result of a bounded polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthPollOutcome {
    Healthy { attempts: u32 },
    Exhausted { attempts: u32 },
}

/// Poll `check` until it succeeds or `max_attempts` are used up.
///
/// The first attempt runs immediately; failed attempts are followed by
/// `interval` unless they were the last one. Exhaustion is not an error:
/// the caller proceeds without confirmed health.
pub async fn poll_health(check: &dyn HealthCheck, config: &ReadinessConfig) -> HealthPollOutcome {
    let mut attempt = ReadinessAttempt::new(config.max_attempts);

    loop {
        let n = attempt.record();
        let result = match timeout(config.request_timeout, check.check()).await {
            Ok(result) => result,
            Err(_) => Err(HealthCheckError::Timeout(config.request_timeout)),
        };

        match result {
            Ok(()) => {
                info!(attempt = n, "Backend is ready and responding");
                return HealthPollOutcome::Healthy { attempts: n };
            }
            Err(e) => {
                debug!(attempt = n, max_attempts = attempt.max_attempts(), error = %e, "Health check failed, backend not ready yet");
            }
        }

        if attempt.is_exhausted() {
            warn!(attempts = n, "Backend health check failed, proceeding anyway");
            return HealthPollOutcome::Exhausted { attempts: n };
        }

        sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    /// Fails until `succeed_on` attempts have been made (0 = never).
    struct ScriptedCheck {
        calls: AtomicU32,
        succeed_on: u32,
    }

    impl ScriptedCheck {
        const fn new(succeed_on: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                succeed_on,
            }
        }
    }

    #[async_trait]
    impl HealthCheck for ScriptedCheck {
        async fn check(&self) -> Result<(), HealthCheckError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.succeed_on != 0 && call >= self.succeed_on {
                Ok(())
            } else {
                Err(HealthCheckError::Status(503))
            }
        }
    }

    /// Never answers; only the per-request timeout ends it.
    struct HangingCheck;

    #[async_trait]
    impl HealthCheck for HangingCheck {
        async fn check(&self) -> Result<(), HealthCheckError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_is_fail_open_after_fifteen_attempts() {
        let check = ScriptedCheck::new(0);
        let start = Instant::now();

        let outcome = poll_health(&check, &ReadinessConfig::default()).await;

        assert_eq!(outcome, HealthPollOutcome::Exhausted { attempts: 15 });
        assert_eq!(check.calls.load(Ordering::SeqCst), 15);
        // 15 attempts, 14 one-second gaps
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(14), "{elapsed:?}");
        assert!(elapsed <= Duration::from_secs(15), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn success_stops_polling() {
        let check = ScriptedCheck::new(3);
        let start = Instant::now();

        let outcome = poll_health(&check, &ReadinessConfig::default()).await;

        assert_eq!(outcome, HealthPollOutcome::Healthy { attempts: 3 });
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_request_times_out_per_attempt() {
        let config = ReadinessConfig {
            max_attempts: 2,
            ..ReadinessConfig::default()
        };
        let start = Instant::now();

        let outcome = poll_health(&HangingCheck, &config).await;

        assert_eq!(outcome, HealthPollOutcome::Exhausted { attempts: 2 });
        // 2s timeout + 1s interval + 2s timeout
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn http_check_fails_on_closed_port() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}/docs")).unwrap();
        let check = HttpHealthCheck::new(url, Duration::from_millis(500)).unwrap();
        assert!(matches!(
            check.check().await,
            Err(HealthCheckError::Request(_))
        ));
    }
}
