//! Post-deploy verification
//!
//! Polls a service URL with a fixed delay between attempts until it answers
//! with a success status or the attempt budget runs out. A cold-starting
//! container takes a roughly known time, so there is no exponential backoff.

use crate::config::VerifyConfig;
use crate::probe::ProbeResult;
use log::debug;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// How many times to probe, how long to wait between probes, and the per-probe timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self {
            attempts: 8,
            delay: Duration::from_secs(4),
            timeout: Duration::from_secs(7),
        }
    }
}

impl From<&VerifyConfig> for VerifyPolicy {
    fn from(config: &VerifyConfig) -> Self {
        Self {
            attempts: config.attempts,
            delay: Duration::from_millis(config.delay_ms),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

impl VerifyPolicy {
    /// Upper bound on wall time: every attempt times out and every gap is slept
    ///
    /// Saturates at `Duration::MAX`.
    pub fn worst_case(&self) -> Duration {
        let gaps = self.attempts.saturating_sub(1);
        self.timeout
            .checked_mul(self.attempts)
            .zip(self.delay.checked_mul(gaps))
            .and_then(|(waiting, sleeping)| waiting.checked_add(sleeping))
            .unwrap_or(Duration::MAX)
    }
}

/// Issue one GET with a timeout; any 2xx counts as success
pub async fn probe_url(client: &Client, url: &str, timeout: Duration) -> ProbeResult {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) => {
            let status = response.status();
            ProbeResult::status(status.is_success(), status.as_u16())
        }
        Err(e) if e.is_timeout() => {
            ProbeResult::error(format!("No response within {} ms.", timeout.as_millis()))
        }
        Err(e) => ProbeResult::error(e.to_string()),
    }
}

/// Run `probe` until it succeeds or `policy.attempts` is exhausted
///
/// Sleeps `policy.delay` between attempts but not after the last one. Returns
/// the last probe result either way.
pub async fn verify_with<F, Fut>(policy: VerifyPolicy, mut probe: F) -> ProbeResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult>,
{
    let mut last = ProbeResult::error("No response yet.");

    for attempt in 1..=policy.attempts {
        last = probe().await;
        debug!(
            "Verification attempt {}/{}: ok={} status={:?}",
            attempt, policy.attempts, last.ok, last.status
        );
        if last.ok {
            break;
        }
        if attempt < policy.attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    last
}

/// Poll `url` over HTTP according to `policy`
pub async fn verify_url(client: &Client, url: &str, policy: VerifyPolicy) -> ProbeResult {
    verify_with(policy, || probe_url(client, url, policy.timeout)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy(attempts: u32) -> VerifyPolicy {
        VerifyPolicy {
            attempts,
            delay: Duration::from_millis(1),
            timeout: Duration::from_millis(50),
        }
    }

    #[test]
    fn test_default_worst_case() {
        assert_eq!(VerifyPolicy::default().worst_case(), Duration::from_secs(84));
    }

    #[test]
    fn test_worst_case_saturates() {
        let policy = VerifyPolicy {
            attempts: 4_000_000_000,
            delay: Duration::from_millis(u64::MAX),
            timeout: Duration::from_millis(u64::MAX),
        };
        assert_eq!(policy.worst_case(), Duration::MAX);

        let policy = VerifyPolicy {
            attempts: 1,
            delay: Duration::MAX,
            timeout: Duration::from_secs(7),
        };
        assert_eq!(policy.worst_case(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let calls = AtomicU32::new(0);
        let result = verify_with(quick_policy(8), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { ProbeResult::status(n == 3, if n == 3 { 200 } else { 502 }) }
        })
        .await;
        assert!(result.ok);
        assert_eq!(result.status, Some(200));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts_and_returns_last() {
        let calls = AtomicU32::new(0);
        let result = verify_with(quick_policy(4), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ProbeResult::status(false, 503) }
        })
        .await;
        assert!(!result.ok);
        assert_eq!(result.status, Some(503));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_attempts_never_probes() {
        let calls = AtomicU32::new(0);
        let result = verify_with(quick_policy(0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ProbeResult::status(true, 200) }
        })
        .await;
        assert!(!result.ok);
        assert_eq!(result.error.as_deref(), Some("No response yet."));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
