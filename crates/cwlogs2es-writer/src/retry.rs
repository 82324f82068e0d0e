//! Fixed bounded retry for transient Elasticsearch failures

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry budget: how many times to go again after the first failure,
/// and how long to pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    /// Two retries (three attempts total), two seconds apart.
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_secs(2),
        }
    }
}

/// Delay hook, so tests can observe retry pacing without real time.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Runtime sleeper backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Where one attempt leaves the retry loop.
enum Attempt<T, E> {
    Success(T),
    Retry(E),
    Exhausted(E),
}

fn classify<T, E>(result: Result<T, E>, retries_left: u32) -> Attempt<T, E> {
    match result {
        Ok(value) => Attempt::Success(value),
        Err(err) if retries_left > 0 => Attempt::Retry(err),
        Err(err) => Attempt::Exhausted(err),
    }
}

/// Run `op`, retrying failures per `policy`.
///
/// The final attempt's outcome is returned as-is; intermediate failures
/// are logged and slept over. `label` names the operation in those logs.
pub async fn run_with_retry<T, E, F, Fut, S>(
    policy: RetryPolicy,
    sleeper: &S,
    label: &str,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    S: Sleep + ?Sized,
{
    let mut retries_left = policy.retries;
    loop {
        match classify(op().await, retries_left) {
            Attempt::Success(value) => return Ok(value),
            Attempt::Exhausted(err) => return Err(err),
            Attempt::Retry(err) => {
                warn!(error = %err, "retrying {} after {} seconds", label, policy.delay.as_secs());
                retries_left -= 1;
                sleeper.sleep(policy.delay).await;
            }
        }
    }
}
