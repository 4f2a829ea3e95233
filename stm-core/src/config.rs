use std::thread;
use std::time::Duration;

use rand::Rng;

/// Tuning knobs for an [`crate::Stm`]'s retry loop.
///
/// Neither field is present in the literal source material this protocol is
/// distilled from, which retries forever with no pause between attempts.
/// Both are opt-in: [`StmConfig::default`] reproduces that behavior exactly
/// (`max_retries: None`, `backoff: BackoffPolicy::None`).
#[derive(Debug, Clone)]
pub struct StmConfig {
    /// Maximum number of action invocations a single transaction will make
    /// before giving up with `StmError::RetriesExhausted`. `None` retries
    /// forever, matching the source protocol.
    pub max_retries: Option<u32>,
    /// Delay policy applied between a failed attempt and the next one.
    pub backoff: BackoffPolicy,
}

impl Default for StmConfig {
    fn default() -> Self {
        StmConfig {
            max_retries: None,
            backoff: BackoffPolicy::None,
        }
    }
}

/// How long a transaction's retry loop waits before re-running its action
/// after a logical abort or a failed commit validation.
#[derive(Debug, Clone)]
pub enum BackoffPolicy {
    /// Retry immediately, with no pause. Matches the source protocol.
    None,
    /// Sleep for `base * 2^(attempt - 1)`, capped at `max`, plus up to 50%
    /// random jitter, to spread out retries from contending transactions
    /// instead of having them collide on the next attempt too.
    ExponentialJitter { base: Duration, max: Duration },
}

impl BackoffPolicy {
    pub(crate) fn wait(&self, attempt: u32) {
        match self {
            BackoffPolicy::None => {}
            BackoffPolicy::ExponentialJitter { base, max } => {
                let scale = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
                let unjittered = base.saturating_mul(scale).min(*max);
                let jitter_fraction = rand::thread_rng().gen_range(0.0..0.5);
                let jittered = unjittered.mul_f64(1.0 + jitter_fraction).min(*max);
                thread::sleep(jittered);
            }
        }
    }
}
