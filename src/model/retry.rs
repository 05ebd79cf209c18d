//! Retry policy for model candidates
//!
//! Each candidate gets `max_attempts` attempts. After failed attempt `j`
//! (0-based) the invoker waits `base_delay * 2^j` before retrying the same
//! candidate; after the last attempt it moves to the next candidate without
//! waiting. A non-transient failure abandons the candidate straight away.

use async_trait::async_trait;
use std::time::Duration;

/// Where the invoker is in the candidate/attempt grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptPosition {
    /// Index into the candidate list
    pub candidate: usize,
    /// 0-based attempt index for this candidate
    pub attempt: u32,
}

impl AttemptPosition {
    pub fn next_attempt(self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self
        }
    }

    pub fn next_candidate(self) -> Self {
        Self {
            candidate: self.candidate + 1,
            attempt: 0,
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Wait, then try the same candidate again
    Retry { delay: Duration },
    /// Abandon this candidate
    NextCandidate,
    /// Nothing left to try
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made per candidate.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after failed attempt `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    /// Decide the next step after the attempt at `position` failed
    pub fn after_failure(&self, position: AttemptPosition, candidate_count: usize) -> NextAction {
        if position.attempt + 1 < self.max_attempts {
            NextAction::Retry {
                delay: self.backoff(position.attempt),
            }
        } else {
            self.skip_candidate(position, candidate_count)
        }
    }

    /// Next step when the candidate at `position` is not worth retrying
    pub fn skip_candidate(&self, position: AttemptPosition, candidate_count: usize) -> NextAction {
        if position.candidate + 1 < candidate_count {
            NextAction::NextCandidate
        } else {
            NextAction::Exhausted
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Backoff sleeping, injectable so tests don't wait
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
