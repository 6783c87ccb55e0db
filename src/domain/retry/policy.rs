//! Retry policy - attempt budget and chained wait schedule

use std::time::Duration;

use crate::domain::DispatchError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Waits before attempt 2, attempt 3 and every attempt after that
pub const DEFAULT_WAIT_SCHEDULE: [Duration; 3] = [
    Duration::from_secs(3),
    Duration::from_secs(5),
    Duration::from_secs(6),
];

/// Attempt budget plus the waits between attempts
///
/// The schedule may be shorter than the attempt budget; the last wait is
/// then reused for every remaining attempt. An empty schedule retries
/// immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait_schedule: Vec<Duration>,
    retry_permanent_failures: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            wait_schedule: DEFAULT_WAIT_SCHEDULE.to_vec(),
            retry_permanent_failures: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, wait_schedule: Vec<Duration>) -> Result<Self, DispatchError> {
        if max_attempts == 0 {
            return Err(DispatchError::configuration(
                "Retry policy needs at least one attempt",
            ));
        }

        Ok(Self {
            max_attempts,
            wait_schedule,
            retry_permanent_failures: true,
        })
    }

    /// Policy that never waits between attempts
    pub fn immediate(max_attempts: u32) -> Result<Self, DispatchError> {
        Self::new(max_attempts, Vec::new())
    }

    /// When disabled, a permanent failure ends the retry loop early
    pub fn with_retry_permanent_failures(mut self, retry: bool) -> Self {
        self.retry_permanent_failures = retry;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn wait_schedule(&self) -> &[Duration] {
        &self.wait_schedule
    }

    pub fn retry_permanent_failures(&self) -> bool {
        self.retry_permanent_failures
    }

    /// Wait before the given 1-indexed attempt
    pub fn wait_before_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }

        let index = (attempt - 2) as usize;

        self.wait_schedule
            .get(index)
            .or_else(|| self.wait_schedule.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}
