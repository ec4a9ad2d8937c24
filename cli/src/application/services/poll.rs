//! Bounded polling shared by both lifecycle loops.
//!
//! Uses `tokio::time` so tests can run the loops on a paused clock.

use std::time::Duration;

use tokio::time::Instant;

use crate::domain::{BoxId, JiffyError, PollPolicy};

/// Tracks the deadline and poll budget of one loop.
#[derive(Debug)]
pub struct Poller {
    id: BoxId,
    policy: PollPolicy,
    started: Instant,
    polls: u32,
}

impl Poller {
    /// Start the clock for a loop on box `id`.
    #[must_use]
    pub fn new(id: BoxId, policy: PollPolicy) -> Self {
        Self {
            id,
            policy,
            started: Instant::now(),
            polls: 0,
        }
    }

    /// Account for one status read.
    ///
    /// # Errors
    ///
    /// Returns `JiffyError::Timeout` once the deadline has passed or the poll
    /// budget is used up.
    pub fn begin_poll(&mut self) -> Result<(), JiffyError> {
        let over_budget = self.policy.max_polls.is_some_and(|max| self.polls >= max);
        if over_budget || self.started.elapsed() >= self.policy.timeout {
            return Err(self.timeout());
        }
        self.polls += 1;
        Ok(())
    }

    /// Sleep for `delay`, cut short at the deadline.
    pub async fn wait(&self, delay: Duration) {
        let remaining = self.policy.timeout.saturating_sub(self.started.elapsed());
        tokio::time::sleep(delay.min(remaining)).await;
    }

    /// Number of status reads so far.
    #[must_use]
    pub fn polls(&self) -> u32 {
        self.polls
    }

    fn timeout(&self) -> JiffyError {
        tracing::debug!(id = %self.id, polls = self.polls, "polling budget exhausted");
        JiffyError::Timeout {
            id: self.id,
            polls: self.polls,
            elapsed: self.started.elapsed(),
        }
    }
}
