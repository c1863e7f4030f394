//! Platform-agnostic core logic for the push channel sockets.
//!
//! Free of runtime dependencies. The realtime manager owns the actual task
//! loop and calls into this core for reconnection backoff math.

use super::shared::{
    BACKOFF_MULTIPLIER, INITIAL_RETRY_DELAY_MS, MAX_RETRY_ATTEMPTS, MAX_RETRY_DELAY_MS,
};

/// Capped exponential backoff settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
    pub multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: INITIAL_RETRY_DELAY_MS,
            max_delay_ms: MAX_RETRY_DELAY_MS,
            max_attempts: MAX_RETRY_ATTEMPTS,
            multiplier: BACKOFF_MULTIPLIER,
        }
    }
}

/// Exponential backoff state shared by reconnect logic.
#[derive(Debug, Clone, Copy)]
pub struct BackoffState {
    policy: ReconnectPolicy,
    attempts: u32,
    delay_ms: u64,
}

impl Default for BackoffState {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}

impl BackoffState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            delay_ms: policy.initial_delay_ms.min(policy.max_delay_ms),
        }
    }

    /// Called once a socket is open again.
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }

    /// Advance to the next attempt, updating the delay for the subsequent attempt.
    ///
    /// Returns the delay to wait *before* performing this attempt, or `None`
    /// once every attempt has been used.
    pub fn next_delay_and_advance(&mut self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }

        let current_delay = self.delay_ms;
        self.attempts += 1;
        self.delay_ms = ((self.delay_ms as f64) * self.policy.multiplier)
            .min(self.policy.max_delay_ms as f64) as u64;
        Some(current_delay)
    }
}
