// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Retry of read-modify-write cycles rejected with 409 Conflict

use crate::constants::retry::{FACTOR, INITIAL_MILLIS, JITTER, STEPS};
use crate::error::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Backoff schedule for conflict retries
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts
    pub steps: u32,
    pub initial: Duration,
    /// Multiplier applied to the delay after each attempt
    pub factor: f64,
    /// Up to this fraction of the delay is added at random
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            steps: STEPS,
            initial: Duration::from_millis(INITIAL_MILLIS),
            factor: FACTOR,
            jitter: JITTER,
        }
    }
}

impl RetryPolicy {
    /// Un-jittered delay before attempt `attempt + 1`
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = self.factor.max(1.0).powi(attempt as i32);
        self.initial.mul_f64(factor)
    }

    fn jittered_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if self.jitter <= 0.0 {
            return base;
        }
        let extra = rand::thread_rng().gen_range(0.0..self.jitter);
        base + base.mul_f64(extra)
    }
}

/// Run `op` until it succeeds, fails with something other than a conflict,
/// or the policy runs out of steps. The last error is returned in the latter cases.
pub async fn retry_on_conflict<F, Fut, T>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let steps = policy.steps.max(1);
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_conflict() && attempt + 1 < steps => {
                let delay = policy.jittered_delay(attempt);
                warn!(
                    "Conflict on attempt {}/{}, retrying in {:?}: {}",
                    attempt + 1,
                    steps,
                    delay,
                    e
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                debug!("Giving up after {} attempt(s)", attempt + 1);
                return Err(e);
            }
        }
    }
}
