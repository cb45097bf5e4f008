//! Bounded-attempts retry.
//!
//! The policy only counts and collects; the operation decides what an
//! attempt is and what it records.

use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

/// How a retried operation ended. Earlier failures are kept in order.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Succeeded { attempt: u32, value: T, failures: Vec<E> },
    Exhausted { last: E, failures: Vec<E> },
}

impl<T, E> RetryOutcome<T, E> {
    /// Number of attempts made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempt, .. } => *attempt,
            Self::Exhausted { failures, .. } => u32::try_from(failures.len() + 1).unwrap_or(u32::MAX),
        }
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1) }
    }

    #[must_use]
    pub fn max_attempts(self) -> u32 {
        self.max_attempts
    }

    /// Run `op` with attempt numbers `1..=max_attempts` until it succeeds.
    pub async fn run<T, E, F, Fut>(self, mut op: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut failures = Vec::new();
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return RetryOutcome::Succeeded { attempt, value, failures },
                Err(err) if attempt >= self.max_attempts => {
                    return RetryOutcome::Exhausted { last: err, failures };
                }
                Err(err) => {
                    failures.push(err);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
