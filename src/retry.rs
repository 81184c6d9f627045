//! Bounded retry with fixed backoff.
//!
//! The uplink (and anything else that talks to a possibly degraded network)
//! shares this combinator instead of hand-rolling sleep-in-a-loop retry
//! logic. The sleeper is injected so tests can count backoffs without
//! blocking.

use std::time::Duration;

/// A fixed retry budget with a constant pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Total attempts, including the first. Clamped to at least 1.
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Backoff {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Run `op` up to `policy.attempts` times, sleeping `policy.delay` between
/// attempts. The first `Ok` short-circuits; the last `Err` is returned after
/// the budget is exhausted. `op` receives the 1-based attempt number.
pub fn run<T, E>(
    policy: Backoff,
    mut sleep: impl FnMut(Duration),
    mut op: impl FnMut(u32) -> Result<T, E>,
) -> Result<T, E> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= attempts {
                    return Err(e);
                }
                sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_sleep(_: Duration) {}

    #[test]
    fn first_success_short_circuits() {
        let mut calls = 0;
        let result: Result<u32, ()> = run(Backoff::new(3, Duration::ZERO), no_sleep, |_| {
            calls += 1;
            Ok(7)
        });
        assert_eq!(result, Ok(7));
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let result: Result<u32, &str> = run(Backoff::new(3, Duration::ZERO), no_sleep, |attempt| {
            calls += 1;
            if attempt < 3 { Err("nope") } else { Ok(attempt) }
        });
        assert_eq!(result, Ok(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn exhausted_budget_returns_last_error() {
        let mut calls = 0;
        let result: Result<(), u32> = run(Backoff::new(3, Duration::ZERO), no_sleep, |attempt| {
            calls += 1;
            Err(attempt)
        });
        assert_eq!(result, Err(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn sleeps_between_attempts_but_not_after_last() {
        let mut sleeps = 0;
        let result: Result<(), ()> = run(
            Backoff::new(3, Duration::from_millis(1)),
            |_| sleeps += 1,
            |_| Err(()),
        );
        assert!(result.is_err());
        assert_eq!(sleeps, 2);
    }

    #[test]
    fn zero_attempts_clamps_to_one() {
        let mut calls = 0;
        let result: Result<(), ()> = run(Backoff::new(0, Duration::ZERO), no_sleep, |_| {
            calls += 1;
            Err(())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
