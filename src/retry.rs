use std::fmt::Display;
use std::time::Duration;

use crossbeam::channel::{after, select, tick};
use tracing::debug;

/// Interval between attempts when none is configured.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Polling cadence and overall deadline of a [RetryPolicy::retry_until_success] call.
///
/// The interval does not scale with the timeout: a timeout shorter than the interval leaves room
/// for the initial attempt only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    timeout: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
            timeout,
        }
    }

    pub fn with_interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executes `f` right away and then once every interval until it succeeds or the timeout,
    /// measured from the start of this call, elapses.
    /// On timeout the error returned by the latest attempt is returned as is.
    pub fn retry_until_success<F, T, E>(&self, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        let timeout_after = after(self.timeout);
        let retry_after = tick(self.interval);

        let mut attempt: usize = 1;
        let mut last_err = match f() {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };

        loop {
            debug!(%last_err, "attempt {attempt} failed, retrying in {:?}", self.interval);
            // Both channels can be ready at once and `select!` picks randomly, so a tick past the
            // deadline still counts as a timeout.
            let timed_out = select! {
                recv(timeout_after) -> _ => true,
                recv(retry_after) -> _ => timeout_after.try_recv().is_ok(),
            };
            if timed_out {
                debug!("giving up after {attempt} attempts, timeout of {:?} reached", self.timeout);
                return Err(last_err);
            }

            attempt += 1;
            match f() {
                Ok(result) => return Ok(result),
                Err(err) => last_err = err,
            }
        }
    }
}

/// Shorthand for [RetryPolicy::retry_until_success] polling every [DEFAULT_RETRY_INTERVAL].
pub fn retry_for<F, T, E>(timeout: Duration, f: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    RetryPolicy::new(timeout).retry_until_success(f)
}
