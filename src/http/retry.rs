use std::thread;
use std::time::Duration;

use crate::error::RemoteError;

/// Exponential backoff between attempts of a read-only request.
#[derive(Clone, Debug, PartialEq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay_secs = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped_delay = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped_delay)
    }
}

/// Runs `request` until it succeeds, fails for good, or `max_retries` extra
/// attempts have been spent.
pub(crate) fn with_retries<T, F>(
    description: &str,
    max_retries: u32,
    backoff: &Backoff,
    mut request: F,
) -> Result<T, RemoteError>
where
    F: FnMut() -> Result<T, RemoteError>,
{
    let mut attempt = 0;
    loop {
        match request() {
            Err(e) if e.is_transient() && attempt < max_retries => {
                let delay = backoff.delay(attempt);
                log::warn!(
                    "{} failed ({}), retrying in {}ms",
                    description,
                    e,
                    delay.as_millis()
                );
                thread::sleep(delay);
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use reqwest::StatusCode;

    use super::*;

    fn no_wait() -> Backoff {
        Backoff {
            base_delay: Duration::from_millis(0),
            multiplier: 2.0,
            max_delay: Duration::from_millis(0),
        }
    }

    fn unavailable() -> RemoteError {
        RemoteError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            errors: vec![],
        }
    }

    #[test]
    fn the_delay_doubles_up_to_the_cap() {
        let backoff = Backoff::default();

        assert_eq!(backoff.delay(0), Duration::from_millis(500));
        assert_eq!(backoff.delay(1), Duration::from_secs(1));
        assert_eq!(backoff.delay(2), Duration::from_secs(2));
        assert_eq!(backoff.delay(10), Duration::from_secs(8));
    }

    #[test]
    fn it_retries_transient_failures_until_success() {
        let calls = Cell::new(0);

        let result = with_retries("listing", 3, &no_wait(), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(unavailable())
            } else {
                Ok("done")
            }
        });

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn it_gives_up_after_max_retries() {
        let calls = Cell::new(0);

        let result: Result<(), _> = with_retries("listing", 2, &no_wait(), || {
            calls.set(calls.get() + 1);
            Err(unavailable())
        });

        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn permanent_failures_are_not_retried() {
        let calls = Cell::new(0);

        let result: Result<(), _> = with_retries("listing", 3, &no_wait(), || {
            calls.set(calls.get() + 1);
            Err(RemoteError::Api {
                status: StatusCode::FORBIDDEN,
                errors: vec![],
            })
        });

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
