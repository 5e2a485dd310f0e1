//! Error types surfaced by the throttler.

use std::error::Error;
use std::fmt;

/// Errors produced by throttler construction and by [`queue`](crate::Throttler::queue)
///
/// Construction errors are surfaced synchronously and are never retried.
/// Transport-level failures are carried through verbatim in
/// [`Transport`](ThrottleError::Transport); the throttler never interprets
/// them.
#[derive(Debug)]
pub enum ThrottleError {
    /// The call budget passed to a [`Rate`](crate::Rate) constructor was zero or negative
    InvalidMaxCalls,
    /// The request queue capacity passed to [`Throttler::new`](crate::Throttler::new) was zero
    InvalidQueueCapacity,
    /// [`queue`](crate::Throttler::queue) was called before [`start`](crate::Throttler::start)
    NotStarted,
    /// The per-request timeout elapsed before a response was delivered
    DeadlineExceeded,
    /// The caller's cancellation token fired before a response was delivered
    Cancelled,
    /// The request queue has been closed and no dispatcher is draining it
    QueueClosed,
    /// The downstream transport failed; the inner error is passed through untouched
    Transport(anyhow::Error),
}

impl fmt::Display for ThrottleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThrottleError::InvalidMaxCalls => write!(f, "maxCalls must be greater than zero"),
            ThrottleError::InvalidQueueCapacity => {
                write!(f, "reqChanCapacity must be greater than zero")
            }
            ThrottleError::NotStarted => write!(f, "requestHandler has not been started"),
            ThrottleError::DeadlineExceeded => {
                write!(f, "deadline exceeded before a response was delivered")
            }
            ThrottleError::Cancelled => {
                write!(f, "request cancelled before a response was delivered")
            }
            ThrottleError::QueueClosed => write!(f, "request queue is closed"),
            ThrottleError::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ThrottleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ThrottleError::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
