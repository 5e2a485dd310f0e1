//! # Throttler
//!
//! A leaky bucket throttler that paces queued outbound HTTP requests so a
//! downstream provider's rate limit is never exceeded.
//!
//! Callers queue requests concurrently; a dispatcher admits one request per
//! fixed interval, in arrival order, and hands each admitted request to its
//! own fulfillment task. Every accepted request sees exactly one terminal
//! event: its response is delivered back to the waiting caller, or the
//! caller's timeout/cancellation fires first and the late response is
//! silently discarded.
//!
//! ## Architecture
//!
//! ```text
//! caller ──queue()──► bounded queue ──► Dispatcher (paced ticker)
//!                                            │ one task per admission
//!                                            ▼
//!                                       Fulfiller ──► Sender ──► Transport
//!                                            │
//!                         response ◄── reply slot (at most one write)
//! ```
//!
//! The bounded queue is the only shared mutable state and the only
//! backpressure mechanism: `queue()` blocks while it is full. Rate, pacing
//! interval and queue capacity are fixed at construction.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use throttler::{Rate, Throttler};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! // at most 2 calls per second, with 50ms of margin between calls
//! let rate = Rate::by_calls_per_second(2, Duration::from_millis(50))?;
//! let mut throttler = Throttler::new(rate, 10, false, None)?;
//! throttler.start();
//!
//! let request = reqwest::Client::new().get("https://example.com/").build()?;
//! let ctx = CancellationToken::new();
//! let response = throttler
//!     .queue(&ctx, "example", request, Duration::from_secs(10))
//!     .await?;
//! println!("status: {}", response.status());
//! # Ok(())
//! # }
//! ```

mod dispatcher;
mod error;
mod fulfiller;
mod rate;
mod sender;
mod throttler;
mod transport;
mod types;

#[cfg(test)]
mod throttler_tests;

pub use error::ThrottleError;
pub use fulfiller::Fulfiller;
pub use rate::Rate;
pub use sender::Sender;
pub use throttler::Throttler;
pub use transport::Transport;
pub use types::{Outcome, QueuedRequest};
