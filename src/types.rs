use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// What the downstream call produced: the response, or the transport error
/// passed through verbatim. Always fully populated by the sender before it
/// crosses a channel.
pub type Outcome = Result<reqwest::Response, anyhow::Error>;

/// A request waiting in the bounded queue for admission
///
/// Built by [`Throttler::queue`](crate::Throttler::queue), owned by the queue
/// until the dispatcher receives it, then moved into the fulfiller task that
/// processes it. Exactly one terminal event occurs per item: an [`Outcome`]
/// is delivered on `reply`, or `cancel` fires first and the reply sender is
/// dropped without a send. Items are never retried or requeued.
pub struct QueuedRequest {
    /// Child cancellation scope for this submission; fires when the caller's
    /// token is cancelled, the timeout elapses, or the caller goes away
    pub cancel: CancellationToken,
    /// Display name used in verbose dispatch logs
    pub name: String,
    /// The outbound request to hand to the transport
    pub request: reqwest::Request,
    /// Single-use reply slot read by the waiting `queue()` call
    pub reply: oneshot::Sender<Outcome>,
    /// The caller's per-request timeout; enforced by the waiting `queue()`
    /// call, not by the fulfiller
    pub timeout: Duration,
}
