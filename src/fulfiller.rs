//! Cancellation-aware fulfillment of an admitted request.

use std::sync::Arc;

use async_trait::async_trait;

use crate::sender::Sender;
use crate::types::QueuedRequest;

/// Capability to process one admitted request to its terminal event
#[async_trait]
pub trait Fulfiller: Send + Sync {
    async fn fulfill(&self, item: QueuedRequest);
}

/// Sends the request downstream and delivers the outcome, checking the
/// item's cancellation signal on both sides of the blocking call
///
/// The send itself is not interruptible mid-flight; cancellation is only
/// observed at the two checkpoints. A call that was already in flight when
/// the caller gave up still runs to completion, but its outcome is dropped
/// instead of being written to a reply slot nobody reads.
pub(crate) struct SendFulfiller {
    sender: Arc<dyn Sender>,
}

impl SendFulfiller {
    pub(crate) fn new(sender: Arc<dyn Sender>) -> Self {
        SendFulfiller { sender }
    }
}

#[async_trait]
impl Fulfiller for SendFulfiller {
    async fn fulfill(&self, item: QueuedRequest) {
        let QueuedRequest {
            cancel,
            name,
            request,
            reply,
            ..
        } = item;

        // caller gave up while the item sat in the queue
        if cancel.is_cancelled() {
            tracing::debug!(%name, "request cancelled before send, dropping");
            return;
        }

        let outcome = self.sender.send(request).await;

        // caller gave up while the send was in flight
        if cancel.is_cancelled() {
            tracing::debug!(%name, "request cancelled during send, dropping outcome");
            return;
        }

        // A failed send means the receiver is already gone; nothing to do.
        let _ = reply.send(outcome);
    }
}
