//! The public entry point: queueing requests behind the rate gate.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Request, Response};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::Dispatcher;
use crate::error::ThrottleError;
use crate::fulfiller::SendFulfiller;
use crate::rate::Rate;
use crate::sender::HttpSender;
use crate::transport::Transport;
use crate::types::QueuedRequest;

/// Admission controller for outbound HTTP requests
///
/// Owns the producer side of the bounded request queue and the wiring of
/// sender, fulfiller and dispatcher. Callers [`queue`](Throttler::queue)
/// requests concurrently; the dispatcher admits them one per rate interval,
/// in arrival order. Constructing a `Throttler` does not start dispatching;
/// call [`start`](Throttler::start) exactly once first.
pub struct Throttler {
    queue: mpsc::Sender<QueuedRequest>,
    rate: Rate,
    dispatcher: Option<Dispatcher>,
    started: bool,
}

impl std::fmt::Debug for Throttler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttler")
            .field("rate", &self.rate)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl Throttler {
    /// Build a throttler with the given rate, queue capacity and transport
    ///
    /// The queue capacity is the system's sole backpressure mechanism:
    /// `queue()` blocks while the queue is full. When `transport` is `None`
    /// a default [`reqwest::Client`] is used. With `verbose` set, the
    /// dispatcher logs every admission.
    ///
    /// # Errors
    ///
    /// Fails with [`ThrottleError::InvalidQueueCapacity`] when
    /// `queue_capacity` is zero.
    pub fn new(
        rate: Rate,
        queue_capacity: usize,
        verbose: bool,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self, ThrottleError> {
        if queue_capacity == 0 {
            return Err(ThrottleError::InvalidQueueCapacity);
        }
        let transport = transport.unwrap_or_else(|| Arc::new(Client::new()) as Arc<dyn Transport>);

        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity);
        let sender = Arc::new(HttpSender::new(transport));
        let fulfiller = Arc::new(SendFulfiller::new(sender));
        let dispatcher = Dispatcher::new(rate.calculate_rate(), queue_rx, verbose, fulfiller);

        Ok(Throttler {
            queue: queue_tx,
            rate,
            dispatcher: Some(dispatcher),
            started: false,
        })
    }

    /// Spawn the dispatcher's listen loop on its own task
    ///
    /// Must be called exactly once before queueing. The queue receiver moves
    /// into the dispatcher task, so a second call is a no-op.
    pub fn start(&mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            tokio::spawn(dispatcher.listen());
            self.started = true;
        }
    }

    /// The minimum interval between two consecutive dispatches
    pub fn rate(&self) -> Duration {
        self.rate.calculate_rate()
    }

    /// Queue a request and wait for its response
    ///
    /// Blocks while the request queue is full, then waits for the response
    /// under a race against `timeout` and the caller's cancellation token.
    /// The deadline is taken before enqueueing, so time spent waiting in the
    /// queue counts against it. A per-request child scope is derived from
    /// `ctx`; once this call returns (or is dropped), that scope is
    /// cancelled and any later-arriving response is silently discarded.
    ///
    /// Expiry or cancellation never aborts a network call already in
    /// flight, and never affects other queued requests.
    ///
    /// # Errors
    ///
    /// - [`ThrottleError::NotStarted`] when [`start`](Throttler::start) has not run
    /// - [`ThrottleError::DeadlineExceeded`] when `timeout` elapses first
    /// - [`ThrottleError::Cancelled`] when `ctx` is cancelled first
    /// - [`ThrottleError::Transport`] carrying the downstream error verbatim
    pub async fn queue(
        &self,
        ctx: &CancellationToken,
        name: &str,
        request: Request,
        timeout: Duration,
    ) -> Result<Response, ThrottleError> {
        if !self.started {
            return Err(ThrottleError::NotStarted);
        }

        let cancel = ctx.child_token();
        let _guard = cancel.clone().drop_guard();
        let (reply_tx, reply_rx) = oneshot::channel();
        let deadline = Instant::now() + timeout;

        let item = QueuedRequest {
            cancel: cancel.clone(),
            name: name.to_string(),
            request,
            reply: reply_tx,
            timeout,
        };
        self.queue
            .send(item)
            .await
            .map_err(|_| ThrottleError::QueueClosed)?;

        tokio::select! {
            _ = cancel.cancelled() => Err(ThrottleError::Cancelled),
            outcome = time::timeout_at(deadline, reply_rx) => match outcome {
                Err(_) => Err(ThrottleError::DeadlineExceeded),
                // the fulfiller observed cancellation and dropped the reply slot
                Ok(Err(_)) => Err(ThrottleError::Cancelled),
                Ok(Ok(result)) => result.map_err(ThrottleError::Transport),
            },
        }
    }
}
