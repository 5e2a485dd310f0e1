//! The paced dispatch loop draining the request queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::fulfiller::Fulfiller;
use crate::types::QueuedRequest;

/// Sole consumer of the request queue, admitting one item per tick
///
/// The ticking interval is fixed at construction from the calculated rate
/// and never adapts. The tick gates throughput, not arrival: an item that
/// has been waiting is admitted on the first tick after it arrives, in
/// queue order. Admission is never blocked by fulfillment latency; every
/// admitted item is handed to a fulfiller task of its own.
pub(crate) struct Dispatcher {
    rate: Duration,
    queue: mpsc::Receiver<QueuedRequest>,
    verbose: bool,
    fulfiller: Arc<dyn Fulfiller>,
}

impl Dispatcher {
    pub(crate) fn new(
        rate: Duration,
        queue: mpsc::Receiver<QueuedRequest>,
        verbose: bool,
        fulfiller: Arc<dyn Fulfiller>,
    ) -> Self {
        Dispatcher {
            rate,
            queue,
            verbose,
            fulfiller,
        }
    }

    /// Run the leaky bucket loop until the queue is closed
    pub(crate) async fn listen(mut self) {
        // interval panics on a zero period; clamp for degenerate rates
        let mut ticker = time::interval(self.rate.max(Duration::from_nanos(1)));
        // Delay keeps consecutive admissions at least one period apart even
        // after the queue has sat idle; the default behavior would burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(item) = self.queue.recv().await else {
                break;
            };
            let name = item.name.clone();
            if self.verbose {
                tracing::info!(%name, "got ticket, fulfilling request");
            }
            let fulfiller = Arc::clone(&self.fulfiller);
            tokio::spawn(async move { fulfiller.fulfill(item).await });
            if self.verbose {
                tracing::info!(%name, "request handed off");
            }
        }
        tracing::debug!("request queue closed, dispatcher stopping");
    }
}
