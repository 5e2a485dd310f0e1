use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Request;

use crate::transport::Transport;
use crate::types::Outcome;

/// Capability to perform the downstream call for one queued request
///
/// Always returns a fully populated [`Outcome`], success or failure; it
/// never panics and never retries.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(&self, request: Request) -> Outcome;
}

/// The only component that touches the network: hands the request to the
/// transport and wraps whatever comes back.
pub(crate) struct HttpSender {
    transport: Arc<dyn Transport>,
}

impl HttpSender {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        HttpSender { transport }
    }
}

#[async_trait]
impl Sender for HttpSender {
    async fn send(&self, request: Request) -> Outcome {
        self.transport.execute(request).await
    }
}
