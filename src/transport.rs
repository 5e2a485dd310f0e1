//! The downstream HTTP transport boundary.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Request, Response};

/// Capability to perform one outbound HTTP call
///
/// This is the seam between the throttler and the network. The default
/// implementation is [`reqwest::Client`]; tests substitute a mock. The call
/// may block indefinitely unless the supplied client carries its own
/// timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return the response, or the transport's own
    /// error untouched
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl Transport for Client {
    async fn execute(&self, request: Request) -> Result<Response> {
        Ok(Client::execute(self, request).await?)
    }
}
