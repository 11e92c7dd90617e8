//! The forwarding handler.

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::proxy::binding::Binding;
use crate::proxy::error::ForwardError;
use crate::proxy::upstream::HttpDownstream;

/// A fetch primitive for the bound downstream service.
#[async_trait]
pub trait Downstream: Send + Sync {
    /// Sends `request` and returns the downstream's response.
    async fn fetch(&self, request: Request) -> Result<Response, ForwardError>;

    /// Name used in log fields.
    fn name(&self) -> &str {
        "downstream"
    }
}

/// Relays each request to one downstream and returns its response unchanged.
///
/// Holds no mutable state; clone it or share it behind an `Arc` across tasks.
#[derive(Clone)]
pub struct Forwarder {
    downstream: Arc<dyn Downstream>,
}

impl Forwarder {
    pub fn new(downstream: Arc<dyn Downstream>) -> Self {
        Self { downstream }
    }

    /// Forwarder over a plain HTTP connection to `binding`.
    pub fn from_binding(binding: Binding) -> Self {
        Self::new(Arc::new(HttpDownstream::new(binding)))
    }

    /// Forward `request` to the downstream.
    ///
    /// Exactly one downstream call is made. A failure is returned as-is; there
    /// is no retry and no substitute response.
    pub async fn forward(&self, request: Request) -> Result<Response, ForwardError> {
        tracing::debug!(
            downstream = self.downstream.name(),
            method = %request.method,
            path = %request.path,
            "Forwarding request"
        );

        self.downstream.fetch(request).await
    }
}
