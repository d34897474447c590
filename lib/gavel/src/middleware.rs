//! Response classification middleware.
//!
//! Wraps a backend client service so every response passes through a
//! [`StatusHandler`] before reaching the caller.
//!
//! # Example
//!
//! ```ignore
//! use gavel::middleware::ClassifyLayer;
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(ClassifyLayer::for_backend(&backend))
//!     .service(client);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower_service::Service;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::handler::StatusHandler;
use crate::response::BackendResponse;

// Re-export tower types commonly used alongside the layer
pub use tower::{BoxError, Layer, ServiceBuilder};

/// Layer that applies a [`StatusHandler`] to every response.
#[derive(Debug, Clone)]
pub struct ClassifyLayer {
    handler: StatusHandler,
}

impl ClassifyLayer {
    /// Creates a layer from an already selected handler.
    #[must_use]
    pub fn new(handler: StatusHandler) -> Self {
        Self { handler }
    }

    /// Creates a layer by selecting the handler for a backend.
    #[must_use]
    pub fn for_backend(backend: &Backend) -> Self {
        Self::new(StatusHandler::for_backend(backend))
    }
}

impl<S> Layer<S> for ClassifyLayer {
    type Service = Classify<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Classify {
            inner,
            handler: self.handler.clone(),
        }
    }
}

/// Service that classifies the responses of the wrapped service.
///
/// Rejections cross this boundary as their [`StatusError`](crate::StatusError)
/// boxed into the tower error channel; the preserved response of detailed
/// rejections stops here, its captured status, body, and encoding travel on
/// inside the record.
#[derive(Debug, Clone)]
pub struct Classify<S> {
    inner: S,
    handler: StatusHandler,
}

impl<S> Classify<S> {
    /// Wraps a service with the given handler.
    pub fn new(inner: S, handler: StatusHandler) -> Self {
        Self { inner, handler }
    }
}

impl<S, R> Service<R> for Classify<S>
where
    S: Service<R, Response = BackendResponse> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    R: Send + 'static,
{
    type Response = BackendResponse;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<BackendResponse, BoxError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), BoxError>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: R) -> Self::Future {
        let handler = self.handler.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(request).await.map_err(Into::into)?;
            let status = response.status();

            match handler.classify(response).await {
                Ok(response) => {
                    debug!(status, "backend response accepted");
                    Ok(response)
                }
                Err(rejection) => {
                    warn!(status, error = %rejection, "backend response rejected");
                    Err(rejection.into_error().into())
                }
            }
        })
    }
}
