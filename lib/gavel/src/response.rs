//! Backend HTTP response handling.
//!
//! [`BackendResponse`] carries the status, headers, and streaming body of a
//! single upstream call. The body is a one-shot stream of chunks; once read it
//! is gone, unless it was drained through [`BackendResponse::capture_body`],
//! which re-attaches a replayable copy of what it read.
//!
//! # Example
//!
//! ```ignore
//! let mut response = BackendResponse::from_http(hyper_response);
//! let body = response.capture_body().await;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
use futures_core::Stream;
use futures_util::{StreamExt, TryStreamExt, stream};
use url::Url;

/// Error produced by a body stream chunk.
pub type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// A streaming body: chunks of bytes arriving over time.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, BodyError>> + Send>>;

// ============================================================================
// Backend Response
// ============================================================================

/// HTTP response received from a backend, with streaming body.
///
/// The status code is kept as a plain `u16` so that whatever the backend sent
/// is preserved, valid or not. Headers are flattened to string pairs; values
/// that are not valid UTF-8 are dropped.
pub struct BackendResponse {
    status: u16,
    headers: HashMap<String, String>,
    url: Option<Url>,
    body: BodyStream,
}

impl BackendResponse {
    /// Creates a response from raw parts.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            url: None,
            body,
        }
    }

    /// Creates a response with an in-memory body.
    #[must_use]
    pub fn from_bytes(
        status: u16,
        headers: HashMap<String, String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self::new(status, headers, replay_stream(body.into()))
    }

    /// Converts an [`http::Response`] into a [`BackendResponse`].
    ///
    /// Body frames are flattened to data chunks; trailers are discarded. The
    /// request URL is not part of [`http::Response`], attach it with
    /// [`Self::with_url`] when available.
    #[must_use]
    pub fn from_http<B>(response: http::Response<B>) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BodyError>,
    {
        let (parts, body) = response.into_parts();
        let status = parts.status.as_u16();
        let headers = extract_headers(&parts.headers);

        let body: BodyStream = Box::pin(
            http_body_util::BodyStream::new(body)
                .map_ok(|frame| frame.into_data().unwrap_or_default())
                .map_err(Into::into),
        );

        Self::new(status, headers, body)
    }

    /// Attaches the URL the request was sent to.
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (ASCII case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// URL the request was sent to, when known.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Reads the remaining body to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error; chunks read before it are lost.
    pub async fn read_body(&mut self) -> Result<Bytes, BodyError> {
        let mut collected = Vec::new();

        while let Some(chunk) = self.body.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Ok(Bytes::from(collected))
    }

    /// Drains the body and re-attaches a replayable copy of it.
    ///
    /// Returns the captured bytes. When reading fails partway through, the
    /// partial data is discarded and the capture is empty; the original
    /// stream is closed either way and the response is left holding the
    /// captured bytes as its new body. This never fails.
    pub async fn capture_body(&mut self) -> Bytes {
        let captured = self.read_body().await.unwrap_or_default();
        self.body = replay_stream(captured.clone());
        captured
    }

    /// Consumes the response, returning the body stream.
    #[must_use]
    pub fn into_body(self) -> BodyStream {
        self.body
    }
}

impl fmt::Debug for BackendResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

fn replay_stream(bytes: Bytes) -> BodyStream {
    Box::pin(stream::iter([Ok::<_, BodyError>(bytes)]))
}

fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}
