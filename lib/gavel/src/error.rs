//! Error types for gavel.

use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::response::BackendResponse;

// ============================================================================
// Error Records
// ============================================================================

/// Structured record of a rejected backend response.
///
/// Serializes to the wire shape consumed by gateway error encoders:
/// `{"http_status_code": 500, "http_body": "...", "http_body_encoding": "..."}`
/// where an empty body or encoding is omitted. The display form is the body
/// text alone.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Serialize)]
#[display("{body}")]
pub struct ResponseError {
    /// Status code returned by the backend.
    #[serde(rename = "http_status_code")]
    code: u16,
    /// Captured body text.
    #[serde(rename = "http_body", skip_serializing_if = "String::is_empty")]
    body: String,
    /// Declared content type of the body.
    #[serde(rename = "http_body_encoding", skip_serializing_if = "String::is_empty")]
    encoding: String,
}

impl ResponseError {
    /// Creates a record from raw parts.
    #[must_use]
    pub fn new(code: u16, body: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            code,
            body: body.into(),
            encoding: encoding.into(),
        }
    }

    /// Captures the failure detail of a response.
    ///
    /// Drains the response body into the record and leaves the response with
    /// a replayable copy, so downstream consumers can still read it. A body
    /// that cannot be read is recorded as empty. The body text is decoded
    /// lossily, invalid UTF-8 turns into replacement characters.
    pub async fn capture(response: &mut BackendResponse) -> Self {
        let body = response.capture_body().await;
        let encoding = response
            .header(http::header::CONTENT_TYPE.as_str())
            .unwrap_or_default();

        Self {
            code: response.status(),
            body: String::from_utf8_lossy(&body).into_owned(),
            encoding: encoding.to_string(),
        }
    }

    /// Status code returned by the backend.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code
    }

    /// Captured body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Declared content type of the body, empty when the backend sent none.
    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

/// A [`ResponseError`] attributed to a named backend.
///
/// The name identifies the backend in application code and is not part of
/// the serialized wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Serialize)]
#[display("{record}")]
pub struct NamedResponseError {
    #[serde(flatten)]
    record: ResponseError,
    #[serde(skip)]
    name: String,
}

impl NamedResponseError {
    /// Creates a named record.
    #[must_use]
    pub fn new(record: ResponseError, name: impl Into<String>) -> Self {
        Self {
            record,
            name: name.into(),
        }
    }

    /// Name of the backend that produced the response.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying record.
    #[must_use]
    pub const fn record(&self) -> &ResponseError {
        &self.record
    }

    /// Status code returned by the backend.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.record.status_code()
    }

    /// Captured body text.
    #[must_use]
    pub fn body(&self) -> &str {
        self.record.body()
    }

    /// Declared content type of the body.
    #[must_use]
    pub fn encoding(&self) -> &str {
        self.record.encoding()
    }
}

// ============================================================================
// Status Error
// ============================================================================

/// Classification error for a rejected backend response.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum StatusError {
    /// Rejection with no endpoint context.
    #[display("invalid status code")]
    #[from(skip)]
    InvalidStatusCode,

    /// Rejection identifying the endpoint and the URL that was called.
    #[display("invalid status code {code} {prefix} {path}")]
    #[from(skip)]
    InvalidStatus {
        /// Status code returned by the backend.
        code: u16,
        /// Endpoint prefix, `"[<METHOD> <pattern>]:"`.
        prefix: String,
        /// URL the request was sent to, empty when unknown.
        path: String,
    },

    /// Rejection carrying the captured failure detail.
    #[display("{_0}")]
    #[from]
    Response(ResponseError),

    /// Rejection carrying the captured failure detail, attributed to a named
    /// backend.
    #[display("{_0}")]
    #[from]
    NamedResponse(NamedResponseError),
}

impl StatusError {
    /// Builds the endpoint-scoped invalid status error for a response.
    #[must_use]
    pub fn invalid_status(response: &BackendResponse, prefix: impl Into<String>) -> Self {
        Self::InvalidStatus {
            code: response.status(),
            prefix: prefix.into(),
            path: response.url().map(ToString::to_string).unwrap_or_default(),
        }
    }

    /// Returns the rejected status code, when the error knows it.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidStatusCode => None,
            Self::InvalidStatus { code, .. } => Some(*code),
            Self::Response(record) => Some(record.status_code()),
            Self::NamedResponse(record) => Some(record.status_code()),
        }
    }

    /// Returns the captured record for detailed errors.
    #[must_use]
    pub const fn detail(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(record) => Some(record),
            Self::NamedResponse(record) => Some(record.record()),
            _ => None,
        }
    }

    /// Returns the backend name for named detailed errors.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::NamedResponse(record) => Some(record.name()),
            _ => None,
        }
    }

    /// Returns `true` when the error carries a captured record.
    #[must_use]
    pub const fn is_detailed(&self) -> bool {
        matches!(self, Self::Response(_) | Self::NamedResponse(_))
    }
}

// ============================================================================
// Rejection
// ============================================================================

/// Rejection produced by a status handler.
///
/// Pairs the classification error with, for detailed handlers, the response
/// it rejected. The preserved response has its body restored and stays fully
/// readable.
#[derive(Debug, Display, Error)]
#[display("{error}")]
pub struct Rejection {
    #[error(source)]
    error: StatusError,
    response: Option<Box<BackendResponse>>,
}

impl Rejection {
    /// Creates a rejection that discards the response.
    #[must_use]
    pub fn new(error: StatusError) -> Self {
        Self {
            error,
            response: None,
        }
    }

    /// Creates a rejection that preserves the rejected response.
    #[must_use]
    pub fn with_response(error: StatusError, response: BackendResponse) -> Self {
        Self {
            error,
            response: Some(Box::new(response)),
        }
    }

    /// The classification error.
    #[must_use]
    pub const fn error(&self) -> &StatusError {
        &self.error
    }

    /// Returns the rejected status code, when known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.error.status()
    }

    /// The preserved response, when the handler kept it.
    #[must_use]
    pub fn response(&self) -> Option<&BackendResponse> {
        self.response.as_deref()
    }

    /// Consumes the rejection, returning the preserved response.
    #[must_use]
    pub fn into_response(self) -> Option<BackendResponse> {
        self.response.map(|response| *response)
    }

    /// Consumes the rejection, keeping only the classification error.
    #[must_use]
    pub fn into_error(self) -> StatusError {
        self.error
    }

    /// Splits the rejection into its error and preserved response.
    #[must_use]
    pub fn into_parts(self) -> (StatusError, Option<BackendResponse>) {
        (self.error, self.response.map(|response| *response))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use url::Url;

    use super::*;

    #[test]
    fn record_display_is_the_body_text() {
        let record = ResponseError::new(500, "oops", "text/plain");
        assert_eq!(record.to_string(), "oops");

        let record = ResponseError::new(503, "", "");
        assert_eq!(record.to_string(), "");
    }

    #[test]
    fn invalid_status_display() {
        let err = StatusError::InvalidStatusCode;
        assert_eq!(err.to_string(), "invalid status code");

        let err = StatusError::InvalidStatus {
            code: 500,
            prefix: "[GET /items]:".to_string(),
            path: "http://localhost/items".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid status code 500 [GET /items]: http://localhost/items"
        );

        // An unknown URL leaves a trailing space, consumers match on the prefix.
        let err = StatusError::InvalidStatus {
            code: 500,
            prefix: "[GET /items]:".to_string(),
            path: String::new(),
        };
        assert_eq!(err.to_string(), "invalid status code 500 [GET /items]: ");
    }

    #[test]
    fn record_serialization() {
        let record = ResponseError::new(500, "oops", "text/plain");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            json,
            r#"{"http_status_code":500,"http_body":"oops","http_body_encoding":"text/plain"}"#
        );
    }

    #[test]
    fn record_serialization_omits_empty_fields() {
        let record = ResponseError::new(503, "", "");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"http_status_code":503}"#);
    }

    #[test]
    fn named_record_serialization_skips_the_name() {
        let record = NamedResponseError::new(ResponseError::new(500, "oops", ""), "users-backend");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"http_status_code":500,"http_body":"oops"}"#);
    }

    #[tokio::test]
    async fn capture_records_the_response_detail() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        let mut response = BackendResponse::from_bytes(500, headers, "oops");

        let record = ResponseError::capture(&mut response).await;

        assert_eq!(record.status_code(), 500);
        assert_eq!(record.body(), "oops");
        assert_eq!(record.encoding(), "text/plain");

        // The response body is still readable after the capture.
        let replayed = response.read_body().await.expect("read body");
        assert_eq!(replayed, bytes::Bytes::from("oops"));
    }

    #[test]
    fn status_error_accessors() {
        let err = StatusError::InvalidStatusCode;
        assert_eq!(err.status(), None);
        assert!(!err.is_detailed());

        let err = StatusError::Response(ResponseError::new(503, "", ""));
        assert_eq!(err.status(), Some(503));
        assert!(err.is_detailed());
        assert_eq!(err.name(), None);

        let record = NamedResponseError::new(ResponseError::new(500, "oops", ""), "users-backend");
        let err = StatusError::NamedResponse(record);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.name(), Some("users-backend"));
        assert_eq!(err.detail().map(ResponseError::body), Some("oops"));
    }

    #[test]
    fn detailed_error_sources_the_record() {
        let err = StatusError::Response(ResponseError::new(500, "oops", ""));
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "oops");
    }

    #[test]
    fn rejection_preserves_the_response() {
        let response = BackendResponse::from_bytes(500, HashMap::new(), "oops")
            .with_url(Url::parse("http://localhost/items").expect("parse url"));
        let rejection = Rejection::with_response(
            StatusError::Response(ResponseError::new(500, "oops", "")),
            response,
        );

        assert_eq!(rejection.status(), Some(500));
        assert_eq!(rejection.to_string(), "oops");
        assert!(rejection.response().is_some());

        let (error, response) = rejection.into_parts();
        assert!(error.is_detailed());
        let response = response.expect("preserved response");
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn plain_rejection_has_no_response() {
        let rejection = Rejection::new(StatusError::InvalidStatusCode);
        assert!(rejection.response().is_none());
        assert!(rejection.into_response().is_none());
    }
}
