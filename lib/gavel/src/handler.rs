//! Status handlers: response classification per backend.
//!
//! A [`StatusHandler`] is selected once per backend from its namespaced
//! configuration and applied to every response that backend returns. Only
//! statuses 200 and 201 count as success, everything else turns into a
//! [`Rejection`] shaped by the handler variant.
//!
//! # Example
//!
//! ```ignore
//! let handler = StatusHandler::for_backend(&backend);
//! let response = handler.classify(response).await?;
//! ```

use tracing::debug;

use crate::backend::Backend;
use crate::error::{NamedResponseError, Rejection, ResponseError, StatusError};
use crate::response::BackendResponse;

/// Status codes accepted as success. 2xx statuses outside this set fail too.
const fn is_accepted(status: u16) -> bool {
    matches!(status, 200 | 201)
}

/// Classification strategy applied to the responses of one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusHandler {
    /// Rejects any status but 200 or 201 with a plain invalid status error.
    /// The response is discarded. When a prefix is present it identifies the
    /// endpoint in the error message.
    Default {
        /// Endpoint prefix embedded in error messages.
        prefix: Option<String>,
    },

    /// Accepts every response untouched, whatever the status.
    ///
    /// Never selected from configuration, callers opt in explicitly when a
    /// pipeline wants raw upstream behavior.
    NoOp,

    /// Rejects any status but 200 or 201 with a captured [`ResponseError`],
    /// preserving the rejected response alongside the error.
    ErrorWithCode,

    /// Like [`StatusHandler::ErrorWithCode`], with the record attributed to
    /// a named backend.
    Detailed {
        /// Backend name attached to the error record.
        name: String,
    },
}

impl Default for StatusHandler {
    fn default() -> Self {
        Self::Default { prefix: None }
    }
}

impl StatusHandler {
    /// Selects the handler for a backend from its namespaced configuration.
    ///
    /// A non-empty `return_error_details` wins over `return_error_code`,
    /// which wins over the default. Absent or malformed configuration falls
    /// through to [`StatusHandler::Default`], selection never fails.
    #[must_use]
    pub fn for_backend(backend: &Backend) -> Self {
        let options = backend.status_options();
        let prefix = backend.error_prefix();

        let handler = if let Some(name) = options.detail_name() {
            Self::Detailed {
                name: name.to_owned(),
            }
        } else if options.wants_error_code() {
            Self::ErrorWithCode
        } else {
            Self::Default {
                prefix: Some(prefix.clone()),
            }
        };

        debug!(backend = %prefix, handler = handler.kind(), "selected status handler");
        handler
    }

    /// Classifies a backend response.
    ///
    /// Accepted responses come back unchanged, body untouched. On rejection,
    /// [`StatusHandler::Default`] discards the response, while
    /// [`StatusHandler::ErrorWithCode`] and [`StatusHandler::Detailed`]
    /// capture the body into the error record and preserve the response in
    /// the [`Rejection`] with its body restored.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the status code is not accepted.
    pub async fn classify(
        &self,
        mut response: BackendResponse,
    ) -> Result<BackendResponse, Rejection> {
        match self {
            Self::NoOp => Ok(response),
            _ if is_accepted(response.status()) => Ok(response),
            Self::Default {
                prefix: Some(prefix),
            } => Err(Rejection::new(StatusError::invalid_status(
                &response,
                prefix.as_str(),
            ))),
            Self::Default { prefix: None } => Err(Rejection::new(StatusError::InvalidStatusCode)),
            Self::ErrorWithCode => {
                let record = ResponseError::capture(&mut response).await;
                Err(Rejection::with_response(
                    StatusError::Response(record),
                    response,
                ))
            }
            Self::Detailed { name } => {
                let record = ResponseError::capture(&mut response).await;
                let record = NamedResponseError::new(record, name.clone());
                Err(Rejection::with_response(
                    StatusError::NamedResponse(record),
                    response,
                ))
            }
        }
    }

    /// Variant name for logs.
    const fn kind(&self) -> &'static str {
        match self {
            Self::Default { .. } => "default",
            Self::NoOp => "no_op",
            Self::ErrorWithCode => "error_with_code",
            Self::Detailed { .. } => "detailed",
        }
    }
}
