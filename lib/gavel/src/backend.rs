//! Backend endpoint descriptors.
//!
//! A [`Backend`] describes one upstream endpoint the way a gateway
//! configuration declares it: an HTTP method, a URL pattern, and free-form
//! extra configuration keyed by namespace.
//!
//! # Example
//!
//! ```
//! use gavel::{Backend, Method, NAMESPACE};
//! use serde_json::json;
//!
//! let backend = Backend::new(Method::GET, "/users/{id}")
//!     .with_extra_config(NAMESPACE, json!({"return_error_code": true}));
//!
//! assert_eq!(backend.error_prefix(), "[GET /users/{id}]:");
//! ```

use std::collections::HashMap;

use http::Method;
use serde_json::Value;

use crate::config::StatusOptions;

/// One upstream endpoint definition.
#[derive(Debug, Clone)]
pub struct Backend {
    method: Method,
    url_pattern: String,
    extra_config: HashMap<String, Value>,
}

impl Backend {
    /// Creates a backend for a method and URL pattern.
    #[must_use]
    pub fn new(method: Method, url_pattern: impl Into<String>) -> Self {
        Self {
            method,
            url_pattern: url_pattern.into(),
            extra_config: HashMap::new(),
        }
    }

    /// Adds an extra configuration block under a namespace.
    #[must_use]
    pub fn with_extra_config(mut self, namespace: impl Into<String>, block: Value) -> Self {
        self.extra_config.insert(namespace.into(), block);
        self
    }

    /// HTTP method of the endpoint.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// URL pattern of the endpoint, for example `/users/{id}`.
    #[must_use]
    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    /// Extra configuration blocks keyed by namespace.
    #[must_use]
    pub const fn extra_config(&self) -> &HashMap<String, Value> {
        &self.extra_config
    }

    /// Prefix identifying this endpoint in error messages.
    ///
    /// The format is `"[<METHOD> <pattern>]:"`, stable so that operators can
    /// match on it in logs.
    #[must_use]
    pub fn error_prefix(&self) -> String {
        format!("[{} {}]:", self.method, self.url_pattern)
    }

    /// Resolves the status classification options for this backend.
    #[must_use]
    pub fn status_options(&self) -> StatusOptions {
        StatusOptions::from_extra(&self.extra_config)
    }
}
