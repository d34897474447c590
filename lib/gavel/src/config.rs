//! Per-backend configuration for status classification.
//!
//! Backends carry free-form extra configuration keyed by namespace. This
//! module owns the [`NAMESPACE`] recognized by the classification layer and
//! the typed view of its options.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use gavel::{NAMESPACE, StatusOptions};
//! use serde_json::json;
//!
//! let mut extra = HashMap::new();
//! extra.insert(NAMESPACE.to_string(), json!({"return_error_code": true}));
//!
//! let options = StatusOptions::from_extra(&extra);
//! assert!(options.wants_error_code());
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Key of the configuration block recognized by the classification layer.
pub const NAMESPACE: &str = "dev.ilaborie.gavel.http";

/// Typed view of the namespaced configuration block.
///
/// Fields keep their presence as `Option` so that "set to an empty value" and
/// "not set" stay distinguishable. Unknown keys in the block are ignored; a
/// block that does not deserialize as a whole counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusOptions {
    /// Backend name to attach to detailed error records.
    #[serde(default)]
    pub return_error_details: Option<String>,
    /// Surface failing status codes as structured records.
    #[serde(default)]
    pub return_error_code: Option<bool>,
}

impl StatusOptions {
    /// Resolves the options from a backend's extra configuration.
    ///
    /// Absent or malformed blocks resolve to the default options, resolution
    /// never fails.
    #[must_use]
    pub fn from_extra(extra: &HashMap<String, Value>) -> Self {
        extra
            .get(NAMESPACE)
            .map(|block| serde_json::from_value(block.clone()).unwrap_or_default())
            .unwrap_or_default()
    }

    /// Name under which detailed errors are reported, when configured.
    ///
    /// An empty name counts as not configured.
    #[must_use]
    pub fn detail_name(&self) -> Option<&str> {
        self.return_error_details
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Returns `true` when failing status codes should be surfaced as
    /// structured records.
    #[must_use]
    pub fn wants_error_code(&self) -> bool {
        self.return_error_code == Some(true)
    }
}
