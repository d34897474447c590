//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use gavel::prelude::*;
//! ```

pub use crate::{
    Backend, BackendResponse, Method, NAMESPACE, NamedResponseError, Rejection, ResponseError,
    StatusError, StatusHandler, StatusOptions,
};
