//! Backend response status classification for HTTP gateway clients.
//!
//! For every configured backend, a [`StatusHandler`] decides whether a
//! response counts as successful (status 200 or 201) and shapes the error
//! when it does not:
//! - [`Backend`] - Upstream endpoint descriptor with namespaced extra configuration
//! - [`StatusOptions`] - Typed view of the [`NAMESPACE`] configuration block
//! - [`StatusHandler`] - Classification strategy selected per backend
//! - [`BackendResponse`] - Response with a streaming, capture-restorable body
//! - [`ResponseError`] and [`NamedResponseError`] - Captured failure records
//! - [`StatusError`] and [`Rejection`] - Classification errors
//! - [`middleware`] - Tower layer applying a handler to a client service

mod backend;
mod config;
mod error;
mod handler;
pub mod middleware;
pub mod prelude;
mod response;

pub use backend::Backend;
pub use config::{NAMESPACE, StatusOptions};
pub use error::{NamedResponseError, Rejection, ResponseError, StatusError};
pub use handler::StatusHandler;
pub use response::{BackendResponse, BodyError, BodyStream};

// Re-export http crate types for methods and headers
pub use http::{Method, header};
