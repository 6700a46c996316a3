//! Structured service errors for HTTP RPC.
//!
//! This library defines a typed error contract for HTTP services: an error
//! raised inside a request handler is turned into a well-formed JSON error
//! response, and a client reading that response gets the same typed error
//! back.
//!
//! # Design Goals
//!
//! Expected failures (a missing resource, a bad argument) should reach the
//! client with a stable code, a name and their safe parameters. Anything
//! else must never leak detail past the process boundary: it is logged
//! locally in full and reported to the client as a generic internal error.
//! Writing an error response must always produce a valid envelope, even if
//! the error's parameters cannot be encoded.
//!
//! # Architecture
//!
//! [`code`] contains the closed table of [`ErrorCode`]s, each paired with one
//! HTTP status, and [`ErrorType`], which binds a code to a namespaced name.
//!
//! [`params`] separates safe parameters (logged and sent) from unsafe ones
//! (logged locally, never sent).
//!
//! [`service_error`] defines [`ServiceError`], the immutable error value
//! handlers return, with convenience constructors for every standard code.
//!
//! [`wire`] encodes a [`ServiceError`] as a JSON envelope and decodes it
//! back. Encoding degrades to an envelope without parameters rather than
//! failing; decoding is best-effort about parameters only.
//!
//! [`classify`] walks a failure's `source()` chain and splits it into a
//! domain error or an opaque one.
//!
//! [`response`] defines the [`ResponseWriter`] capability expected from the
//! host HTTP stack, an in-memory [`BufferedResponse`], and the two writers
//! [`write_json_response`] and [`write_error_response`].
//!
//! [`handler`] provides [`HandlerFunc`], which wraps a fallible handler and
//! logs and writes its failures.
//!
//! `axum` (feature `axum`, on by default) adapts all of this to axum
//! handlers and responses.
//!
//! [`error`] defines the failures of the contract machinery itself,
//! separate from the service errors sent over the wire.
//!
//! # Quick Start
//!
//! ```
//! use rest_errors::{
//!     BoxError, BufferedResponse, ErrorCode, HandlerFunc, ServiceError, error_from_response,
//!     safe_param, unsafe_param,
//! };
//!
//! let handler = HandlerFunc::new(|_w: &mut BufferedResponse, user: &str| -> Result<(), BoxError> {
//!     Err(ServiceError::permission_denied([
//!         safe_param("action", "delete"),
//!         unsafe_param("user", user),
//!     ])
//!     .into())
//! });
//!
//! let mut w = BufferedResponse::new();
//! handler.serve(&mut w, "mallory");
//!
//! let response = w.into_http();
//! assert_eq!(response.status(), 403);
//!
//! let err = error_from_response(&response)?;
//! assert_eq!(err.code(), ErrorCode::PermissionDenied);
//! assert_eq!(err.parameters()["action"], "delete");
//! assert!(err.parameters().get("user").is_none());
//! # Ok::<(), rest_errors::Error>(())
//! ```
//!
//! # Logging
//!
//! Failures are logged with `tracing` in whatever span is current when the
//! adapter runs, normally the host server's request span. Errors whose
//! status is below 500 are logged at `INFO`, the rest at `ERROR`.

pub use classify::{Failure, classify};
pub use code::{ErrorCode, ErrorType};
pub use error::Error;
pub use handler::{BoxError, HandlerFunc, Severity, handle_failure};
pub use params::{Param, ParamValue, Safety, safe_param, unsafe_param};
pub use response::{BufferedResponse, ResponseWriter, write_error_response, write_json_response};
pub use service_error::{ServiceError, ServiceErrorBuilder};
pub use wire::{decode, encode, error_from_response};

#[cfg(feature = "axum")]
pub mod axum;
pub mod classify;
pub mod code;
pub mod error;
pub mod handler;
pub mod params;
pub mod response;
pub mod service_error;
pub mod wire;
