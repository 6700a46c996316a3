//! Request handler adapter.
//!
//! [`HandlerFunc`] wraps a fallible request handler. On success the adapter
//! does nothing; the handler has already written its response. On failure
//! the adapter classifies the error, logs it and writes the error envelope.
//! The two paths never both write.

use std::error::Error as StdError;

use http::StatusCode;
use tracing::{error, info};

use crate::classify::{CauseChain, classify};
use crate::response::{ResponseWriter, write_error_response};
use crate::service_error::ServiceError;

/// Error type returned by wrapped handlers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Log severity for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client mistakes (status below 500).
    Info,
    /// Operational failures (status 500 and above).
    Error,
}

impl Severity {
    pub fn for_status(status: StatusCode) -> Self {
        if status.as_u16() < 500 {
            Severity::Info
        } else {
            Severity::Error
        }
    }
}

/// A request handler that reports failure by returning an error.
///
/// It is assumed that, if the handler returns an error, it has not written
/// anything to the response.
///
/// # Example
///
/// ```
/// use rest_errors::{BoxError, BufferedResponse, HandlerFunc, ServiceError, safe_param};
///
/// let handler = HandlerFunc::new(|_w: &mut BufferedResponse, id: &u32| -> Result<(), BoxError> {
///     Err(ServiceError::not_found([safe_param("widget", id)]).into())
/// });
///
/// let mut w = BufferedResponse::new();
/// handler.serve(&mut w, &7);
/// assert_eq!(w.status().map(|s| s.as_u16()), Some(404));
/// ```
#[derive(Debug, Clone)]
pub struct HandlerFunc<F> {
    f: F,
}

impl<F> HandlerFunc<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Run the handler and, if it fails, write the error response.
    pub fn serve<W, R>(&self, w: &mut W, request: &R)
    where
        F: Fn(&mut W, &R) -> Result<(), BoxError>,
        W: ResponseWriter + ?Sized,
        R: ?Sized,
    {
        if let Err(err) = (self.f)(w, request) {
            handle_failure(w, &*err);
        }
    }
}

/// Classify, log and write a handler failure.
///
/// Returns the error that was written to the client.
pub fn handle_failure<W>(w: &mut W, err: &(dyn StdError + 'static)) -> ServiceError
where
    W: ResponseWriter + ?Sized,
{
    let service_error = classify(err).to_service_error();
    log_failure(err, &service_error);
    write_error_response(w, &service_error);
    service_error
}

/// Log a failure in the current span, at a severity chosen by its status.
fn log_failure(err: &(dyn StdError + 'static), service_error: &ServiceError) {
    let status = service_error.code().status_code();
    let safe_params = service_error.parameters();
    let unsafe_params = service_error.unsafe_parameters();

    match Severity::for_status(status) {
        Severity::Info => info!(
            error_code = %service_error.code(),
            error_name = service_error.name(),
            error_instance_id = %service_error.instance_id(),
            status = status.as_u16(),
            safe_params = ?safe_params,
            unsafe_params = ?unsafe_params,
            cause_chain = %CauseChain(err),
            "{}",
            err
        ),
        Severity::Error => error!(
            error_code = %service_error.code(),
            error_name = service_error.name(),
            error_instance_id = %service_error.instance_id(),
            status = status.as_u16(),
            safe_params = ?safe_params,
            unsafe_params = ?unsafe_params,
            cause_chain = %CauseChain(err),
            "{}",
            err
        ),
    }
}
