//! Response writing.
//!
//! [`ResponseWriter`] is the narrow capability the adapter needs from the
//! host HTTP stack. [`BufferedResponse`] implements it in memory with the
//! same commit semantics as a streaming HTTP response: once the status is
//! written, the status and headers are fixed.

use std::io;

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::service_error::ServiceError;
use crate::wire;

/// Content type of error envelopes.
pub const ERROR_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content type of [`write_json_response`] bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The response half of an HTTP exchange.
pub trait ResponseWriter {
    /// Set a header. Has no effect once the status has been written.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Write the status line. Only the first call takes effect.
    fn write_status(&mut self, status: StatusCode);

    /// Append body bytes, committing a `200 OK` status if none was written.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// An in-memory [`ResponseWriter`].
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether anything has been committed.
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Convert into an `http` response. An uncommitted response becomes an
    /// empty `200 OK`.
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for BufferedResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.is_committed() {
            debug!(header = %name, "Ignoring header set after status was written");
            return;
        }
        self.headers.insert(name, value);
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(committed) => {
                debug!(%committed, ignored = %status, "Superfluous status write");
            }
            None => self.status = Some(status),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

/// Write `value` as a JSON body with the given status.
///
/// The body is newline-terminated and `<`, `>` and `&` are written verbatim.
/// The status is committed before encoding; if encoding then fails the
/// encoder's message is written as a plain-text body under whatever status
/// was already sent.
pub fn write_json_response<W, T>(w: &mut W, value: &T, status: StatusCode)
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    w.set_header(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    w.write_status(status);

    let mut buf = Vec::new();
    let result = match serde_json::to_writer(&mut buf, value) {
        Ok(()) => {
            buf.push(b'\n');
            w.write_bytes(&buf)
        }
        Err(e) => {
            error!(%status, error = %e, "Failed to encode JSON response body");
            w.write_bytes(format!("{e}\n").as_bytes())
        }
    };

    // A failed write means the connection is gone.
    if let Err(e) = result {
        debug!(error = %e, "Failed to write JSON response body");
    }
}

/// Write a service error as an error envelope with its matching status.
///
/// If the envelope cannot be encoded at all nothing is written.
pub fn write_error_response<W>(w: &mut W, err: &ServiceError)
where
    W: ResponseWriter + ?Sized,
{
    let body = match wire::encode(err) {
        Ok(body) => body,
        Err(e) => {
            error!(
                error_code = %err.code(),
                error_name = err.name(),
                error_instance_id = %err.instance_id(),
                error = %e,
                "Abandoning error response: envelope could not be encoded"
            );
            return;
        }
    };

    w.set_header(header::CONTENT_TYPE, HeaderValue::from_static(ERROR_CONTENT_TYPE));
    w.write_status(err.code().status_code());

    if let Err(e) = w.write_bytes(&body) {
        debug!(error = %e, "Failed to write error response body");
    }
}
