//! Axum integration for the error contract.
//!
//! This module provides an optional integration with the axum web framework.
//! Enable the `axum` feature in Cargo.toml to use it (it is on by default).
//!
//! [`HandlerFunc`] adapts an async `Request -> Result<Response, BoxError>`
//! function into an axum handler. Axum handles the HTTP transport; the
//! library turns failures into error envelopes.
//!
//! ```toml
//! [dependencies]
//! rest-errors = { version = "0.1", features = ["axum"] }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use axum::{Router, extract::Request, response::Response, routing::get};
//! use rest_errors::axum::HandlerFunc;
//! use rest_errors::{BoxError, ServiceError, safe_param};
//!
//! async fn widget(request: Request) -> Result<Response, BoxError> {
//!     let id = request.uri().path().trim_start_matches("/widgets/").to_string();
//!     Err(ServiceError::not_found([safe_param("widget", &id)]).into())
//! }
//!
//! let app: Router = Router::new().route("/widgets/{id}", get(HandlerFunc::new(widget)));
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::handler::Handler;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use http::StatusCode;
use serde::Serialize;

use crate::error::Error;
use crate::handler::{BoxError, handle_failure};
use crate::response::{BufferedResponse, write_json_response};
use crate::service_error::ServiceError;
use crate::wire;

/// Largest error body read by [`error_from_body`].
pub const MAX_ERROR_BODY_BYTES: usize = 10 * 1024 * 1024;

mod private {
    #[derive(Debug, Clone, Copy)]
    pub struct HandlerFuncMarker;
}

/// Async handler adapter for axum.
///
/// On `Ok` the handler's response is returned untouched. On `Err` the
/// failure is classified, logged in the current span and written as an error
/// envelope.
pub struct HandlerFunc<F> {
    f: Arc<F>,
}

impl<F> Clone for HandlerFunc<F> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<F, Fut> HandlerFunc<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }

    /// Run the wrapped handler for one request.
    pub async fn serve(&self, request: Request) -> Response {
        match (self.f)(request).await {
            Ok(response) => response,
            Err(err) => {
                let mut w = BufferedResponse::new();
                handle_failure(&mut w, &*err);
                w.into_response()
            }
        }
    }
}

impl<F, Fut, S> Handler<private::HandlerFuncMarker, S> for HandlerFunc<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    type Future = BoxFuture<'static, Response>;

    fn call(self, request: Request, _state: S) -> Self::Future {
        Box::pin(async move { self.serve(request).await })
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let (parts, body) = self.into_http().into_parts();
        Response::from_parts(parts, Body::from(body))
    }
}

impl IntoResponse for ServiceError {
    /// Logs the error and writes its envelope, as the adapter would.
    fn into_response(self) -> Response {
        let mut w = BufferedResponse::new();
        handle_failure(&mut w, &self);
        w.into_response()
    }
}

/// A JSON body with an explicit status, written by [`write_json_response`].
#[derive(Debug, Clone)]
pub struct JsonResponse<T> {
    value: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn new(value: T, status: StatusCode) -> Self {
        Self { value, status }
    }

    pub fn ok(value: T) -> Self {
        Self::new(value, StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        let mut w = BufferedResponse::new();
        write_json_response(&mut w, &self.value, self.status);
        w.into_response()
    }
}

/// Reconstruct the service error carried by an axum response.
///
/// Reads at most [`MAX_ERROR_BODY_BYTES`] of the body.
pub async fn error_from_body(response: Response) -> Result<ServiceError, Error> {
    let bytes = axum::body::to_bytes(response.into_body(), MAX_ERROR_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read error response body: {}", e);
            Error::malformed(format!("failed to read body: {e}"))
        })?;

    wire::decode(&bytes)
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;
    use crate::code::ErrorCode;
    use crate::params::safe_param;

    #[tokio::test]
    async fn ok_response_passes_through() {
        let handler = HandlerFunc::new(|_request: Request| async {
            Ok::<_, BoxError>(JsonResponse::new("made", StatusCode::CREATED).into_response())
        });

        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"\"made\"\n");
    }

    #[tokio::test]
    async fn failure_becomes_envelope() {
        let handler = HandlerFunc::new(|_request: Request| async {
            Err::<Response, BoxError>(ServiceError::conflict([safe_param("version", &2)]).into())
        });

        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );

        let err = error_from_body(response).await.unwrap();
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.parameters()["version"], 2);
    }

    #[tokio::test]
    async fn handler_call_returns_boxed_envelope_future() {
        let handler = HandlerFunc::new(|_request: Request| async {
            Err::<Response, BoxError>(ServiceError::timeout([]).into())
        });

        let future: BoxFuture<'static, Response> =
            Handler::<private::HandlerFuncMarker, ()>::call(handler, Request::new(Body::empty()), ());
        let response = future.await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = error_from_body(response).await.unwrap();
        assert_eq!(err.code(), ErrorCode::Timeout);
    }

    #[tokio::test]
    async fn service_error_into_response() {
        let original = ServiceError::permission_denied([]);
        let response = original.clone().into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let err = error_from_body(response).await.unwrap();
        assert_eq!(err.instance_id(), original.instance_id());
    }

    #[tokio::test]
    async fn non_envelope_body_is_malformed() {
        let response = (StatusCode::BAD_GATEWAY, "upstream down").into_response();
        assert!(matches!(
            error_from_body(response).await,
            Err(Error::MalformedEnvelope(_))
        ));
    }
}
