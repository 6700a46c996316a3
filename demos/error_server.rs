//! A small HTTP service whose handlers fail with structured errors.
//!
//! This demo serves a few routes through the axum `HandlerFunc` adapter. It
//! shows a successful JSON response, an expected domain error with safe and
//! unsafe parameters, and an unexpected error that is masked as INTERNAL.
//!
//! Usage:
//!
//! ```bash
//! cargo run --example error_server
//! ```
//!
//! Then send requests:
//!
//! ```bash
//! curl -i http://localhost:3001/widgets/1
//! curl -i http://localhost:3001/widgets/9
//! curl -i http://localhost:3001/crash
//! ```
//!
//! Expected response for a missing widget:
//!
//! ```json
//! {"errorCode":"NOT_FOUND","errorName":"Widgets:WidgetNotFound","errorInstanceID":"...","parameters":{"widgetId":"9"}}
//! ```

use anyhow::Result;
use axum::Router;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rest_errors::axum::{HandlerFunc, JsonResponse};
use rest_errors::{BoxError, ErrorCode, ErrorType, ServiceError, safe_param, unsafe_param};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct Widget {
    id: String,
    name: String,
}

/// Looks up a widget. Only widget `1` exists.
async fn widget(request: Request) -> Result<Response, BoxError> {
    let id = request
        .uri()
        .path()
        .trim_start_matches("/widgets/")
        .to_string();

    if id != "1" {
        let requested_by = request
            .headers()
            .get("x-user")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("anonymous");
        let error_type = ErrorType::new(ErrorCode::NotFound, "Widgets:WidgetNotFound")?;
        return Err(ServiceError::new(
            error_type,
            [
                safe_param("widgetId", &id),
                unsafe_param("requestedBy", requested_by),
            ],
        )
        .into());
    }

    Ok(JsonResponse::ok(Widget {
        id,
        name: "sprocket".to_string(),
    })
    .into_response())
}

/// Fails with an error that must not reach the client.
async fn crash(_request: Request) -> Result<Response, BoxError> {
    Err(std::io::Error::other("connection to inventory-db:5432 refused").into())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    info!("Initializing error demo server");

    let app = Router::new()
        .route("/widgets/{id}", get(HandlerFunc::new(widget)))
        .route("/crash", get(HandlerFunc::new(crash)));

    let addr: std::net::SocketAddr = "127.0.0.1:3001".parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!("Server started on http://{}", local_addr);
    info!("  - GET /widgets/1: returns a widget");
    info!("  - GET /widgets/<other>: NOT_FOUND with parameters");
    info!("  - GET /crash: masked INTERNAL error");

    axum::serve(listener, app).await?;

    Ok(())
}
