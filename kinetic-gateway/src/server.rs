//! HTTP surface: `POST /api/chat` streaming the completion as chunked plain
//! text, `GET /healthz` as a liveness probe. Every failure becomes a
//! `{error}` body with status 500; nothing propagates as an unhandled fault.

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use futures::{future, StreamExt};
use kinetic_core::GatewayError;
use llm_client::TokenStream;
use serde_json::json;
use tracing::{error, info};

use crate::config::GatewayConfig;
use crate::handler::{respond, GatewayState};

/// Builds the router over shared gateway state.
pub fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn handle_chat(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    match respond(&state, &body).await {
        Ok(stream) => token_response(stream),
        Err(err) => error_response(err),
    }
}

/// Wraps the token stream as a chunked `text/plain` body. Tokens pass through
/// in emission order with no buffering; the consumer reassembles by
/// concatenation. A mid-stream upstream error ends the body (the status is
/// already committed) and is logged.
fn token_response(stream: TokenStream) -> Response {
    let body_stream = stream
        .take_while(|item| {
            if let Err(e) = item {
                error!(error = %e, "upstream stream aborted mid-response");
            }
            future::ready(item.is_ok())
        })
        .map(|item| Ok::<_, Infallible>(Bytes::from(item.unwrap_or_default())));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|e| {
            error!(error = %e, "building streaming response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

fn error_response(err: GatewayError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Binds the configured address and serves until shutdown.
pub async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(GatewayState::new(&config));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %addr, keys = state.pool.len(), "kinetic gateway listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
