//! # kinetic-gateway
//!
//! The inference gateway: turns a raw chat request into a streamed model
//! response, tolerating per-credential upstream failures.
//!
//! One request flows through [`handler::respond`]: permissive body parsing,
//! turn/vault normalization, sync-gated system prompt, then the sequential
//! fail-over loop over the [`keys::ApiKeyPool`]. The HTTP surface
//! ([`server`]) exposes `POST /api/chat` (chunked text stream) and
//! `GET /healthz`, and converts every failure into a `{error}` body with
//! status 500. Nothing outlives a request except the immutable config and
//! key pool.

pub mod config;
pub mod handler;
pub mod keys;
pub mod server;

pub use config::GatewayConfig;
pub use handler::{respond, stream_with_failover, GatewayState};
pub use keys::ApiKeyPool;
pub use server::{build_router, serve};
