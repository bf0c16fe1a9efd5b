//! # kinetic-core
//!
//! Core types for the Kinetic inference gateway: the permissive inbound request
//! shape with its normalization rules, the [`GatewayError`] boundary enum, and
//! tracing initialization. Transport-agnostic; used by kinetic-gateway and
//! kinetic-cli.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{GatewayError, Result};
pub use logger::init_tracing;
pub use types::{normalize_turns, vault_facts, ChatRequest};
