//! The request path: parse, normalize, gate the vault, then try keys in order
//! until one streams.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use groq_client::redact_key;
use kinetic_core::{ChatRequest, GatewayError};
use llm_client::{GroqProvider, ModelProvider, TokenStream};
use prompt::{build_system_prompt, render_vault, ChatTurn};
use tracing::{info, warn};

use crate::config::GatewayConfig;
use crate::keys::ApiKeyPool;

/// Per-process gateway state shared by all requests: the filtered key pool,
/// the attempt timeout, and the provider handle. Read-only after construction.
pub struct GatewayState {
    pub pool: ApiKeyPool,
    pub attempt_timeout: Duration,
    pub provider: Arc<dyn ModelProvider>,
}

impl GatewayState {
    pub fn new(config: &GatewayConfig) -> Self {
        let provider = GroqProvider::new(&config.base_url, &config.model);
        Self::with_provider(config, Arc::new(provider))
    }

    /// Builds state around an injected provider; tests substitute scripted
    /// providers here.
    pub fn with_provider(config: &GatewayConfig, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            pool: ApiKeyPool::new(config.api_keys.clone()),
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
            provider,
        }
    }
}

/// Handles one raw request body end to end and returns the live token stream.
///
/// Errors map one-to-one onto the boundary kinds: unparseable body, empty key
/// pool, or exhausted credentials. Missing or mistyped fields inside a
/// parseable body never fail the request.
pub async fn respond(state: &GatewayState, body: &[u8]) -> Result<TokenStream, GatewayError> {
    let request: ChatRequest =
        serde_json::from_slice(body).map_err(|e| GatewayError::MalformedRequest(e.to_string()))?;

    let turns = request.turns();
    let vault_text = render_vault(request.facts());

    if state.pool.is_empty() {
        return Err(GatewayError::NoCredentials);
    }

    let sync = request.sync_state();
    let system_prompt = build_system_prompt(sync, &vault_text);

    info!(
        turns = turns.len(),
        sync = ?sync,
        wallet = %request
            .wallet()
            .map(redact_key)
            .unwrap_or_else(|| "-".to_string()),
        "chat request"
    );

    stream_with_failover(
        state.provider.as_ref(),
        &state.pool,
        state.attempt_timeout,
        &system_prompt,
        &turns,
    )
    .await
}

/// Tries each key in pool order, strictly one at a time. The first attempt
/// that yields a live stream wins and later keys are never touched; the last
/// attempt's failure is surfaced as the aggregate error.
pub async fn stream_with_failover(
    provider: &dyn ModelProvider,
    pool: &ApiKeyPool,
    attempt_timeout: Duration,
    system_prompt: &str,
    turns: &[ChatTurn],
) -> Result<TokenStream, GatewayError> {
    let total = pool.len();
    for (index, key) in pool.iter().enumerate() {
        match attempt(provider, key, attempt_timeout, system_prompt, turns).await {
            Ok(stream) => {
                info!(
                    attempt = index + 1,
                    api_key = %redact_key(key),
                    "upstream stream opened"
                );
                return Ok(stream);
            }
            Err(GatewayError::Upstream(message)) if index + 1 < total => {
                warn!(
                    attempt = index + 1,
                    api_key = %redact_key(key),
                    error = %message,
                    "attempt failed, falling over to next key"
                );
            }
            Err(GatewayError::Upstream(message)) => {
                warn!(
                    attempt = index + 1,
                    api_key = %redact_key(key),
                    error = %message,
                    "last attempt failed"
                );
                return Err(GatewayError::Exhausted(message));
            }
            Err(other) => return Err(other),
        }
    }
    // Only reachable with an empty pool, which callers exclude up front.
    Err(GatewayError::Unknown)
}

/// One credential attempt: open a session, initiate the stream, and probe its
/// first item, all bounded by the attempt timeout.
///
/// The probe makes failures that the provider reports as the first stream
/// item (auth, rate limit) count against this credential; on success the
/// probed token is stitched back onto the front of the returned stream.
async fn attempt(
    provider: &dyn ModelProvider,
    key: &str,
    attempt_timeout: Duration,
    system_prompt: &str,
    turns: &[ChatTurn],
) -> Result<TokenStream, GatewayError> {
    let call = async {
        let session = provider.open(key).await?;
        let mut stream = session.complete_streaming(system_prompt, turns).await?;
        match stream.next().await {
            Some(Ok(first)) => {
                let stitched: TokenStream =
                    Box::pin(futures::stream::once(async move { Ok(first) }).chain(stream));
                Ok(stitched)
            }
            Some(Err(e)) => Err(e),
            None => Ok(Box::pin(futures::stream::empty()) as TokenStream),
        }
    };

    match tokio::time::timeout(attempt_timeout, call).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(GatewayError::Upstream(e.to_string())),
        Err(_) => Err(GatewayError::Upstream(format!(
            "attempt timed out after {}s",
            attempt_timeout.as_secs()
        ))),
    }
}
