//! # Groq API client
//!
//! Thin wrapper around [async-openai] pointed at Groq's OpenAI-compatible
//! endpoint. Provides streaming chat completion as a plain token stream and
//! key redaction for safe logging.

use std::pin::Pin;
use std::sync::Arc;

use async_openai::{types::CreateChatCompletionRequestArgs, Client};
use futures::{Stream, StreamExt};

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Incremental completion output: each item is one text fragment in model
/// emission order. An `Err` item ends the stream.
pub type CompletionStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;

/// Redacts an API key for logging: first 4 chars + `…` + last 4 chars.
/// Keys of fewer than 12 characters are fully redacted so no segment leaks.
pub fn redact_key(key: &str) -> String {
    if key.len() < 12 || !key.is_ascii() {
        return "…".to_string();
    }
    format!("{}…{}", &key[..4], &key[key.len() - 4..])
}

/// Groq chat client. Wraps an async-openai client configured with a custom
/// API base; keeps the key only for redacted logging.
#[derive(Clone)]
pub struct GroqClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    key_for_logging: String,
}

impl GroqClient {
    /// Builds a client for the given key against an OpenAI-compatible base URL.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let key_for_logging = api_key.clone();
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            key_for_logging,
        }
    }

    /// Starts a streaming chat completion and returns the token stream.
    ///
    /// Fails when the request cannot be built or the stream cannot be
    /// initiated; failures reported by the provider on the stream itself
    /// surface as `Err` items. Empty deltas are dropped.
    pub async fn chat_completion_stream(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> anyhow::Result<CompletionStream> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %redact_key(&self.key_for_logging),
            "Groq chat_completion_stream request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "Groq chat_completion_stream request JSON");
        }

        let stream = self.client.chat().create_stream(request).await?;

        let tokens = stream.filter_map(|item| async move {
            match item {
                Ok(chunk) => {
                    // Usage arrives on the final chunk when the endpoint reports it.
                    if let Some(ref u) = chunk.usage {
                        tracing::debug!(
                            prompt_tokens = u.prompt_tokens,
                            completion_tokens = u.completion_tokens,
                            total_tokens = u.total_tokens,
                            "Groq chat_completion_stream usage"
                        );
                    }
                    chunk
                        .choices
                        .first()
                        .and_then(|choice| choice.delta.content.clone())
                        .filter(|content| !content.is_empty())
                        .map(Ok)
                }
                Err(e) => Some(Err(anyhow::anyhow!("Stream error: {}", e))),
            }
        });

        Ok(Box::pin(tokens))
    }
}
