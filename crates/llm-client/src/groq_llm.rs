//! Groq implementation of the provider capability: one [`GroqClient`] per
//! opened session, system prompt prepended to the converted turns.

use anyhow::Result;
use async_trait::async_trait;
use groq_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, GroqClient,
};
use prompt::ChatTurn;
use tracing::instrument;

use super::{turn_to_message, ModelProvider, ModelSession, TokenStream};

/// Opens Groq sessions. Holds the process-wide base URL and model; the
/// credential arrives per [`ModelProvider::open`] call.
#[derive(Debug, Clone)]
pub struct GroqProvider {
    base_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModelProvider for GroqProvider {
    async fn open(&self, credential: &str) -> Result<Box<dyn ModelSession>> {
        let client = GroqClient::with_base_url(credential.to_string(), self.base_url.clone());
        Ok(Box::new(GroqSession {
            client,
            model: self.model.clone(),
        }))
    }
}

struct GroqSession {
    client: GroqClient,
    model: String,
}

#[async_trait]
impl ModelSession for GroqSession {
    #[instrument(skip(self, system_prompt, turns))]
    async fn complete_streaming(
        &self,
        system_prompt: &str,
        turns: &[ChatTurn],
    ) -> Result<TokenStream> {
        let mut messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt.to_string())
                .build()?
                .into()];
        for turn in turns {
            messages.push(turn_to_message(turn)?);
        }
        self.client
            .chat_completion_stream(&self.model, messages)
            .await
    }
}
