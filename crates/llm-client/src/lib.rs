//! # Model provider abstraction
//!
//! Defines the capability the gateway retries against: [`ModelProvider`] opens
//! a [`ModelSession`] for one credential, and the session streams a completion
//! for a system prompt plus conversation turns. Both traits are object-safe so
//! the fail-over loop and tests can work with boxed providers.
//!
//! The Groq implementation lives in [`GroqProvider`]; nothing in the gateway
//! depends on provider-specific detail beyond this shape.

use std::pin::Pin;

use anyhow::Result;
use async_trait::async_trait;
use futures::Stream;
use groq_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatTurn, Role};

mod groq_llm;

pub use groq_llm::GroqProvider;

/// Incremental completion output in model emission order; an `Err` item ends
/// the stream.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// One live upstream connection bound to a single credential.
#[async_trait]
pub trait ModelSession: Send + Sync {
    /// Issues the streaming completion call. Returns the live token stream, or
    /// fails when the call cannot be initiated.
    async fn complete_streaming(
        &self,
        system_prompt: &str,
        turns: &[ChatTurn],
    ) -> Result<TokenStream>;
}

/// Opens sessions against the downstream provider, one credential at a time.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn open(&self, credential: &str) -> Result<Box<dyn ModelSession>>;
}

/// Converts a single [`ChatTurn`] into the OpenAI-compatible message format.
fn turn_to_message(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage> {
    let content = turn.content.clone();
    let message: ChatCompletionRequestMessage = match turn.role {
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(message)
}
