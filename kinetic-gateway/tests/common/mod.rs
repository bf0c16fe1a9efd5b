//! Shared test doubles: a scripted in-memory provider standing in for the
//! downstream model API. No network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use kinetic_gateway::GatewayConfig;
use llm_client::{ModelProvider, ModelSession, TokenStream};
use prompt::ChatTurn;

/// What one credential does when tried.
#[derive(Clone)]
pub enum Script {
    /// `open` itself fails.
    FailOpen(&'static str),
    /// Stream initiates but its first item is an error.
    FailFirstItem(&'static str),
    /// `complete_streaming` never returns (until the attempt timeout fires).
    Hang,
    /// Stream the given fragments, then end.
    Stream(Vec<&'static str>),
}

/// Provider whose behavior per credential is scripted up front. Records the
/// order credentials were opened in and the system prompts/turns it was
/// called with.
pub struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    pub opened: Arc<Mutex<Vec<String>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub turns_seen: Arc<Mutex<Vec<Vec<ChatTurn>>>>,
}

impl ScriptedProvider {
    pub fn new(scripts: &[(&str, Script)]) -> Self {
        Self {
            scripts: scripts
                .iter()
                .map(|(k, s)| (k.to_string(), s.clone()))
                .collect(),
            opened: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            turns_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn opened_keys(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn seen_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn open(&self, credential: &str) -> anyhow::Result<Box<dyn ModelSession>> {
        self.opened.lock().unwrap().push(credential.to_string());
        match self.scripts.get(credential) {
            Some(Script::FailOpen(message)) => anyhow::bail!("{}", message),
            Some(script) => Ok(Box::new(ScriptedSession {
                script: script.clone(),
                prompts: self.prompts.clone(),
                turns_seen: self.turns_seen.clone(),
            })),
            None => anyhow::bail!("unscripted credential"),
        }
    }
}

struct ScriptedSession {
    script: Script,
    prompts: Arc<Mutex<Vec<String>>>,
    turns_seen: Arc<Mutex<Vec<Vec<ChatTurn>>>>,
}

#[async_trait]
impl ModelSession for ScriptedSession {
    async fn complete_streaming(
        &self,
        system_prompt: &str,
        turns: &[ChatTurn],
    ) -> anyhow::Result<TokenStream> {
        self.prompts.lock().unwrap().push(system_prompt.to_string());
        self.turns_seen.lock().unwrap().push(turns.to_vec());
        match &self.script {
            Script::FailOpen(message) => anyhow::bail!("{}", message),
            Script::FailFirstItem(message) => {
                let message = message.to_string();
                Ok(Box::pin(futures::stream::once(async move {
                    Err(anyhow::anyhow!("{}", message))
                })))
            }
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(600)).await;
                anyhow::bail!("hung attempt woke up")
            }
            Script::Stream(fragments) => {
                let fragments: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
                Ok(Box::pin(futures::stream::iter(
                    fragments.into_iter().map(Ok),
                )))
            }
        }
    }
}

/// Config over the given keys with a short attempt timeout; never leaves the
/// process.
pub fn test_config(keys: &[&str]) -> GatewayConfig {
    GatewayConfig {
        api_keys: keys.iter().map(|k| k.to_string()).collect(),
        base_url: "http://127.0.0.1:0/v1".to_string(),
        model: "test-model".to_string(),
        attempt_timeout_secs: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        log_file: "logs/test.log".to_string(),
    }
}

/// Drains a token stream into one string, panicking on error items.
pub async fn collect(mut stream: TokenStream) -> String {
    let mut out = String::new();
    while let Some(item) = stream.next().await {
        out.push_str(&item.expect("token"));
    }
    out
}
