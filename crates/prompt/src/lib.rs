//! # Prompt
//!
//! Formats the per-request context into the system prompt sent to the model.
//!
//! ## Pieces
//!
//! - [`ChatTurn`] / [`Role`]: one element of the conversation history, one-to-one
//!   with OpenAI Chat Completions API `role` values (minus `system`, which the
//!   gateway owns).
//! - [`render_vault`]: memory-vault facts as a bulleted text block.
//! - [`build_system_prompt`]: the sync-gated system prompt. The two branches are
//!   fully disjoint: the locked branch never sees the vault text.
//!
//! ## Usage
//!
//! Used by `kinetic-gateway` when assembling an upstream request, and by
//! `llm-client` for the message conversion at the provider boundary.

/// Role of a conversation turn, one-to-one with API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// End-user message (API `role: "user"`).
    User,
    /// Model reply (API `role: "assistant"`).
    Assistant,
}

/// A single conversation turn, one element of the upstream `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Whether the caller reported its vault as synced this turn.
///
/// `Connected` is the only state that makes the vault visible to the model;
/// every other reported value collapses to `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultSync {
    Connected,
    Locked,
}

/// Reported sync value that unlocks vault injection.
pub const SYNC_CONNECTED: &str = "connected";

impl VaultSync {
    /// Maps the caller-reported status string onto the two sync states.
    /// Absent and unrecognized values are both `Locked`.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some(SYNC_CONNECTED) => VaultSync::Connected,
            _ => VaultSync::Locked,
        }
    }
}

/// System prompt for the locked state: no identity data, refuse personal context.
pub const LOCKED_PROMPT: &str =
    "VAULT_LOCKED. You have no identity data. Refuse to discuss user-specific state.";

/// Renders vault facts as a bulleted block: `- <fact>` per line, newline-joined.
/// No facts renders to the empty string.
pub fn render_vault<I, S>(facts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    facts
        .into_iter()
        .map(|fact| format!("- {}", fact.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the system prompt for one request.
///
/// Pure function of the sync state and the rendered vault text. When locked,
/// `vault_text` is ignored entirely so vault content cannot leak into the
/// prompt regardless of what the caller supplied.
pub fn build_system_prompt(sync: VaultSync, vault_text: &str) -> String {
    match sync {
        VaultSync::Connected => format!(
            "You are KINETIC. DECRYPTED_VAULT: {vault_text}\n\
             - Respond in fluid, natural prose.\n\
             - Do not mention the vault contents explicitly.\n\
             - If identity is known, address the user naturally.\n\
             - For lists, use bold titles and double new lines."
        ),
        VaultSync::Locked => LOCKED_PROMPT.to_string(),
    }
}
