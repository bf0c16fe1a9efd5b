//! Inbound request shape and its normalization rules.
//!
//! The gateway tolerates arbitrary member shapes: a request never fails
//! because a field is missing or mistyped. Fields are held as raw JSON and
//! coerced on access, so only an unparseable body is ever rejected. Unknown
//! roles collapse to assistant, non-string content collapses to empty,
//! non-array sequences to empty sequences.

use prompt::{ChatTurn, VaultSync};
use serde::Deserialize;
use serde_json::Value;

/// Raw body of `POST /api/chat`. Every field defaults to JSON null; coercion
/// stays in the accessors and [`normalize_turns`] / [`vault_facts`] instead
/// of inside serde, so a mistyped field degrades instead of erroring.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Value,
    /// Opaque caller identity. Logged (redacted) only; carries no authorization.
    #[serde(default)]
    pub wallet_address: Value,
    #[serde(default)]
    pub memory_vault: Value,
    #[serde(default)]
    pub ipfs_status: Value,
}

impl ChatRequest {
    /// Sync state reported by the caller for this turn. Non-string values
    /// collapse to locked.
    pub fn sync_state(&self) -> VaultSync {
        VaultSync::from_status(self.ipfs_status.as_str())
    }

    /// Conversation history with roles and content coerced per the gateway's
    /// permissive-input rules. A non-array `messages` is an empty history.
    pub fn turns(&self) -> Vec<ChatTurn> {
        normalize_turns(self.messages.as_array().map(Vec::as_slice).unwrap_or_default())
    }

    /// Vault facts with non-string `fact` values collapsed to empty strings.
    /// A non-array vault has no facts.
    pub fn facts(&self) -> Vec<String> {
        vault_facts(self.memory_vault.as_array().map(Vec::as_slice))
    }

    pub fn wallet(&self) -> Option<&str> {
        self.wallet_address.as_str()
    }
}

/// Coerces raw message values into [`ChatTurn`]s.
///
/// Role `"user"` maps to user; any other value, including absent or
/// non-string, maps to assistant. Non-string content maps to the empty string.
pub fn normalize_turns(raw: &[Value]) -> Vec<ChatTurn> {
    raw.iter()
        .map(|m| {
            let content = m
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match m.get("role").and_then(Value::as_str) {
                Some("user") => ChatTurn::user(content),
                _ => ChatTurn::assistant(content),
            }
        })
        .collect()
}

/// Extracts the `fact` string of each vault entry, collapsing missing or
/// non-string facts to empty strings. Absent vault yields no facts.
pub fn vault_facts(raw: Option<&[Value]>) -> Vec<String> {
    raw.unwrap_or_default()
        .iter()
        .map(|entry| {
            entry
                .get("fact")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}
