//! Gateway configuration, loaded once from environment variables.

use anyhow::Result;
use std::env;

/// Default OpenAI-compatible inference endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Numbered fallback key slots scanned after `GROQ_API_KEY`
/// (`GROQ_API_KEY_1` .. `GROQ_API_KEY_8`). Gaps are skipped, not treated as
/// the end of the list.
pub const EXTRA_KEY_SLOTS: usize = 8;

/// Process-wide gateway configuration. Immutable after load; changing keys
/// requires a restart.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Candidate API keys in fail-over order, as found in the environment.
    /// Blank filtering happens in [`crate::keys::ApiKeyPool`].
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    /// Bound on one credential attempt (session open + stream initiation).
    pub attempt_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub log_file: String,
}

impl GatewayConfig {
    /// Loads configuration from environment variables, applying defaults for
    /// everything except the keys. An empty key list is not an error here:
    /// requests fail fast with a configuration error instead, and the `keys`
    /// subcommand still works for diagnosis.
    pub fn load() -> Result<Self> {
        let api_keys = read_api_keys();
        let base_url =
            env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let attempt_timeout_secs = env::var("ATTEMPT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/kinetic-gateway.log".to_string());

        Ok(Self {
            api_keys,
            base_url,
            model,
            attempt_timeout_secs,
            host,
            port,
            log_file,
        })
    }
}

/// Reads `GROQ_API_KEY`, then the numbered slots, in order.
fn read_api_keys() -> Vec<String> {
    let mut keys = Vec::new();
    if let Ok(key) = env::var("GROQ_API_KEY") {
        keys.push(key);
    }
    for slot in 1..=EXTRA_KEY_SLOTS {
        if let Ok(key) = env::var(format!("GROQ_API_KEY_{slot}")) {
            keys.push(key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_key_vars() {
        env::remove_var("GROQ_API_KEY");
        for slot in 1..=EXTRA_KEY_SLOTS {
            env::remove_var(format!("GROQ_API_KEY_{slot}"));
        }
    }

    /// **Test: defaults apply when nothing but keys is set.**
    #[test]
    #[serial]
    fn load_applies_defaults() {
        clear_key_vars();
        env::set_var("GROQ_API_KEY", "gsk_test");
        env::remove_var("GROQ_BASE_URL");
        env::remove_var("AI_MODEL");
        env::remove_var("ATTEMPT_TIMEOUT_SECS");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("LOG_FILE");

        let config = GatewayConfig::load().expect("load");
        assert_eq!(config.api_keys, vec!["gsk_test"]);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.attempt_timeout_secs, 30);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_file, "logs/kinetic-gateway.log");
    }

    /// **Test: numbered slots are read in order and gaps are skipped.**
    #[test]
    #[serial]
    fn load_reads_numbered_slots_in_order() {
        clear_key_vars();
        env::set_var("GROQ_API_KEY", "gsk_primary");
        env::set_var("GROQ_API_KEY_2", "gsk_backup_two");
        env::set_var("GROQ_API_KEY_5", "gsk_backup_five");

        let config = GatewayConfig::load().expect("load");
        assert_eq!(
            config.api_keys,
            vec!["gsk_primary", "gsk_backup_two", "gsk_backup_five"]
        );
        clear_key_vars();
    }

    /// **Test: no key vars at all loads an empty list, not an error.**
    #[test]
    #[serial]
    fn load_without_keys_is_ok_with_empty_list() {
        clear_key_vars();
        let config = GatewayConfig::load().expect("load");
        assert!(config.api_keys.is_empty());
    }

    #[test]
    #[serial]
    fn load_overrides_from_env() {
        clear_key_vars();
        env::set_var("GROQ_API_KEY", "gsk_test");
        env::set_var("GROQ_BASE_URL", "http://127.0.0.1:9999/v1");
        env::set_var("AI_MODEL", "llama-guard");
        env::set_var("ATTEMPT_TIMEOUT_SECS", "5");
        env::set_var("PORT", "9000");

        let config = GatewayConfig::load().expect("load");
        assert_eq!(config.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(config.model, "llama-guard");
        assert_eq!(config.attempt_timeout_secs, 5);
        assert_eq!(config.port, 9000);

        env::remove_var("GROQ_BASE_URL");
        env::remove_var("AI_MODEL");
        env::remove_var("ATTEMPT_TIMEOUT_SECS");
        env::remove_var("PORT");
        clear_key_vars();
    }
}
