//! Ordered API key pool: the only process-lifetime state of the gateway.
//!
//! Built once at startup from config and never mutated, so concurrent
//! requests share it behind an `Arc` without locking.

/// Ordered credential list for the fail-over loop. Construction trims and
/// drops blank entries; order of the survivors is preserved.
#[derive(Debug, Clone)]
pub struct ApiKeyPool {
    keys: Vec<String>,
}

impl ApiKeyPool {
    pub fn new(candidates: Vec<String>) -> Self {
        let keys = candidates
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    /// True when no usable key survived filtering; every request must then
    /// fail fast with a configuration error.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Keys in fail-over order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
