//! Runtime configuration

use serde::{Deserialize, Serialize};

/// Configuration for the external LLM gateway.
///
/// A missing or blank API key is not an error: the gateway runs with no
/// backend and every capability returns its defined fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: Option<String>,
    pub system_prompt: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            api_base_url: None,
            system_prompt: None,
            timeout_secs: 60,
        }
    }
}

impl AiConfig {
    /// Build from `FINROOTS_AI_*` environment variables, falling back to
    /// defaults field by field
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("FINROOTS_AI_ENABLED")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.enabled),
            api_key: std::env::var("FINROOTS_AI_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("FINROOTS_AI_MODEL").unwrap_or(defaults.model),
            api_base_url: std::env::var("FINROOTS_AI_BASE_URL").ok(),
            system_prompt: None,
            timeout_secs: std::env::var("FINROOTS_AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// True when a call to the external service can be attempted at all
    pub fn is_usable(&self) -> bool {
        self.enabled && self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_usable() {
        let config = AiConfig::default();
        assert!(config.enabled);
        assert!(!config.is_usable());
    }

    #[test]
    fn test_usable_needs_key_and_enabled() {
        let mut config = AiConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(config.is_usable());
        config.enabled = false;
        assert!(!config.is_usable());
    }
}
