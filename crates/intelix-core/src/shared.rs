//! Shared types used across all Intelix crates.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::emotion::EmotionCategory;

/// Per-request plugin switches. Mirrors the wire-level `plugins` object so
/// the gateway can deserialize it directly.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PluginFlags {
    /// Feed the conversation history buffer and use it as provider context.
    #[serde(default)]
    pub history: bool,
    /// Attach an emotion classification and a canned emotional response.
    #[serde(default)]
    pub emotion: bool,
}

/// Engine reply for one utterance: the answer text plus the optional
/// emotion attachment (present only when the emotion plugin is on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Answer text; never empty (the engine falls back to a fixed sentence).
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_response: Option<String>,
}

/// Global application configuration (gateway identity + answer provider).
/// Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown in status output.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Answer-provider mode (e.g. "mock", "http", "scrape").
    pub provider_mode: String,
    /// Endpoint the live provider queries. Unused in mock mode.
    #[serde(default)]
    pub provider_url: Option<String>,
    /// Deadline for a single provider call, in seconds.
    pub provider_timeout_secs: u64,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env
    /// `INTELIX_CONFIG` path > `config/gateway.toml` > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("INTELIX_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Intelix Gateway")?
            .set_default("port", 5000_i64)?
            .set_default("provider_mode", "mock")?
            .set_default("provider_timeout_secs", 10_i64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("INTELIX").separator("__"))
            .build()?;

        built.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_flags_default_to_disabled() {
        let flags: PluginFlags = serde_json::from_str("{}").unwrap();
        assert!(!flags.history);
        assert!(!flags.emotion);
    }

    #[test]
    fn plugin_flags_parse_partial_objects() {
        let flags: PluginFlags = serde_json::from_str(r#"{"history": true}"#).unwrap();
        assert!(flags.history);
        assert!(!flags.emotion);
    }

    #[test]
    fn chat_reply_omits_absent_emotion_fields() {
        let reply = ChatReply {
            response: "hello".to_string(),
            emotion: None,
            emotion_response: None,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "response": "hello" }));
    }
}
