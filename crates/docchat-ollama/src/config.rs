//! Ollama configuration

use docchat_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_CHAT_MODEL: &str = "llama2-uncensored:7b-chat";
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Ollama client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

impl OllamaConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let chat_model =
            lookup("OLLAMA_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let embed_model =
            lookup("OLLAMA_EMBED_MODEL").unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string());

        let timeout_secs = match lookup("OLLAMA_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Configuration(format!("OLLAMA_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let temperature = match lookup("OLLAMA_TEMPERATURE") {
            Some(raw) => Some(raw.trim().parse::<f32>().map_err(|_| {
                Error::Configuration(format!("OLLAMA_TEMPERATURE must be a number, got '{}'", raw))
            })?),
            None => None,
        };

        Ok(Self {
            base_url,
            chat_model,
            embed_model,
            timeout_secs,
            temperature,
        })
    }

    /// Create configuration with explicit values
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

/// Accepts `host:port` as well as full URLs, the way the Ollama CLI does.
fn normalize_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let parsed = url::Url::parse(&candidate)
        .map_err(|e| Error::Configuration(format!("invalid OLLAMA_HOST '{}': {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(candidate.trim_end_matches('/').to_string()),
        other => Err(Error::Configuration(format!(
            "OLLAMA_HOST must use http or https, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = OllamaConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_HOST);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.embed_model, DEFAULT_EMBED_MODEL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_host_without_scheme() {
        let config =
            OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_HOST", "10.0.0.5:11434/")])).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:11434");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_TIMEOUT_SECS", "soon")])).is_err());
        assert!(OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_TEMPERATURE", "warm")])).is_err());
        assert!(OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_HOST", "ftp://models")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = OllamaConfig::from_lookup(lookup_from(&[
            ("OLLAMA_CHAT_MODEL", "llama3"),
            ("OLLAMA_EMBED_MODEL", "mxbai-embed-large"),
            ("OLLAMA_TEMPERATURE", "0.2"),
        ]))
        .unwrap();
        assert_eq!(config.chat_model, "llama3");
        assert_eq!(config.embed_model, "mxbai-embed-large");
        assert_eq!(config.temperature, Some(0.2));
    }
}
