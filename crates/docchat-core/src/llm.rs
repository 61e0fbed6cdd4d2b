//! Chat model trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{ChatMessage, Result};

/// Configuration for a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop_sequences: Vec<String>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "llama2-uncensored:7b-chat".to_string(),
            temperature: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Result of a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for chat model backends (e.g., Ollama)
///
/// Implementations receive the full message list for every call; they keep no
/// conversation state of their own.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one chat completion with the model's default configuration
    async fn chat(&self, messages: &[ChatMessage]) -> Result<GenerationResult>;

    /// Run one chat completion with an explicit configuration
    async fn chat_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
