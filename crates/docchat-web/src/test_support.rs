//! Offline stand-ins for the model server and the PDF library

use async_trait::async_trait;
use std::path::Path;

use docchat_core::{
    ChatMessage, ChatModel, DocumentLoader, Embedder, GenerationConfig, GenerationResult, Result,
};

/// Reads files as plain UTF-8 text
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn load(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Counts letters per alphabet position; enough to rank overlapping words
pub struct WordEmbedder;

impl WordEmbedder {
    fn vector_for(text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; 26];
        for c in text.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
            embedding[(c as u8 - b'a') as usize] += 1.0;
        }
        embedding
    }
}

#[async_trait]
impl Embedder for WordEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector_for(text))
    }

    fn model_id(&self) -> &str {
        "word-embedder"
    }
}

/// Answers with the last message it was sent
pub struct EchoChatModel;

#[async_trait]
impl ChatModel for EchoChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<GenerationResult> {
        self.chat_with_config(messages, &GenerationConfig::default()).await
    }

    async fn chat_with_config(
        &self,
        messages: &[ChatMessage],
        _config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        Ok(GenerationResult {
            text: format!("You asked: {}", last),
            model_id: "echo".to_string(),
            tokens_used: None,
        })
    }

    fn model_id(&self) -> &str {
        "echo"
    }
}
