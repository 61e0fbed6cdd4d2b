//! Ollama client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use docchat_core::{
    ChatMessage, ChatModel, Embedder, Error, GenerationConfig, GenerationResult, Result,
};

use crate::config::OllamaConfig;

/// Ollama client serving both chat completions and embeddings
#[derive(Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new Ollama client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OllamaConfig::from_env()?;
        Self::new(config)
    }

    /// Set the chat model to use
    pub fn with_chat_model(mut self, model_id: impl Into<String>) -> Self {
        self.config.chat_model = model_id.into();
        self
    }

    /// Set the embedding model to use
    pub fn with_embed_model(mut self, model_id: impl Into<String>) -> Self {
        self.config.embed_model = model_id.into();
        self
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// List the models installed on the server
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Ollama server answered {} for {}",
                response.status(),
                url
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check that the server is reachable and warn about missing models
    pub async fn ping(&self) -> Result<()> {
        let models = self.list_models().await?;

        for wanted in [&self.config.chat_model, &self.config.embed_model] {
            if !models.iter().any(|m| model_matches(m, wanted)) {
                tracing::warn!(model = %wanted, "model is not installed on the Ollama server");
            }
        }

        Ok(())
    }

    fn default_generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model_id: self.config.chat_model.clone(),
            temperature: self.config.temperature,
            timeout: Duration::from_secs(self.config.timeout_secs),
            ..Default::default()
        }
    }

    /// Perform the actual chat request
    async fn perform_chat(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request_body = ChatRequest {
            model: &config.model_id,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: config.temperature,
                num_predict: config.max_tokens,
                stop: config.stop_sequences.clone(),
            },
        };

        let url = format!("{}/api/chat", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::ChatModel(format!(
                "Ollama chat request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let text = data.message.content.trim().to_string();
        if text.is_empty() {
            tracing::debug!(model = %config.model_id, "model returned an empty reply");
        }

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
            tokens_used: data.eval_count,
        })
    }

    /// Perform the actual embedding request
    async fn perform_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request_body = EmbedRequest {
            model: &self.config.embed_model,
            input: texts,
        };

        let url = format!("{}/api/embed", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "Ollama embed request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if data.embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                data.embeddings.len()
            )));
        }

        Ok(data.embeddings)
    }
}

fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

/// Ollama reports `name:tag`; a bare name means `:latest`.
fn model_matches(installed: &str, wanted: &str) -> bool {
    if installed == wanted {
        return true;
    }
    !wanted.contains(':') && installed == format!("{}:latest", wanted)
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<GenerationResult> {
        let config = self.default_generation_config();
        self.chat_with_config(messages, &config).await
    }

    async fn chat_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        if messages.is_empty() {
            return Err(Error::InvalidInput("chat needs at least one message".to_string()));
        }

        let chat_future = self.perform_chat(messages, config);

        match timeout(config.timeout, chat_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("Chat request timed out".to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let limit = Duration::from_secs(self.config.timeout_secs);
        match timeout(limit, self.perform_embed(texts)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("Embedding request timed out".to_string())),
        }
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_documents(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::Embedding("empty embedding response".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.config.embed_model
    }
}
