//! Embedding model trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text embedding backends
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of document chunks, one vector per input, in input order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding model ID being used
    fn model_id(&self) -> &str;
}
