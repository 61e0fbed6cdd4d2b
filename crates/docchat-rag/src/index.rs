//! Embedding chunks into a searchable index

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use docchat_core::{
    Embedder, Error, IndexingConfig, Result, Retriever, SearchConfig, VectorDocument, VectorStore,
};

use crate::vector_store::LocalVectorStore;

/// Chunks embedded into a [`LocalVectorStore`], queried through the same embedder
pub struct VectorIndex {
    store: LocalVectorStore,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Embed `chunks` in batches and store them in insertion order.
    ///
    /// An empty chunk list produces an empty index without calling the embedder.
    pub async fn from_texts(
        chunks: &[String],
        source: &str,
        embedder: Arc<dyn Embedder>,
        config: &IndexingConfig,
    ) -> Result<Self> {
        let store = LocalVectorStore::new();
        let source_hash = format!("{:x}", md5::compute(source.as_bytes()));
        let batch_size = config.batch_size.max(1);

        for (batch_number, batch) in chunks.chunks(batch_size).enumerate() {
            let embeddings = embedder.embed_documents(batch).await?;
            if embeddings.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "embedder returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                )));
            }

            let offset = batch_number * batch_size;
            let documents = batch
                .iter()
                .zip(embeddings)
                .enumerate()
                .map(|(i, (chunk, embedding))| {
                    let index = offset + i;
                    VectorDocument {
                        id: format!("{}-{}", source_hash, index),
                        content: chunk.clone(),
                        embedding: Some(embedding),
                        metadata: json!({
                            "source": source,
                            "chunk_index": index,
                            "chunk_size": chunk.chars().count(),
                        }),
                        score: None,
                    }
                })
                .collect();

            store.store_batch(documents).await?;
        }

        tracing::debug!(chunks = chunks.len(), model = embedder.model_id(), "vector index built");

        Ok(Self { store, embedder })
    }

    pub fn store(&self) -> &LocalVectorStore {
        &self.store
    }
}

#[async_trait]
impl Retriever for VectorIndex {
    async fn retrieve(&self, query: &str, config: &SearchConfig) -> Result<Vec<VectorDocument>> {
        if self.store.count().await? == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_query(query).await?;
        let result = self.store.search_by_vector(&query_embedding, config).await?;
        Ok(result.documents)
    }

    async fn len(&self) -> Result<usize> {
        self.store.count().await
    }
}
