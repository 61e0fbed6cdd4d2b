//! Vector store implementations

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use docchat_core::{Error, Result, SearchConfig, SearchResult, VectorDocument, VectorStore};

#[derive(Default)]
struct StoredDocuments {
    documents: Vec<VectorDocument>,
    positions: HashMap<String, usize>,
}

/// Local in-memory vector store implementation
///
/// A flat scan over every stored embedding; nothing is written to disk.
#[derive(Clone, Default)]
pub struct LocalVectorStore {
    inner: Arc<RwLock<StoredDocuments>>,
}

impl LocalVectorStore {
    /// Create a new local vector store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simple cosine similarity calculation
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(documents.len());
        let mut inner = self
            .inner
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        let StoredDocuments { documents: docs, positions } = &mut *inner;
        docs.reserve(documents.len());

        for document in documents {
            let id = document.id.clone();
            match positions.get(&id) {
                Some(&position) => docs[position] = document,
                None => {
                    positions.insert(id.clone(), docs.len());
                    docs.push(document);
                }
            }
            ids.push(id);
        }

        Ok(ids)
    }

    async fn search_by_vector(&self, vector: &[f32], config: &SearchConfig) -> Result<SearchResult> {
        let inner = self
            .inner
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let mut results: Vec<VectorDocument> = inner
            .documents
            .iter()
            .filter_map(|doc| {
                let embedding = doc.embedding.as_ref()?;
                let score = Self::cosine_similarity(vector, embedding);
                let mut doc_with_score = doc.clone();
                doc_with_score.score = Some(score);
                Some(doc_with_score)
            })
            .filter(|doc| match config.score_threshold {
                Some(threshold) => doc.score.unwrap_or(0.0) >= threshold,
                None => true,
            })
            .collect();

        // sort_by is stable, so equal scores keep insertion order
        results.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .partial_cmp(&a.score.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        });

        results.truncate(config.top_k);

        let total = results.len();

        Ok(SearchResult {
            documents: results,
            total,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<VectorDocument>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(inner
            .positions
            .get(id)
            .and_then(|&position| inner.documents.get(position))
            .cloned())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        inner.documents.clear();
        inner.positions.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(inner.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, embedding: Vec<f32>) -> VectorDocument {
        VectorDocument {
            id: id.to_string(),
            content: format!("content of {}", id),
            embedding: Some(embedding),
            metadata: json!({}),
            score: None,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let vec1 = vec![1.0, 0.0, 0.0];
        let vec2 = vec![1.0, 0.0, 0.0];
        let vec3 = vec![0.0, 1.0, 0.0];

        assert!((LocalVectorStore::cosine_similarity(&vec1, &vec2) - 1.0).abs() < 0.001);
        assert!((LocalVectorStore::cosine_similarity(&vec1, &vec3) - 0.0).abs() < 0.001);
        assert_eq!(LocalVectorStore::cosine_similarity(&vec1, &[1.0]), 0.0);
        assert_eq!(LocalVectorStore::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let store = LocalVectorStore::new();
        let ids = store
            .store_batch(vec![doc("a", vec![1.0, 0.0]), doc("b", vec![0.0, 1.0])])
            .await
            .unwrap();

        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.get("a").await.unwrap().is_some());
        assert!(store.get("missing").await.unwrap().is_none());

        store.store_batch(vec![doc("a", vec![0.5, 0.5])]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(
            store.get("a").await.unwrap().unwrap().embedding,
            Some(vec![0.5, 0.5])
        );

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replacing_keeps_position_and_later_inserts_resolve() {
        let store = LocalVectorStore::new();
        store
            .store_batch(vec![doc("a", vec![1.0, 0.0]), doc("b", vec![0.0, 1.0])])
            .await
            .unwrap();
        store
            .store_batch(vec![doc("c", vec![1.0, 1.0]), doc("a", vec![0.0, 1.0])])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.get("c").await.unwrap().unwrap().id, "c");

        let result = store
            .search_by_vector(&[0.0, 1.0], &SearchConfig::default())
            .await
            .unwrap();
        let ids: Vec<&str> = result.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        store.clear().await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = LocalVectorStore::new();
        store
            .store_batch(vec![
                doc("far", vec![0.0, 1.0]),
                doc("near", vec![1.0, 0.1]),
                doc("middle", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let config = SearchConfig {
            top_k: 2,
            score_threshold: None,
        };
        let result = store.search_by_vector(&[1.0, 0.0], &config).await.unwrap();

        let ids: Vec<&str> = result.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "middle"]);
        assert_eq!(result.total, 2);
        assert!(result.documents[0].score.unwrap() > result.documents[1].score.unwrap());
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = LocalVectorStore::new();
        store
            .store_batch(vec![doc("first", vec![1.0, 0.0]), doc("second", vec![2.0, 0.0])])
            .await
            .unwrap();

        let result = store
            .search_by_vector(&[1.0, 0.0], &SearchConfig::default())
            .await
            .unwrap();

        let ids: Vec<&str> = result.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_threshold_filters_results() {
        let store = LocalVectorStore::new();
        store
            .store_batch(vec![doc("same", vec![1.0, 0.0]), doc("orthogonal", vec![0.0, 1.0])])
            .await
            .unwrap();

        let config = SearchConfig {
            top_k: 10,
            score_threshold: Some(0.5),
        };
        let result = store.search_by_vector(&[1.0, 0.0], &config).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.documents[0].id, "same");
    }

    #[tokio::test]
    async fn test_empty_store_search() {
        let store = LocalVectorStore::new();
        let result = store
            .search_by_vector(&[1.0, 0.0], &SearchConfig::default())
            .await
            .unwrap();
        assert!(result.documents.is_empty());
        assert_eq!(result.total, 0);
    }
}
