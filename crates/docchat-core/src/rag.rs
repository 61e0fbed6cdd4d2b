//! Conversational retrieval traits and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ChatMessage, Result, SearchConfig, VectorDocument};

/// Configuration for the conversational retrieval chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub search: SearchConfig,
    /// Rewrite follow-up questions into standalone questions before retrieval
    pub rephrase_question: bool,
    pub return_source_documents: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            rephrase_question: true,
            return_source_documents: false,
        }
    }
}

/// Output of one question/answer round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainOutput {
    pub question: String,
    /// The question actually used for retrieval
    pub generated_question: String,
    pub answer: String,
    pub chat_history: Vec<ChatMessage>,
    pub source_documents: Vec<VectorDocument>,
}

/// Trait for anything that can fetch relevant chunks for a query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve relevant documents for a query
    async fn retrieve(&self, query: &str, config: &SearchConfig) -> Result<Vec<VectorDocument>>;

    /// Number of documents available to the retriever
    async fn len(&self) -> Result<usize>;
}
