//! Core traits and types for docchat
//!
//! This crate defines the fundamental traits and types used across the docchat system.
//! It provides capability-facing interfaces for chat models, embedders, vector stores,
//! retrievers and document loaders, so every stage of the pipeline can be swapped in tests.

pub mod document_loader;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod types;
pub mod vector_store;


pub use document_loader::{DocumentLoader, IndexingConfig};
pub use embedding::Embedder;
pub use error::{Error, Result};
pub use llm::{ChatModel, GenerationConfig, GenerationResult};
pub use rag::{ChainConfig, ChainOutput, Retriever};
pub use types::*;
pub use vector_store::{SearchConfig, SearchResult, VectorDocument, VectorStore};
