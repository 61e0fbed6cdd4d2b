//! Document ingestion and conversational retrieval for docchat
//!
//! This crate turns a directory of PDFs into an in-memory vector index and
//! answers questions over it with a conversational retrieval chain.

mod builder;
mod chain;
mod index;
mod ingest;
mod loader;
mod memory;
mod session;
mod splitter;
mod vector_store;

#[cfg(test)]
mod test_support;


pub use builder::{BuildSummary, IndexBuilder};
pub use chain::ConversationalRetrievalChain;
pub use index::VectorIndex;
pub use ingest::{IngestedText, ingest_directory, scan_pdf_directory};
pub use loader::PdfLoader;
pub use memory::ConversationBufferMemory;
pub use session::{AskOutcome, ChatSession, NOT_INITIALIZED_WARNING, SessionState};
pub use splitter::TextSplitter;
pub use vector_store::LocalVectorStore;

// Re-export core types for convenience
pub use docchat_core::{
    ChainConfig, ChainOutput, ChatMessage, ChatModel, ChatRole, DocumentLoader, Embedder, Error,
    IndexingConfig, IngestPolicy, IngestReport, Result, Retriever, SearchConfig, SearchResult,
    VectorDocument, VectorStore,
};
