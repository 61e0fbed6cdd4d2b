//! Document loading trait and indexing configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Configuration for chunking and indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separator: String,
    pub batch_size: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separator: "\n".to_string(),
            batch_size: 32,
        }
    }
}

/// Trait for turning a file on disk into plain text
///
/// Loading is blocking; callers run it off the async executor.
pub trait DocumentLoader: Send + Sync {
    /// Extract the text of every page of the file, concatenated in page order
    fn load(&self, path: &Path) -> Result<String>;
}
