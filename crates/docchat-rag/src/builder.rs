//! Ingest, split and embed the document directory in one pass

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docchat_core::{DocumentLoader, Embedder, IndexingConfig, IngestPolicy, IngestReport, Result};

use crate::index::VectorIndex;
use crate::ingest::ingest_directory;
use crate::splitter::TextSplitter;

/// What one index build read and produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildSummary {
    pub report: IngestReport,
    pub chunks: usize,
}

/// Everything needed to turn the document directory into a [`VectorIndex`]
pub struct IndexBuilder {
    pdf_dir: PathBuf,
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
    config: IndexingConfig,
    policy: IngestPolicy,
}

impl IndexBuilder {
    pub fn new(
        pdf_dir: impl Into<PathBuf>,
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn Embedder>,
        config: IndexingConfig,
    ) -> Result<Self> {
        let splitter = TextSplitter::new(&config)?;
        Ok(Self {
            pdf_dir: pdf_dir.into(),
            loader,
            embedder,
            splitter,
            config,
            policy: IngestPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: IngestPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    pub fn policy(&self) -> IngestPolicy {
        self.policy
    }

    /// Read every file, split the text and embed the chunks
    pub async fn build(&self) -> Result<(VectorIndex, BuildSummary)> {
        let ingested = ingest_directory(&self.pdf_dir, self.loader.clone(), self.policy).await?;
        let chunks = self.splitter.split_text(&ingested.text);

        let source = self.pdf_dir.display().to_string();
        let index =
            VectorIndex::from_texts(&chunks, &source, self.embedder.clone(), &self.config).await?;

        tracing::info!(
            dir = %source,
            files = ingested.report.files_read,
            skipped = ingested.report.files_skipped.len(),
            chunks = chunks.len(),
            "document index ready"
        );

        Ok((
            index,
            BuildSummary {
                report: ingested.report,
                chunks: chunks.len(),
            },
        ))
    }
}
