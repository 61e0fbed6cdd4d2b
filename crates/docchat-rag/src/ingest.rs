//! Directory scanning and text ingestion

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docchat_core::{DocumentLoader, Error, IngestPolicy, IngestReport, Result, SkippedFile};

/// Raw text gathered from the document directory
#[derive(Debug, Clone, Default)]
pub struct IngestedText {
    pub text: String,
    pub report: IngestReport,
}

/// List the files of the document directory in file-name order.
///
/// The directory is created when missing. Hidden files and subdirectories are
/// not part of the document set.
pub async fn scan_pdf_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !entry.file_type().await?.is_file() {
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}

/// Extract and concatenate the text of every file in `dir`
pub async fn ingest_directory(
    dir: &Path,
    loader: Arc<dyn DocumentLoader>,
    policy: IngestPolicy,
) -> Result<IngestedText> {
    let files = scan_pdf_directory(dir).await?;
    let mut ingested = IngestedText::default();

    for path in files {
        match load_file(&path, loader.clone()).await {
            Ok(text) => {
                tracing::debug!(path = %path.display(), characters = text.chars().count(), "extracted text");
                ingested.text.push_str(&text);
                ingested.report.files_read += 1;
            }
            Err(reason) => match policy {
                IngestPolicy::FailFast => {
                    tracing::error!(path = %path.display(), %reason, "failed to extract text");
                    return Err(Error::Ingestion(format!("{}: {}", path.display(), reason)));
                }
                IngestPolicy::SkipInvalid => {
                    tracing::warn!(path = %path.display(), %reason, "skipping unreadable file");
                    ingested.report.files_skipped.push(SkippedFile {
                        path: path.display().to_string(),
                        reason,
                    });
                }
            },
        }
    }

    ingested.report.characters = ingested.text.chars().count();
    Ok(ingested)
}

/// Run the blocking loader off the executor; panics inside the PDF library
/// surface as a failure reason.
async fn load_file(
    path: &Path,
    loader: Arc<dyn DocumentLoader>,
) -> std::result::Result<String, String> {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || loader.load(&owned)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(Error::Ingestion(reason))) => Err(reason),
        Ok(Err(other)) => Err(other.to_string()),
        Err(join_error) => Err(format!("extraction aborted: {}", join_error)),
    }
}
