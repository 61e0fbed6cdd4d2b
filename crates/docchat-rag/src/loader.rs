//! PDF text extraction

use std::fs::File;
use std::io::Read;
use std::path::Path;

use docchat_core::{DocumentLoader, Error, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Loads PDF files with `pdf-extract`
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<String> {
        let mut header = [0u8; 5];
        let mut file = File::open(path)?;
        let read = file.read(&mut header)?;
        if read < PDF_MAGIC.len() || header != PDF_MAGIC {
            return Err(Error::Ingestion("not a PDF file".to_string()));
        }

        pdf_extract::extract_text(path).map_err(|e| Error::Ingestion(e.to_string()))
    }
}
