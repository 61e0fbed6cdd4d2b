//! Deterministic stand-ins for the external services, used by the unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use docchat_core::{
    ChatMessage, ChatModel, DocumentLoader, Embedder, Error, GenerationConfig, GenerationResult,
    Result,
};

/// Reads files as UTF-8 text; files whose content starts with `BROKEN` fail
pub struct FakeLoader;

impl DocumentLoader for FakeLoader {
    fn load(&self, path: &Path) -> Result<String> {
        let text = std::fs::read_to_string(path)?;
        if text.starts_with("BROKEN") {
            return Err(Error::Ingestion("corrupt document".to_string()));
        }
        Ok(text)
    }
}

/// FakeLoader that counts how many files it was asked to load
#[derive(Default)]
pub struct CountingLoader {
    pub loads: AtomicUsize,
}

impl DocumentLoader for CountingLoader {
    fn load(&self, path: &Path) -> Result<String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        FakeLoader.load(path)
    }
}

/// Bag-of-words hashing embedder; texts sharing words get similar vectors
#[derive(Default)]
pub struct HashEmbedder {
    pub document_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
}

impl HashEmbedder {
    const DIMENSION: usize = 64;

    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; Self::DIMENSION];
        for word in text.to_lowercase().split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let idx = (hasher.finish() % Self::DIMENSION as u64) as usize;
            embedding[idx] += 1.0;
        }
        embedding
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector_for(text))
    }

    fn model_id(&self) -> &str {
        "hash-embedder"
    }
}

/// Embedder that drops the last vector of every batch
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors: Vec<Vec<f32>> = texts.iter().map(|t| HashEmbedder::vector_for(t)).collect();
        vectors.pop();
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(HashEmbedder::vector_for(text))
    }

    fn model_id(&self) -> &str {
        "short-embedder"
    }
}

/// Chat model that replays queued answers and records every request
#[derive(Default)]
pub struct ScriptedChatModel {
    answers: Mutex<VecDeque<String>>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChatModel {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<GenerationResult> {
        self.chat_with_config(messages, &GenerationConfig::default()).await
    }

    async fn chat_with_config(
        &self,
        messages: &[ChatMessage],
        _config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let text = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or_else(|| format!("echo: {}", messages.last().map(|m| m.content.as_str()).unwrap_or("")));

        Ok(GenerationResult {
            text,
            model_id: "scripted".to_string(),
            tokens_used: None,
        })
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

/// A one-page PDF showing `text` in Helvetica, with a valid cross-reference table
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref = pdf.len();
    let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        table.push_str(&format!("{:010} 00000 n \n", offset));
    }
    table.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref
    ));
    pdf.extend_from_slice(table.as_bytes());
    pdf
}
