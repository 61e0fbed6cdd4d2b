//! Ollama integration for docchat
//!
//! This crate provides the Ollama implementation of the ChatModel and Embedder traits.

mod client;
mod config;


pub use client::OllamaClient;
pub use config::{
    DEFAULT_CHAT_MODEL, DEFAULT_EMBED_MODEL, DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, OllamaConfig,
};

// Re-export core types for convenience
pub use docchat_core::{ChatModel, Embedder, Error, GenerationConfig, GenerationResult, Result};
