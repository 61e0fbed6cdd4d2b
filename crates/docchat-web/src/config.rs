//! Web front-end configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use docchat_core::IngestPolicy;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_PDF_DIR: &str = "pdf_files";
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;

/// Server, ingestion and session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub bind: SocketAddr,
    pub pdf_dir: PathBuf,
    /// Image shown at the top of the sidebar
    pub logo: Option<PathBuf>,
    pub ingest_policy: IngestPolicy,
    pub session_idle_timeout: Duration,
    pub page: PageText,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            pdf_dir: PathBuf::from(DEFAULT_PDF_DIR),
            logo: None,
            ingest_policy: IngestPolicy::default(),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
            page: PageText::default(),
        }
    }
}

/// Static text of the chat page. Sidebar sections are Markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub title: String,
    pub header: String,
    pub input_label: String,
    pub sidebar_welcome: String,
    pub sidebar_about: String,
    pub sidebar_how_to: String,
    pub footer_label: String,
    pub footer_url: Option<String>,
}

impl Default for PageText {
    fn default() -> Self {
        Self {
            title: "HR in PDFs Chatbot".to_string(),
            header: "🙌 HR Bot".to_string(),
            input_label: "Ask any question related to our HR section .. ✍️📝".to_string(),
            sidebar_welcome: "## Welcome HR Bot".to_string(),
            sidebar_about: "## Meet the HR Bot!\n\
                An HR chatbot is a virtual assistant representing a company's HR department.\n\
                It harnesses the power of AI to converse with employees and automate HR operations like\n\
                recruitment, onboarding, driving and enhancing the overall employee experience digitally."
                .to_string(),
            sidebar_how_to: "## How to use\n\
                1. Ask HR question\n\
                2. Wait for the analysis to complete\n\
                3. Enjoy the feedback 🤗\n"
                .to_string(),
            footer_label: "docchat".to_string(),
            footer_url: None,
        }
    }
}
