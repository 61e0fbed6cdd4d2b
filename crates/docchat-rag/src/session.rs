//! Per-session conversation state

use chrono::{DateTime, Utc};
use std::sync::Arc;

use docchat_core::{ChainOutput, ChatMessage, ChatModel, Result};

use crate::builder::{BuildSummary, IndexBuilder};
use crate::chain::ConversationalRetrievalChain;
use crate::index::VectorIndex;

/// Shown when a question arrives before the session has an index
pub const NOT_INITIALIZED_WARNING: &str = "Conversation not initialized. Please process PDFs first.";

/// Either no chain yet, or a chain over the session's cached index
pub enum SessionState {
    Uninitialized,
    Ready(Box<ConversationalRetrievalChain<VectorIndex>>),
}

/// Result of submitting a question to a session
#[derive(Debug, Clone)]
pub enum AskOutcome {
    Answered(ChainOutput),
    NotInitialized,
}

impl AskOutcome {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            AskOutcome::Answered(_) => None,
            AskOutcome::NotInitialized => Some(NOT_INITIALIZED_WARNING),
        }
    }
}

/// One user's chat: the index and chain once built, and the conversation
pub struct ChatSession {
    state: SessionState,
    summary: Option<BuildSummary>,
    created_at: DateTime<Utc>,
    touched_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: SessionState::Uninitialized,
            summary: None,
            created_at: now,
            touched_at: now,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Summary of the index build, once the session is ready
    pub fn summary(&self) -> Option<&BuildSummary> {
        self.summary.as_ref()
    }

    /// Build the index and chain unless the session already has them.
    ///
    /// Returns `true` when this call performed the build.
    pub async fn ensure_ready(
        &mut self,
        builder: &IndexBuilder,
        llm: Arc<dyn ChatModel>,
    ) -> Result<bool> {
        self.touch();
        if self.is_ready() {
            return Ok(false);
        }

        let (index, summary) = builder.build().await?;
        self.state = SessionState::Ready(Box::new(ConversationalRetrievalChain::new(index, llm)));
        self.summary = Some(summary);
        Ok(true)
    }

    /// Answer a question, or report that the session has no chain yet
    pub async fn ask(&mut self, question: &str) -> Result<AskOutcome> {
        self.touch();
        match &mut self.state {
            SessionState::Ready(chain) => Ok(AskOutcome::Answered(chain.ask(question).await?)),
            SessionState::Uninitialized => {
                tracing::warn!("question submitted before the conversation was initialized");
                Ok(AskOutcome::NotInitialized)
            }
        }
    }

    /// The conversation so far; empty until the first answer
    pub fn history(&self) -> &[ChatMessage] {
        match &self.state {
            SessionState::Ready(chain) => chain.memory().messages(),
            SessionState::Uninitialized => &[],
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn touched_at(&self) -> DateTime<Utc> {
        self.touched_at
    }

    pub fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    pub fn touch_at(&mut self, now: DateTime<Utc>) {
        self.touched_at = now;
    }
}
