//! Conversation buffer memory

use docchat_core::ChatMessage;

/// Unbounded buffer of the conversation so far, in submission order
#[derive(Debug, Clone, Default)]
pub struct ConversationBufferMemory {
    messages: Vec<ChatMessage>,
}

impl ConversationBufferMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one round: the question first, then the answer
    pub fn save_context(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage::user(question));
        self.messages.push(ChatMessage::assistant(answer));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The history flattened to `Human: ...` / `Assistant: ...` lines
    pub fn buffer_as_str(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.transcript_prefix(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
