//! Conversational retrieval chain

use std::sync::Arc;

use docchat_core::{
    ChainConfig, ChainOutput, ChatMessage, ChatModel, Result, Retriever, VectorDocument,
};

use crate::memory::ConversationBufferMemory;

const CONDENSE_QUESTION_PROMPT: &str = "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.";

const ANSWER_SYSTEM_PROMPT: &str = "Use the following pieces of context to answer the user's question. \nIf you don't know the answer, just say that you don't know, don't try to make up an answer.\n----------------\n";

/// Answers questions from retrieved context, keeping the conversation in memory
pub struct ConversationalRetrievalChain<R: Retriever> {
    retriever: R,
    llm: Arc<dyn ChatModel>,
    memory: ConversationBufferMemory,
    config: ChainConfig,
}

impl<R: Retriever> ConversationalRetrievalChain<R> {
    pub fn new(retriever: R, llm: Arc<dyn ChatModel>) -> Self {
        Self::with_config(retriever, llm, ChainConfig::default())
    }

    pub fn with_config(retriever: R, llm: Arc<dyn ChatModel>, config: ChainConfig) -> Self {
        Self {
            retriever,
            llm,
            memory: ConversationBufferMemory::new(),
            config,
        }
    }

    pub fn memory(&self) -> &ConversationBufferMemory {
        &self.memory
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    /// Run one question/answer round and record it in memory
    pub async fn ask(&mut self, question: &str) -> Result<ChainOutput> {
        let generated_question = self.standalone_question(question).await?;

        let documents = self
            .retriever
            .retrieve(&generated_question, &self.config.search)
            .await?;

        tracing::debug!(
            retrieved = documents.len(),
            condensed = generated_question != question,
            "answering question"
        );

        let messages = vec![
            ChatMessage::system(build_system_prompt(&documents)),
            ChatMessage::user(generated_question.as_str()),
        ];
        let answer = self.llm.chat(&messages).await?.text;

        self.memory.save_context(question, &answer);

        Ok(ChainOutput {
            question: question.to_string(),
            generated_question,
            answer,
            chat_history: self.memory.messages().to_vec(),
            source_documents: if self.config.return_source_documents {
                documents
            } else {
                Vec::new()
            },
        })
    }

    /// Rewrite a follow-up into a question that stands without the history
    async fn standalone_question(&self, question: &str) -> Result<String> {
        if self.memory.is_empty() || !self.config.rephrase_question {
            return Ok(question.to_string());
        }

        let prompt = build_condense_prompt(&self.memory, question);
        let result = self.llm.chat(&[ChatMessage::user(prompt)]).await?;
        let condensed = result.text.trim();

        if condensed.is_empty() {
            Ok(question.to_string())
        } else {
            Ok(condensed.to_string())
        }
    }
}

fn build_condense_prompt(memory: &ConversationBufferMemory, question: &str) -> String {
    format!(
        "{}\n\nChat History:\n{}\nFollow Up Input: {}\nStandalone question:",
        CONDENSE_QUESTION_PROMPT,
        memory.buffer_as_str(),
        question
    )
}

fn build_system_prompt(documents: &[VectorDocument]) -> String {
    let context = documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}{}", ANSWER_SYSTEM_PROMPT, context)
}
