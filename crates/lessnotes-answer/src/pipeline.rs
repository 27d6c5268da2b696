//! The question-answering pipeline.

use crate::context::format_context;
use crate::error::{AnswerError, AnswerResult};
use crate::history::render_history;
use crate::postprocess::postprocess;
use crate::prompts::{build_answer_prompt, build_reformulation_prompt};
use lessnotes_core::{ConversationId, LanguageModel, UserId, VectorStore};
use lessnotes_db::Database;
use tracing::debug;

/// A question about the user's notes, asked within a conversation.
#[derive(Debug, Clone)]
pub struct AskRequest {
    pub conversation_id: Option<ConversationId>,
    pub user_id: Option<UserId>,
    pub prompt: String,
}

/// The pipeline's terminal output: structured JSON when the model cooperated,
/// raw text otherwise.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Strictly sequential query pipeline; every request walks the same steps in
/// the same order regardless of history or profile shape.
pub struct AnswerPipeline<V, L> {
    db: Database,
    store: V,
    model: L,
    top_k: usize,
    source_marker: String,
}

impl<V: VectorStore + Sync, L: LanguageModel + Sync> AnswerPipeline<V, L> {
    pub fn new(
        db: Database,
        store: V,
        model: L,
        top_k: usize,
        source_marker: impl Into<String>,
    ) -> Self {
        Self {
            db,
            store,
            model,
            top_k,
            source_marker: source_marker.into(),
        }
    }

    /// Answer a question. Validation failures reject the request before any
    /// model call; everything after validation propagates as an error.
    pub async fn ask(&self, request: &AskRequest) -> AnswerResult<AskResponse> {
        let conversation_id = request
            .conversation_id
            .ok_or_else(|| AnswerError::Validation("conversationId is required".to_string()))?;
        let user_id = request
            .user_id
            .ok_or_else(|| AnswerError::Validation("userId is required".to_string()))?;
        let question = request.prompt.trim();
        if question.is_empty() {
            return Err(AnswerError::Validation("prompt is required".to_string()));
        }

        let user = self.db.get_user(user_id)?;
        let conversation = self.db.get_conversation(conversation_id)?;
        let turns = self.db.list_turns(conversation.id)?;
        let history = render_history(&turns);

        // Reformulation runs even with empty history so every request takes
        // one deterministic path.
        let reformulation_prompt = build_reformulation_prompt(&history, question);
        let standalone = self.model.complete(&reformulation_prompt).await?;
        let standalone = standalone.trim();
        debug!("Reformulated question: {}", standalone);

        let chunks = self
            .store
            .similarity_search(user.id, standalone, self.top_k)
            .await?;
        debug!("Retrieved {} chunks", chunks.len());

        let context = format_context(&chunks);
        let answer_prompt = build_answer_prompt(&user.profile(), standalone, &context);
        let raw = self.model.complete(&answer_prompt).await?;

        Ok(AskResponse {
            answer: postprocess(&raw, &self.source_marker),
        })
    }
}
