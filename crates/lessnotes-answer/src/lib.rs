//! Lessnotes Answer - history-aware question answering.
//!
//! Runs the query pipeline: validate the request, render chat history,
//! reformulate the question into a standalone query, retrieve relevant
//! chunks, assemble a profile-shaped prompt, and post-process the model's
//! structured answer.

mod context;
mod error;
mod history;
mod pipeline;
mod postprocess;
mod prompts;

pub use context::format_context;
pub use error::{AnswerError, AnswerResult};
pub use history::{render_history, EMPTY_HISTORY};
pub use pipeline::{AnswerPipeline, AskRequest, AskResponse};
pub use postprocess::{postprocess, ModelAnswer};
pub use prompts::{build_answer_prompt, build_reformulation_prompt, ProfileVariant};
