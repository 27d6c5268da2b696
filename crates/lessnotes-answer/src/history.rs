//! Chat history rendering.

use lessnotes_core::ConversationTurn;

/// Sentinel used when a conversation has no prior turns. The reformulation
/// prompt always expects a history block, so an empty history renders as
/// this explicit marker rather than an empty string.
pub const EMPTY_HISTORY: &str = "No prior chat history available.";

/// Render ordered turns as alternating "Human:"/"AI:" lines.
pub fn render_history(turns: &[ConversationTurn]) -> String {
    if turns.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    turns
        .iter()
        .map(|turn| {
            let speaker = if turn.is_human { "Human" } else { "AI" };
            format!("{}: {}", speaker, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
