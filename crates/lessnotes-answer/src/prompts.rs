//! Prompt templates and profile-driven selection.
//!
//! The answer prompt adapts to how much of the user's profile is known.
//! A pure classification function maps the optional fields to a variant tag,
//! and an ordered table maps each tag to its template. Every template takes
//! the same placeholders; absent fields are filled with literal fallback
//! labels so no gap ever reaches the model.

use lessnotes_core::UserProfile;

const FALLBACK_NAME: &str = "User";
const FALLBACK_SCHOOL: &str = "Unknown School";
const FALLBACK_MAJOR: &str = "Undeclared Major";

const JSON_INSTRUCTION: &str = "Respond with a JSON object containing an \"answer\" field with your \
answer and a \"sources\" field listing the sources you used, drawn only from the supplied context.";

const ANONYMOUS_TEMPLATE: &str = "\
You are an assistant for question-answering tasks.
Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know.
If the answer is not in the context, DO NOT answer the question.
{json_instruction}

Question: {question}

Context: {context}

Answer:
";

const NAME_ONLY_TEMPLATE: &str = "\
You are an assistant for question-answering tasks.
You are assisting {user_name}, talk to them with this name.
Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know.
If the answer is not in the context, DO NOT answer the question.
{json_instruction}

Question: {question}

Context: {context}

Answer:
";

const NAME_SCHOOL_TEMPLATE: &str = "\
You are an assistant for question-answering tasks.
You are assisting {user_name}, talk to them with this name.
{user_name} is a student at {user_school}.
Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know.
If the answer is not in the context, DO NOT answer the question.
{json_instruction}

Question: {question}

Context: {context}

Answer:
";

const FULL_TEMPLATE: &str = "\
You are an assistant for question-answering tasks.
You are assisting {user_name}, talk to them with this name.
{user_name} is a student at {user_school}.
They are majoring in {user_major}, take this into consideration.
Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know.
If the answer is not in the context, DO NOT answer the question.
{json_instruction}

Question: {question}

Context: {context}

Answer:
";

const REFORMULATION_TEMPLATE: &str = "\
Given a chat history and the latest user question,
which might reference context in the chat history,
formulate a standalone question that can be understood
without the chat history. Do NOT answer the question;
just reformulate it if needed, or return it as is.

Chat history: {chat_history}

Current Question: {question}
";

/// How complete the user's profile is, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVariant {
    Full,
    NameSchool,
    NameOnly,
    Anonymous,
}

/// Variant-to-template table, ordered most specific to least.
const TEMPLATES: &[(ProfileVariant, &str)] = &[
    (ProfileVariant::Full, FULL_TEMPLATE),
    (ProfileVariant::NameSchool, NAME_SCHOOL_TEMPLATE),
    (ProfileVariant::NameOnly, NAME_ONLY_TEMPLATE),
    (ProfileVariant::Anonymous, ANONYMOUS_TEMPLATE),
];

impl ProfileVariant {
    /// Classify a profile by which fields are populated.
    pub fn classify(profile: &UserProfile) -> Self {
        let name = profile.display_name.is_some();
        let school = profile.school.is_some();
        let major = profile.major.is_some();

        match (name, school, major) {
            (true, true, true) => ProfileVariant::Full,
            (true, true, false) => ProfileVariant::NameSchool,
            (true, false, _) => ProfileVariant::NameOnly,
            _ => ProfileVariant::Anonymous,
        }
    }

    fn template(&self) -> &'static str {
        TEMPLATES
            .iter()
            .find(|(variant, _)| variant == self)
            .map(|(_, template)| *template)
            .unwrap_or(ANONYMOUS_TEMPLATE)
    }
}

/// Build the final answer prompt for a profile, question and formatted
/// context.
pub fn build_answer_prompt(profile: &UserProfile, question: &str, context: &str) -> String {
    let variant = ProfileVariant::classify(profile);

    variant
        .template()
        .replace("{json_instruction}", JSON_INSTRUCTION)
        .replace(
            "{user_name}",
            profile.display_name.as_deref().unwrap_or(FALLBACK_NAME),
        )
        .replace(
            "{user_school}",
            profile.school.as_deref().unwrap_or(FALLBACK_SCHOOL),
        )
        .replace(
            "{user_major}",
            profile.major.as_deref().unwrap_or(FALLBACK_MAJOR),
        )
        .replace("{question}", question)
        .replace("{context}", context)
}

/// Build the question-reformulation prompt from rendered history and the raw
/// question.
pub fn build_reformulation_prompt(chat_history: &str, question: &str) -> String {
    REFORMULATION_TEMPLATE
        .replace("{chat_history}", chat_history)
        .replace("{question}", question)
}
