//! Prompt templates for the generative capability.
//!
//! Each builder turns a typed request into a (system, user) message pair
//! for chat-style models.

use super::traits::{AddresseeRequest, ResponseRequest, SummaryRequest};

/// Literal reply meaning "nobody in particular was addressed".
pub const NO_TARGET_TOKEN: &str = "None";

/// A chat prompt: instructions plus the material to work on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Persona utterance prompt.
pub fn response_prompt(request: &ResponseRequest) -> Prompt {
    let system = format!(
        r#"You are {name}, a strategy specialist taking part in a business meeting.
Your disposition is {trait_code}; frame problems and reason the way that disposition would, without ever naming it.
Speak from your own point of view in 1-3 concise sentences.
Do not simply agree with what has been said: push back with a principled counterpoint, but stop objecting once an argument is genuinely sound.
Avoid vague or abstract statements; ground what you say in situations that actually happen in real businesses.
A casual, conversational tone is fine. Reply with the utterance only, no name prefix or metadata."#,
        name = request.persona.name,
        trait_code = request.persona.trait_code,
    );

    let user = format!(
        "Meeting topic: {topic}\n\n--- conversation start ---\n{transcript}\n--- conversation end ---\n\nWhat do you say next, {name}?",
        topic = request.topic,
        transcript = request.transcript,
        name = request.persona.name,
    );

    Prompt { system, user }
}

/// Addressee classification prompt.
pub fn addressee_prompt(request: &AddresseeRequest) -> Prompt {
    let names = request.persona_names.join(", ");

    let recent = if request.recent_lines.is_empty() {
        " (no recent remarks)".to_string()
    } else {
        request
            .recent_lines
            .iter()
            .map(|entry| entry.render())
            .collect::<Vec<_>>()
            .join("\n")
    };

    let system = format!(
        r#"You decide who a meeting participant is talking to.
Answer with exactly one of: {names}, or {none}.
Answer with a name only if the message either
1. explicitly calls exactly one of these participants by name, or
2. clearly refers to or follows up on one specific participant's recent remark.
If it is ambiguous, addresses several people, or addresses nobody, answer {none}.
Never add any explanation or other text."#,
        names = names,
        none = NO_TARGET_TOKEN,
    );

    let user = format!(
        "Message: \"{utterance}\"\n\nRecent remarks:\n{recent}\n\nParticipants: {names}",
        utterance = request.utterance,
        recent = recent,
        names = names,
    );

    Prompt { system, user }
}

/// End-of-meeting report prompt.
pub fn summary_prompt(request: &SummaryRequest) -> Prompt {
    let system = r#"You review business meetings. Evaluate the meeting record you are given using exactly this outline:

# Agenda
- (state the meeting topic clearly)

# Discussion
- (concise summary of the main points discussed)

# Feedback
- (assess the outcome and the way it was discussed in terms of goal achievement and efficiency, and suggest improvements)

Write the result in Markdown."#
        .to_string();

    let user = format!(
        "Meeting record on '{topic}':\n\n--- record start ---\n{transcript}\n--- record end ---",
        topic = request.topic,
        transcript = request.transcript,
    );

    Prompt { system, user }
}
