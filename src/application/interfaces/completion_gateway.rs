use std::time::Instant;

use async_trait::async_trait;

use crate::domain::{ChatTurn, CompletionError, Reflection};

/// System turn prepended to one-shot prompts and reflection requests.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Appended to the text a model is asked to revise.
pub const REFLECTION_INSTRUCTION: &str = "Reflect on this response and improve it.";

/// Sends chat-completion requests to a hosted model.
///
/// Failures come back as [`CompletionError`] values: callers decide how to
/// display them, and one failed call never aborts the surrounding action.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send `messages` as the full context and return the assistant's text.
    async fn generate_response(
        &self,
        model: &str,
        messages: &[ChatTurn],
    ) -> Result<String, CompletionError>;

    /// Ask `model` to revise `content`, timing the round trip.
    async fn generate_reflection(
        &self,
        model: &str,
        content: &str,
    ) -> Result<Reflection, CompletionError> {
        let messages = reflection_messages(content);
        let start = Instant::now();
        let text = self.generate_response(model, &messages).await?;
        Ok(Reflection::new(text, start.elapsed()))
    }
}

/// System + user pair for a single prompt.
pub fn one_shot_messages(prompt: &str) -> Vec<ChatTurn> {
    vec![ChatTurn::system(SYSTEM_PROMPT), ChatTurn::user(prompt)]
}

pub fn reflection_messages(content: &str) -> Vec<ChatTurn> {
    one_shot_messages(&format!("{content}\n{REFLECTION_INSTRUCTION}"))
}
