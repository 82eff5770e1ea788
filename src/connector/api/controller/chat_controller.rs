use anyhow::Result;

use crate::{ChatSettings, DomainError, SessionId};

use super::super::Container;

/// Drives one chat session from line-oriented input.
///
/// The model and reflection toggle live in the session state; the values
/// given to `new` only apply until the session records its own.
pub struct ChatController<'a> {
    container: &'a Container,
    session_id: SessionId,
    initial: ChatSettings,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container, model: impl Into<String>, use_reflection: bool) -> Self {
        Self {
            container,
            session_id: SessionId::new(),
            initial: ChatSettings {
                model: model.into(),
                use_reflection,
            },
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub async fn settings(&self) -> ChatSettings {
        self.container
            .chat_use_case()
            .settings(&self.session_id)
            .await
            .unwrap_or_else(|| self.initial.clone())
    }

    pub async fn set_model(&self, model: &str) -> String {
        let model = model.trim();
        if model.is_empty() {
            return "Please select at least one model to proceed.".to_string();
        }
        let current = self.settings().await;
        self.container
            .chat_use_case()
            .configure(&self.session_id, model, current.use_reflection)
            .await;
        format!("Chatting with {model}.")
    }

    pub async fn set_reflection(&self, use_reflection: bool) -> String {
        let current = self.settings().await;
        self.container
            .chat_use_case()
            .configure(&self.session_id, &current.model, use_reflection)
            .await;
        let state = if use_reflection { "enabled" } else { "disabled" };
        format!("Reflection {state}.")
    }

    /// Send one message and return the text to print. Validation and
    /// completion failures come back as printable text, never as `Err`.
    pub async fn send(&self, message: &str) -> Result<String> {
        let settings = self.settings().await;
        let use_case = self.container.chat_use_case();
        match use_case
            .send(
                &self.session_id,
                message,
                &settings.model,
                settings.use_reflection,
            )
            .await
        {
            Ok(reply) => {
                let mut output = format!("{}: {}", settings.model, reply.content);
                if let Some(e) = reply.reflection_error {
                    output.push_str(&format!(
                        "\n(reflection failed, showing the original response: {})",
                        e.display_text()
                    ));
                }
                Ok(output)
            }
            Err(e @ (DomainError::InvalidInput(_) | DomainError::Completion(_))) => {
                Ok(e.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn clear(&self) -> String {
        self.container.chat_use_case().clear(&self.session_id).await;
        "Conversation cleared.".to_string()
    }

    pub async fn transcript(&self) -> String {
        let history = self.container.chat_use_case().history(&self.session_id).await;
        history
            .turns()
            .iter()
            .map(|turn| format!("{}: {}", turn.role(), turn.content()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
