use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{CompletionGateway, SessionStore};
use crate::domain::{CompletionError, ConversationHistory, DomainError, SessionId};

/// What a successful `send` appended as the assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    /// Set when reflection was requested but failed; `content` is then the
    /// un-reflected response.
    pub reflection_error: Option<CompletionError>,
}

/// Model and reflection choice last used in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub model: String,
    pub use_reflection: bool,
}

/// Keeps a running conversation per session and optionally has the model
/// revise each answer before it is recorded.
pub struct InteractiveChatUseCase {
    gateway: Arc<dyn CompletionGateway>,
    sessions: Arc<dyn SessionStore>,
}

impl InteractiveChatUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { gateway, sessions }
    }

    pub async fn send(
        &self,
        session_id: &SessionId,
        message: &str,
        model: &str,
        use_reflection: bool,
    ) -> Result<ChatReply, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::invalid_input("Message cannot be empty."));
        }

        let session = self.sessions.open(session_id).await;
        // Held until the exchange is appended: one action per session at a time.
        let mut state = session.lock().await;

        info!(
            "Chat turn {} on {} (reflection={})",
            state.history.len() / 2 + 1,
            model,
            use_reflection
        );

        let messages = state.history.with_pending(message);
        let response = self.gateway.generate_response(model, &messages).await?;
        debug!("{} answered with {} chars", model, response.len());

        let reply = if use_reflection {
            match self.gateway.generate_reflection(model, &response).await {
                Ok(reflection) => ChatReply {
                    content: reflection.annotated_for_chat(),
                    reflection_error: None,
                },
                Err(e) => {
                    warn!("Reflection on {} failed, keeping normal response: {}", model, e.detail());
                    ChatReply {
                        content: response,
                        reflection_error: Some(e),
                    }
                }
            }
        } else {
            ChatReply {
                content: response,
                reflection_error: None,
            }
        };

        state.history.push_exchange(message, reply.content.clone());
        state.chat_model = Some(model.to_string());
        state.use_reflection = use_reflection;

        Ok(reply)
    }

    /// Snapshot of the conversation; empty for a session never opened.
    pub async fn history(&self, session_id: &SessionId) -> ConversationHistory {
        let Some(session) = self.sessions.get(session_id).await else {
            return ConversationHistory::new();
        };
        let state = session.lock().await;
        state.history.clone()
    }

    /// Drop the session's conversation, keeping its settings. Waits for an
    /// in-flight `send` on the same session to append its exchange first.
    /// Returns whether there was anything to drop.
    pub async fn clear(&self, session_id: &SessionId) -> bool {
        let Some(session) = self.sessions.get(session_id).await else {
            return false;
        };
        let mut state = session.lock().await;
        let had_turns = !state.history.is_empty();
        state.history.clear();
        if had_turns {
            info!("Cleared chat session {}", session_id);
        }
        had_turns
    }

    /// The model and reflection toggle stored for the session, if a model
    /// has been chosen.
    pub async fn settings(&self, session_id: &SessionId) -> Option<ChatSettings> {
        let session = self.sessions.get(session_id).await?;
        let state = session.lock().await;
        state.chat_model.clone().map(|model| ChatSettings {
            model,
            use_reflection: state.use_reflection,
        })
    }

    /// Record the model and reflection toggle for later sends.
    pub async fn configure(&self, session_id: &SessionId, model: &str, use_reflection: bool) {
        let session = self.sessions.open(session_id).await;
        let mut state = session.lock().await;
        debug!("Session {} now uses {} (reflection={})", session_id, model, use_reflection);
        state.chat_model = Some(model.to_string());
        state.use_reflection = use_reflection;
    }
}
