use std::fmt;

use uuid::Uuid;

use super::ConversationHistory;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything one user session keeps between actions.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub history: ConversationHistory,
    pub chat_model: Option<String>,
    pub use_reflection: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
