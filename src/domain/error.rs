use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Please provide your OpenAI API key to proceed.")]
    MissingCredential,

    #[error("{0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completion(_))
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

/// Why a completion call produced no text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// The request never got an HTTP response (DNS, connect, timeout).
    Transport,
    /// The API answered with a non-2xx status.
    Status(u16),
    /// The body could not be decoded or carried no choices.
    MalformedResponse,
    /// The call was not attempted because its input was unavailable.
    Skipped,
}

impl fmt::Display for CompletionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Status(code) => write!(f, "status {}", code),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// A failed completion call, carried as a value so one model's failure
/// becomes that model's displayed result instead of aborting the action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error: {detail}")]
pub struct CompletionError {
    kind: CompletionErrorKind,
    detail: String,
}

impl CompletionError {
    pub fn new(kind: CompletionErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Transport, detail)
    }

    pub fn status(code: u16, detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Status(code), detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::MalformedResponse, detail)
    }

    pub fn skipped(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Skipped, detail)
    }

    pub fn kind(&self) -> CompletionErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Inline text shown in place of a response. A skipped call shows its
    /// reason without the error prefix.
    pub fn display_text(&self) -> String {
        match self.kind {
            CompletionErrorKind::Skipped => self.detail.clone(),
            _ => self.to_string(),
        }
    }
}
