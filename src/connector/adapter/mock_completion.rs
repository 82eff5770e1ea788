use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use tracing::debug;

use crate::application::{CompletionGateway, ModelDirectory};
use crate::domain::{ChatTurn, CompletionError, Credential, FALLBACK_MODELS};

/// Offline gateway: answers deterministically from the model name and the
/// last message, so the same request always yields the same text.
pub struct MockCompletionGateway;

impl MockCompletionGateway {
    pub fn new() -> Self {
        Self
    }

    fn fingerprint(model: &str, messages: &[ChatTurn]) -> u64 {
        let mut hasher = DefaultHasher::new();
        model.hash(&mut hasher);
        for message in messages {
            message.role().as_str().hash(&mut hasher);
            message.content().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl Default for MockCompletionGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionGateway for MockCompletionGateway {
    async fn generate_response(
        &self,
        model: &str,
        messages: &[ChatTurn],
    ) -> Result<String, CompletionError> {
        let last = messages
            .last()
            .ok_or_else(|| CompletionError::malformed("no messages to answer"))?;

        let fingerprint = Self::fingerprint(model, messages);
        debug!("Mock completion for {} ({:016x})", model, fingerprint);

        Ok(format!(
            "[{model} #{:04x}] {}",
            fingerprint % 0x10000,
            last.content().lines().next().unwrap_or_default()
        ))
    }
}

/// Directory that always offers the built-in model list.
pub struct StaticModelDirectory {
    models: Vec<String>,
}

impl StaticModelDirectory {
    pub fn new() -> Self {
        Self::with_models(FALLBACK_MODELS.iter().map(|m| m.to_string()).collect())
    }

    pub fn with_models(models: Vec<String>) -> Self {
        Self { models }
    }
}

impl Default for StaticModelDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelDirectory for StaticModelDirectory {
    async fn list_models(&self, _credential: &Credential) -> Vec<String> {
        self.models.clone()
    }
}
