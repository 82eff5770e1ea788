use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ModelDirectory;
use crate::domain::{Credential, DomainError};

const MODELS_PATH: &str = "/v1/models";

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Reads `GET /v1/models` from an OpenAI-compatible server.
pub struct OpenAiModelDirectory {
    client: reqwest::Client,
    url: String,
}

impl OpenAiModelDirectory {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Self {
        let url = format!("{}{}", base_url.as_ref().trim_end_matches('/'), MODELS_PATH);
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url,
        }
    }

    async fn fetch(&self, credential: &Credential) -> Result<Vec<String>, DomainError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| DomainError::internal(format!("model listing rejected: {e}")))?;

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| DomainError::internal(format!("failed to parse model list: {e}")))?;

        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl ModelDirectory for OpenAiModelDirectory {
    async fn list_models(&self, credential: &Credential) -> Vec<String> {
        match self.fetch(credential).await {
            Ok(models) => {
                debug!("Fetched {} models from {}", models.len(), self.url);
                models
            }
            Err(e) => {
                warn!("Error fetching models: {}", e);
                Vec::new()
            }
        }
    }
}
