use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    CompletionGateway, InteractiveChatUseCase, ListModelsUseCase, ModelDirectory,
    PromptTestingUseCase, SessionStore,
};
use crate::connector::adapter::{
    InMemorySessionStore, MockCompletionGateway, OpenAiCompletionGateway, OpenAiModelDirectory,
    StaticModelDirectory, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use crate::domain::Credential;

/// Credential used when running against the offline mock gateway.
const MOCK_CREDENTIAL: &str = "mock";

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Use the deterministic offline gateway and the built-in model list.
    pub mock: bool,
    /// Query the selected models concurrently during prompt tests.
    pub concurrent: bool,
    /// Draw a progress bar while a prompt test runs.
    pub show_progress: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock: false,
            concurrent: false,
            show_progress: false,
        }
    }
}

impl ContainerConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

pub struct Container {
    gateway: Arc<dyn CompletionGateway>,
    directory: Arc<dyn ModelDirectory>,
    sessions: Arc<dyn SessionStore>,
    credential: Credential,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let (gateway, directory, credential): (
            Arc<dyn CompletionGateway>,
            Arc<dyn ModelDirectory>,
            Credential,
        ) = if config.mock {
            debug!("Using mock completion gateway");
            let credential = match config.api_key.as_deref() {
                Some(key) if !key.trim().is_empty() => Credential::new(key)?,
                _ => Credential::new(MOCK_CREDENTIAL)?,
            };
            (
                Arc::new(MockCompletionGateway::new()),
                Arc::new(StaticModelDirectory::new()),
                credential,
            )
        } else {
            let credential = Credential::new(config.api_key.clone().unwrap_or_default())?;
            debug!("Using completion API at {}", config.base_url);
            (
                Arc::new(OpenAiCompletionGateway::new(
                    credential.clone(),
                    &config.base_url,
                    timeout,
                )),
                Arc::new(OpenAiModelDirectory::new(&config.base_url, timeout)),
                credential,
            )
        };

        Ok(Self {
            gateway,
            directory,
            sessions: Arc::new(InMemorySessionStore::new()),
            credential,
            config,
        })
    }

    /// Assemble a container from already-built adapters.
    pub fn from_parts(
        gateway: Arc<dyn CompletionGateway>,
        directory: Arc<dyn ModelDirectory>,
        credential: Credential,
        config: ContainerConfig,
    ) -> Self {
        Self {
            gateway,
            directory,
            sessions: Arc::new(InMemorySessionStore::new()),
            credential,
            config,
        }
    }

    pub fn prompt_testing_use_case(&self) -> PromptTestingUseCase {
        PromptTestingUseCase::new(self.gateway.clone())
            .with_concurrency(self.config.concurrent)
            .with_progress(self.config.show_progress)
    }

    pub fn chat_use_case(&self) -> InteractiveChatUseCase {
        InteractiveChatUseCase::new(self.gateway.clone(), self.sessions.clone())
    }

    pub fn list_models_use_case(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(self.directory.clone())
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
