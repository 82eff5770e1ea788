use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ModelDirectory;
use crate::domain::{Credential, FALLBACK_MODELS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Directory,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    pub models: Vec<String>,
    pub source: CatalogSource,
}

impl ModelCatalog {
    pub fn is_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }
}

pub struct ListModelsUseCase {
    directory: Arc<dyn ModelDirectory>,
}

impl ListModelsUseCase {
    pub fn new(directory: Arc<dyn ModelDirectory>) -> Self {
        Self { directory }
    }

    /// Models the credential can use, or the built-in list when the
    /// directory has none to offer.
    pub async fn execute(&self, credential: &Credential) -> ModelCatalog {
        let models = self.directory.list_models(credential).await;

        if models.is_empty() {
            warn!("Model directory returned no models, using built-in list");
            return ModelCatalog {
                models: FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
                source: CatalogSource::Fallback,
            };
        }

        info!("Model directory returned {} models", models.len());
        ModelCatalog {
            models,
            source: CatalogSource::Directory,
        }
    }
}
