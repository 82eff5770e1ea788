use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Models listed when the model directory returns nothing.
pub const FALLBACK_MODELS: [&str; 3] = ["gpt-4", "gpt-4-turbo", "gpt-4o"];

/// Models queried for a prompt test, plus the subset whose answers get a
/// reflection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    models: Vec<String>,
    reflection_models: Vec<String>,
}

impl ModelSelection {
    /// Build a selection, keeping first-seen order and dropping duplicates.
    ///
    /// Fails when no model is selected or when a reflection model is not also
    /// selected for a normal response.
    pub fn new(
        models: impl IntoIterator<Item = impl Into<String>>,
        reflection_models: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DomainError> {
        let models = dedup(models);
        if models.is_empty() {
            return Err(DomainError::invalid_input(
                "Please select at least one model to proceed.",
            ));
        }

        let reflection_models = dedup(reflection_models);
        if let Some(stray) = reflection_models.iter().find(|m| !models.contains(m)) {
            return Err(DomainError::invalid_input(format!(
                "Cannot reflect on {stray}: it is not selected for a normal response."
            )));
        }

        Ok(Self {
            models,
            reflection_models,
        })
    }

    pub fn without_reflection(
        models: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DomainError> {
        Self::new(models, Vec::<String>::new())
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn reflection_models(&self) -> &[String] {
        &self.reflection_models
    }

    pub fn reflects_on(&self, model: &str) -> bool {
        self.reflection_models.iter().any(|m| m == model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn dedup(items: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item: String = item.into();
        let item = item.trim().to_string();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
