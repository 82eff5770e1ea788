use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::application::{one_shot_messages, CompletionGateway};
use crate::domain::{CompletionError, DomainError, ModelResult, ModelSelection, TestResult};

/// Fans one prompt out to every selected model and optionally has each
/// reflection model revise its own answer.
pub struct PromptTestingUseCase {
    gateway: Arc<dyn CompletionGateway>,
    concurrent: bool,
    show_progress: bool,
}

impl PromptTestingUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            gateway,
            concurrent: false,
            show_progress: false,
        }
    }

    /// Run each model's pipeline (normal call, then its reflection)
    /// concurrently instead of one model after another.
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn execute(
        &self,
        prompt: &str,
        selection: &ModelSelection,
    ) -> Result<TestResult, DomainError> {
        if prompt.trim().is_empty() {
            return Err(DomainError::invalid_input("Prompt cannot be empty."));
        }

        info!(
            "Testing prompt against {} models ({} with reflection, concurrent={})",
            selection.len(),
            selection.reflection_models().len(),
            self.concurrent,
        );

        let start_time = Instant::now();
        let progress = self.progress_bar(selection);

        let results = if self.concurrent {
            join_all(
                selection
                    .models()
                    .iter()
                    .map(|model| self.run_model(prompt, model, selection, &progress)),
            )
            .await
        } else {
            let mut results = Vec::with_capacity(selection.len());
            for model in selection.models() {
                results.push(self.run_model(prompt, model, selection, &progress).await);
            }
            results
        };

        progress.finish_and_clear();

        let result = TestResult::new(results, selection.reflection_models().to_vec());
        info!(
            "Prompt test finished in {:.2}s ({} errors)",
            start_time.elapsed().as_secs_f64(),
            result.error_count()
        );

        Ok(result)
    }

    async fn run_model(
        &self,
        prompt: &str,
        model: &str,
        selection: &ModelSelection,
        progress: &ProgressBar,
    ) -> ModelResult {
        progress.set_message(model.to_string());
        debug!("Requesting normal response from {}", model);

        let normal = self
            .gateway
            .generate_response(model, &one_shot_messages(prompt))
            .await;
        progress.inc(1);

        if let Err(ref e) = normal {
            warn!("{} failed: {}", model, e.detail());
        }

        if !selection.reflects_on(model) {
            return ModelResult::new(model, normal);
        }

        // Reflection only ever revises this model's own answer.
        let reflection = match &normal {
            Ok(text) => {
                debug!("Requesting reflection from {}", model);
                let reflection = self.gateway.generate_reflection(model, text).await;
                if let Err(ref e) = reflection {
                    warn!("{} reflection failed: {}", model, e.detail());
                }
                reflection
            }
            Err(_) => Err(CompletionError::skipped(format!(
                "Reflection skipped: the normal request to {model} failed, so there is no response to reflect on."
            ))),
        };
        progress.inc(1);

        ModelResult::new(model, normal).with_reflection(reflection)
    }

    fn progress_bar(&self, selection: &ModelSelection) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let total = (selection.len() + selection.reflection_models().len()) as u64;
        let progress_bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} calls {msg}")
        {
            progress_bar.set_style(style.progress_chars("#>-"));
        }
        progress_bar
    }
}
