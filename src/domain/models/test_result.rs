use std::fmt;
use std::time::Duration;

use crate::domain::CompletionError;

/// Shown in place of a reflection that was never recorded.
pub const NO_REFLECTION: &str = "No reflection response received.";

/// A model's revised answer and how long the reflection call took.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    text: String,
    elapsed: Duration,
}

impl Reflection {
    pub fn new(text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            text: text.into(),
            elapsed,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Reflection text followed by the elapsed-time annotation used in the
    /// prompt-testing tabs.
    pub fn annotated(&self) -> String {
        format!(
            "{}\n\n**Reflection Response (after {:.2} seconds)**",
            self.text,
            self.elapsed_seconds()
        )
    }

    /// Same as [`Reflection::annotated`], in the chat transcript flavour.
    pub fn annotated_for_chat(&self) -> String {
        format!(
            "{}\n\n**Reflection Response (after {:.2} seconds):**",
            self.text,
            self.elapsed_seconds()
        )
    }
}

/// Outcome of one model within a prompt test.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    model: String,
    normal: Result<String, CompletionError>,
    reflection: Option<Result<Reflection, CompletionError>>,
}

impl ModelResult {
    pub fn new(model: impl Into<String>, normal: Result<String, CompletionError>) -> Self {
        Self {
            model: model.into(),
            normal,
            reflection: None,
        }
    }

    pub fn with_reflection(mut self, reflection: Result<Reflection, CompletionError>) -> Self {
        self.reflection = Some(reflection);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn normal(&self) -> &Result<String, CompletionError> {
        &self.normal
    }

    pub fn reflection(&self) -> Option<&Result<Reflection, CompletionError>> {
        self.reflection.as_ref()
    }

    /// The response text, or the error text when the call failed.
    pub fn normal_response(&self) -> String {
        match &self.normal {
            Ok(text) => text.clone(),
            Err(e) => e.display_text(),
        }
    }

    /// Annotated reflection text, the error text, or `None` when no
    /// reflection was requested for this model.
    pub fn reflection_response(&self) -> Option<String> {
        self.reflection.as_ref().map(|r| match r {
            Ok(reflection) => reflection.annotated(),
            Err(e) => e.display_text(),
        })
    }

    pub fn reflection_elapsed_seconds(&self) -> Option<f64> {
        match &self.reflection {
            Some(Ok(reflection)) => Some(reflection.elapsed_seconds()),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.normal.is_err()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabVariant {
    Normal,
    Reflection,
}

impl TabVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabVariant::Normal => "Normal",
            TabVariant::Reflection => "Reflection",
        }
    }
}

impl fmt::Display for TabVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rendered tab of a prompt test.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTab {
    pub model: String,
    pub variant: TabVariant,
    pub body: String,
}

impl ResultTab {
    pub fn title(&self) -> String {
        format!("{} {}", self.model, self.variant)
    }

    pub fn heading(&self) -> String {
        match self.variant {
            TabVariant::Normal => format!("### {} (Normal Response)", self.model),
            TabVariant::Reflection => format!("### {} (Reflected Response)", self.model),
        }
    }
}

/// Results of one prompt-test submission, keyed by model in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestResult {
    results: Vec<ModelResult>,
    reflection_order: Vec<String>,
}

impl TestResult {
    pub fn new(results: Vec<ModelResult>, reflection_order: Vec<String>) -> Self {
        Self {
            results,
            reflection_order,
        }
    }

    pub fn results(&self) -> &[ModelResult] {
        &self.results
    }

    pub fn get(&self, model: &str) -> Option<&ModelResult> {
        self.results.iter().find(|r| r.model() == model)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn reflection_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.reflection().is_some())
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }

    /// Normal tabs in selection order, then reflection tabs in
    /// reflection-selection order.
    pub fn tabs(&self) -> Vec<ResultTab> {
        let normal = self.results.iter().map(|r| ResultTab {
            model: r.model().to_string(),
            variant: TabVariant::Normal,
            body: r.normal_response(),
        });

        let reflected = self.reflection_order.iter().map(|model| ResultTab {
            model: model.clone(),
            variant: TabVariant::Reflection,
            body: self
                .get(model)
                .and_then(|r| r.reflection_response())
                .unwrap_or_else(|| NO_REFLECTION.to_string()),
        });

        normal.chain(reflected).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestResult {
        let gpt4 = ModelResult::new("gpt-4", Ok("Hi!".to_string())).with_reflection(Ok(
            Reflection::new("Hello there!", Duration::from_millis(1500)),
        ));
        let gpt4o = ModelResult::new("gpt-4o", Err(CompletionError::status(500, "boom")));
        TestResult::new(vec![gpt4, gpt4o], vec!["gpt-4".to_string()])
    }

    #[test]
    fn tabs_list_normals_before_reflections() {
        let titles: Vec<String> = sample().tabs().iter().map(ResultTab::title).collect();
        assert_eq!(titles, vec!["gpt-4 Normal", "gpt-4o Normal", "gpt-4 Reflection"]);
    }

    #[test]
    fn reflection_body_carries_elapsed_annotation() {
        let tabs = sample().tabs();
        assert_eq!(
            tabs[2].body,
            "Hello there!\n\n**Reflection Response (after 1.50 seconds)**"
        );
        assert_eq!(tabs[2].heading(), "### gpt-4 (Reflected Response)");
    }

    #[test]
    fn failed_model_shows_error_text() {
        let result = sample();
        assert_eq!(result.get("gpt-4o").unwrap().normal_response(), "Error: boom");
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.get("gpt-4o").unwrap().reflection_elapsed_seconds(), None);
    }

    #[test]
    fn missing_reflection_entry_uses_placeholder() {
        let result = TestResult::new(
            vec![ModelResult::new("gpt-4", Ok("Hi".to_string()))],
            vec!["gpt-4".to_string()],
        );
        assert_eq!(result.tabs()[1].body, NO_REFLECTION);
    }
}
