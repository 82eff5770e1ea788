use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::{ModelSelection, TestResult};

use super::super::Container;

/// JSON shape of one model's outcome.
#[derive(Debug, Serialize)]
pub struct ModelResultOutput {
    pub model: String,
    pub normal_response: String,
    pub error: Option<String>,
    pub reflection_response: Option<String>,
    pub reflection_elapsed_seconds: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TestResultOutput {
    pub tabs: Vec<String>,
    pub results: Vec<ModelResultOutput>,
}

impl From<&TestResult> for TestResultOutput {
    fn from(result: &TestResult) -> Self {
        Self {
            tabs: result.tabs().iter().map(|t| t.title()).collect(),
            results: result
                .results()
                .iter()
                .map(|r| ModelResultOutput {
                    model: r.model().to_string(),
                    normal_response: r.normal_response(),
                    error: r.normal().as_ref().err().map(|e| e.kind().to_string()),
                    reflection_response: r.reflection_response(),
                    reflection_elapsed_seconds: r.reflection_elapsed_seconds(),
                })
                .collect(),
        }
    }
}

pub struct PromptTestController<'a> {
    container: &'a Container,
}

impl<'a> PromptTestController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn test(
        &self,
        prompt: String,
        models: Vec<String>,
        reflect: Vec<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let selection = ModelSelection::new(models, reflect)?;

        let use_case = self.container.prompt_testing_use_case();
        let result = use_case.execute(&prompt, &selection).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&TestResultOutput::from(&result))?,
            OutputFormat::Text => self.format_tabs(&result),
        })
    }

    fn format_tabs(&self, result: &TestResult) -> String {
        let mut output = String::from("Chatbot Responses\n\n");

        for tab in result.tabs() {
            output.push_str(&format!("=== {} ===\n", tab.title()));
            output.push_str(&tab.heading());
            output.push_str("\n\n");
            output.push_str(tab.body.trim_end());
            output.push_str("\n\n");
        }

        output
    }
}
