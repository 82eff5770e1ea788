use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionGateway;
use crate::domain::{ChatTurn, CompletionError, Credential};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope returned by OpenAI-compatible servers on non-2xx.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the OpenAI Chat Completions API and compatible servers.
///
/// Every failure is mapped onto a [`CompletionError`] kind:
/// send failures are `Transport`, non-2xx answers are `Status` carrying the
/// server's `error.message` when it sent one, and undecodable bodies or an
/// empty `choices` array are `MalformedResponse`. No retries.
pub struct OpenAiCompletionGateway {
    client: reqwest::Client,
    credential: Credential,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiCompletionGateway {
    pub fn new(credential: Credential, base_url: impl AsRef<str>, timeout: Duration) -> Self {
        let url = format!(
            "{}{}",
            base_url.as_ref().trim_end_matches('/'),
            COMPLETIONS_PATH
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            credential,
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionGateway for OpenAiCompletionGateway {
    async fn generate_response(
        &self,
        model: &str,
        messages: &[ChatTurn],
    ) -> Result<String, CompletionError> {
        debug!("POST {} model={} messages={}", self.url, model, messages.len());

        let request = ApiRequest { model, messages };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {status}: {body}");
            return Err(CompletionError::status(
                status.as_u16(),
                api_error_message(status, &body),
            ));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::malformed(format!("failed to parse response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| CompletionError::malformed("response contained no choices"))
    }
}

/// The server's own error message when it sent one, else the status line.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("API returned {status}"))
}
