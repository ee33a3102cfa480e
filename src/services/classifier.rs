//! Review sentiment classification backend
//!
//! Classification is a single-turn call to an OpenAI-compatible chat
//! completion API (the default configuration points at DeepSeek). The
//! prompt is rendered per call from a template and the current category
//! vocabulary, so the allowed output set always reflects catalog state
//! without any cache invalidation.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Placeholder in the prompt template replaced with the category vocabulary
pub const RANKINGS_PLACEHOLDER: &str = "{rankings}";

/// Per-call deadline for the classification backend. No retries; a slow
/// or partitioned backend surfaces as a transport error after this long.
const CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(100);

/// Renders the full classification prompt.
///
/// Substitutes the vocabulary into the template's first
/// [`RANKINGS_PLACEHOLDER`] occurrence, then appends the raw review text.
pub fn render_prompt(template: &str, vocabulary: &str, review_text: &str) -> String {
    let rendered = template.replacen(RANKINGS_PLACEHOLDER, vocabulary, 1);
    format!("{rendered}{review_text}")
}

/// Trait for review classification backends
///
/// Implementations return the backend's raw text response untouched; label
/// resolution against the category list is the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a review into a label drawn from the given vocabulary
    async fn classify(
        &self,
        prompt_template: &str,
        vocabulary: &str,
        review_text: &str,
    ) -> AppResult<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// [`Classifier`] backed by an OpenAI-compatible chat completion endpoint
#[derive(Clone)]
pub struct ChatClassifier {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl ChatClassifier {
    pub fn new(api_key: String, api_url: String, model: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(CLASSIFIER_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for ChatClassifier {
    async fn classify(
        &self,
        prompt_template: &str,
        vocabulary: &str,
        review_text: &str,
    ) -> AppResult<String> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "could not read classifier API key".to_string(),
            ));
        }

        if prompt_template.trim().is_empty() {
            return Err(AppError::Configuration(
                "missing base prompt template".to_string(),
            ));
        }

        let prompt = render_prompt(prompt_template, vocabulary, review_text);
        tracing::debug!(prompt = %prompt, "Sending classification prompt");

        let url = format!("{}/chat/completions", self.api_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Classification backend request failed"
            );
            return Err(AppError::Classifier(format!(
                "classification backend returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;

        let completion: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize classification response"
            );
            AppError::Classifier(format!("failed to parse classification response: {}", e))
        })?;

        let label = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Classifier("classification response contained no choices".to_string())
            })?;

        tracing::info!(label = %label, "Classification completed");

        Ok(label)
    }
}
