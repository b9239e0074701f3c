/// LLM Client — the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gpt-4o-mini (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod retry;

use retry::{with_rate_limit_retry, MAX_ATTEMPTS, RATE_LIMIT_WAIT};

/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True only for the explicit rate-limit signal from the API.
    /// This is the single condition the retry wrapper acts on.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::Api { status: 429, .. })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Trait seam over the chat-completion call so the interview engine and its
/// tests can run against a scripted fake.
///
/// Carried in `AppState` as `Arc<dyn ChatCompletions>`.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    /// Sends a single user prompt and returns the trimmed completion text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;
}

/// The production client. Wraps the OpenAI chat-completions endpoint with
/// the fixed rate-limit retry policy.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }

    /// One attempt against the API, no retry. 429 surfaces as a distinct
    /// rate-limit `Api` error for the wrapper to act on.
    async fn send_once(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl ChatCompletions for LlmClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        with_rate_limit_retry(MAX_ATTEMPTS, RATE_LIMIT_WAIT, || {
            self.send_once(prompt, max_tokens)
        })
        .await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output so the
/// payload can be fed to `serde_json` directly.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match stripped {
        Some(inner) => {
            let inner = inner.trim_start();
            inner.strip_suffix("```").map(str::trim).unwrap_or(inner)
        }
        None => text,
    }
}
