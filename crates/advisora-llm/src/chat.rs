//! Chat completion calls against an OpenAI-compatible API.
//!
//! Only the two endpoints the service needs are covered:
//!
//! - `POST /chat/completions`: one system message plus one user message,
//!   returning the first choice's text.
//! - `GET /models`: used by the health check to confirm the configured model
//!   is available to this API key.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::error::LlmError;
use crate::tokens::{self, TokenCount};

const MODEL_LIST_TIMEOUT: Duration = Duration::from_secs(5);

// ── Types ────────────────────────────────────────────────────────────────────

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// The generated text plus accounting data.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub usage: TokenCount,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Calls ────────────────────────────────────────────────────────────────────

/// Send one chat completion request and return the first choice's text.
pub async fn chat_completion(
    client: &OpenAiClient,
    request: &ChatRequest,
) -> Result<Completion, LlmError> {
    debug!(model = %request.model, messages = request.messages.len(), "sending chat completion");

    let response = client
        .http
        .post(client.endpoint("chat/completions"))
        .bearer_auth(&client.api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }

    let parsed: CompletionResponse = serde_json::from_str(&body)
        .map_err(|e| LlmError::ResponseParse(format!("invalid completion body: {e}")))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LlmError::ResponseParse("no message content in response".to_string()))?;

    let usage = parsed
        .usage
        .map(|u| TokenCount {
            input: u.prompt_tokens,
            output: u.completion_tokens,
        })
        .unwrap_or_default();

    let model = parsed.model.unwrap_or_else(|| request.model.clone());
    let cost_usd = tokens::get_pricing(&model)
        .map(|p| p.estimate_cost(usage))
        .unwrap_or(0.0);

    info!(
        model = %model,
        input_tokens = usage.input,
        output_tokens = usage.output,
        cost_usd,
        "chat completion finished"
    );

    Ok(Completion { text, model, usage })
}

/// List the model IDs visible to this API key.
pub async fn list_models(client: &OpenAiClient) -> Result<Vec<String>, LlmError> {
    let response = client
        .http
        .get(client.endpoint("models"))
        .bearer_auth(&client.api_key)
        .timeout(MODEL_LIST_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }

    let list: ModelList = serde_json::from_str(&body)
        .map_err(|e| LlmError::ResponseParse(format!("invalid model list: {e}")))?;

    Ok(list.data.into_iter().map(|m| m.id).collect())
}

fn status_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    LlmError::Status { status, message }
}
