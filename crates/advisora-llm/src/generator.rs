use async_trait::async_trait;
use tracing::info;

use crate::chat::{self, ChatMessage, ChatRequest, Completion};
use crate::client::OpenAiClient;
use crate::error::LlmError;

/// What to generate: a system prompt, a user prompt, and sampling settings.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: Option<f32>,
}

/// Availability of the configured model, as reported by the health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Ok,
    Missing(String),
    Error(String),
}

impl ModelStatus {
    /// The wording used in the health endpoint.
    pub fn describe(&self) -> String {
        match self {
            ModelStatus::Ok => "ok".to_string(),
            ModelStatus::Missing(model) => format!("warning: {model} not available"),
            ModelStatus::Error(msg) => format!("error: {msg}"),
        }
    }
}

/// Anything that can turn a prompt into document text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, LlmError>;

    async fn model_status(&self) -> ModelStatus;
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, LlmError> {
        let chat_request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt.as_str()),
                ChatMessage::user(request.user_prompt.as_str()),
            ],
            max_tokens: self.config.max_tokens,
            temperature: request.temperature,
        };

        info!(model = %chat_request.model, "generating document text");

        let client = self;
        let chat_request = &chat_request;
        self.config
            .retry
            .run("chat_completion", move |_| chat::chat_completion(client, chat_request))
            .await
            .map_err(|f| LlmError::RetriesExhausted {
                attempts: f.attempts,
                last: Box::new(f.last),
            })
    }

    async fn model_status(&self) -> ModelStatus {
        match chat::list_models(self).await {
            Ok(models) if models.iter().any(|m| m == &self.config.model) => ModelStatus::Ok,
            Ok(_) => ModelStatus::Missing(self.config.model.clone()),
            Err(e) => ModelStatus::Error(e.to_string()),
        }
    }
}
