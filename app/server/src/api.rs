//! OpenAI-compatible wire types.

use crate::ApiError;
use compact_str::CompactString;
use icore::{ChatMessage, Completion, GenerationRequest, Health, SamplingParams, translator};
use serde::{Deserialize, Serialize};

/// `POST /v1/chat/completions` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    /// Logical model name or a path ending in one.
    #[serde(default)]
    pub model: String,
    /// The conversation, in order.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; `0` decodes greedily.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Nucleus sampling threshold.
    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

fn default_temperature() -> f64 {
    SamplingParams::default().temperature
}

fn default_max_tokens() -> usize {
    SamplingParams::default().max_tokens
}

fn default_top_p() -> f64 {
    SamplingParams::default().top_p
}

impl ChatCompletionRequest {
    /// Validate the body and classify the model name.
    ///
    /// Path-like names are reduced to their last segment. Sampling values are
    /// passed through: a temperature of zero or below decodes greedily.
    pub fn generation(&self) -> Result<GenerationRequest, ApiError> {
        let raw = self.model.trim();
        if raw.is_empty() {
            return Err(ApiError::bad_request("model is required"));
        }
        let model = translator::normalize_model_name(raw)
            .ok_or_else(|| ApiError::bad_request(format!("invalid model name '{raw}'")))?;

        Ok(GenerationRequest {
            model: CompactString::from(model),
            messages: self.messages.clone(),
            params: SamplingParams {
                temperature: self.temperature,
                top_p: self.top_p,
                max_tokens: self.max_tokens,
            },
        })
    }
}

/// `POST /v1/chat/completions` response body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletion {
    /// `chatcmpl-` followed by 12 hex digits.
    pub id: String,
    /// Always `chat.completion`.
    pub object: &'static str,
    /// Unix timestamp in seconds.
    pub created: i64,
    /// The model name as sent by the caller.
    pub model: String,
    /// Exactly one choice.
    pub choices: Vec<Choice>,
    /// Token accounting.
    pub usage: Usage,
}

impl ChatCompletion {
    /// Build the response for `completion`, echoing the requested model.
    pub fn new(model: String, completion: Completion) -> Self {
        let usage = Usage {
            prompt_tokens: completion.generation.prompt_tokens,
            completion_tokens: completion.generation.completion_tokens,
            total_tokens: completion.generation.total_tokens(),
        };
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id: format!("chatcmpl-{}", &uuid[..12]),
            object: "chat.completion",
            created: chrono::Utc::now().timestamp(),
            model,
            choices: vec![Choice {
                index: 0,
                message: ChatMessage::assistant(completion.content),
                finish_reason: "stop",
            }],
            usage,
        }
    }
}

/// One completion choice.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    /// Position in `choices`.
    pub index: usize,
    /// The assistant message.
    pub message: ChatMessage,
    /// Always `stop`.
    pub finish_reason: &'static str,
}

/// Token accounting of a completion.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// `GET /v1/models` response body.
#[derive(Debug, Clone, Serialize)]
pub struct ModelList {
    /// Always `list`.
    pub object: &'static str,
    /// Registered models, sorted by id.
    pub data: Vec<ModelCard>,
}

impl ModelList {
    /// List `names` in order.
    pub fn new(names: impl IntoIterator<Item = CompactString>) -> Self {
        Self {
            object: "list",
            data: names
                .into_iter()
                .map(|id| ModelCard {
                    id,
                    object: "model",
                    owned_by: "local",
                })
                .collect(),
        }
    }
}

/// One entry of [`ModelList`].
#[derive(Debug, Clone, Serialize)]
pub struct ModelCard {
    pub id: CompactString,
    pub object: &'static str,
    pub owned_by: &'static str,
}

/// `GET /health` response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Resident models, least-recently-used first.
    pub loaded_models: Vec<CompactString>,
    /// Cache capacity.
    pub max_loaded: usize,
    /// Local artifact root.
    pub models_dir: String,
    /// Whether inference runs on an accelerator.
    pub gpu: bool,
}

impl From<Health> for HealthResponse {
    fn from(health: Health) -> Self {
        Self {
            status: "ok",
            loaded_models: health.loaded_models,
            max_loaded: health.max_loaded,
            models_dir: health.models_dir.display().to_string(),
            gpu: health.gpu,
        }
    }
}
