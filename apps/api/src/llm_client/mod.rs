/// LLM Client — the single point of entry for all model calls in jobdeck.
///
/// ARCHITECTURAL RULE: No other module may call the chat completions API
/// directly. All LLM interactions MUST go through this module.
///
/// The client speaks the OpenAI-compatible chat completions wire against the
/// GitHub Models endpoint and walks an ordered fallback list: the preferred
/// model first, a cheaper one to absorb rate limits. Auth failures stop the
/// walk immediately.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const CHAT_COMPLETIONS_URL: &str = "https://models.inference.ai.azure.com/chat/completions";
/// Models tried in order on rate limits and server errors.
pub const MODELS: [&str; 2] = ["gpt-4o", "gpt-4o-mini"];
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI service not configured. Set the GITHUB_TOKEN environment variable.")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API token. Please check your GITHUB_TOKEN.")]
    Unauthorized,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse AI response as JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Service is busy due to high demand. Please try again shortly.")]
    AllModelsBusy,

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the assistant text from the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by all services in jobdeck.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    token: Option<String>,
}

impl LlmClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            token,
        }
    }

    /// Whether a token is present. /health reports this to the frontend.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Makes a chat completions call, returning the full response object.
    /// Walks the model fallback list on 429s and 5xx errors; fails fast on
    /// auth errors since no model will accept a bad token.
    pub async fn call(&self, system: &str, prompt: &str) -> Result<ChatResponse, LlmError> {
        let token = self.token.as_deref().ok_or(LlmError::NotConfigured)?;

        let mut last_error: Option<LlmError> = None;

        for model in MODELS {
            debug!("Attempting LLM call with model {model}");

            let request_body = ChatRequest {
                model,
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: system,
                    },
                    ChatMessage {
                        role: "user",
                        content: prompt,
                    },
                ],
            };

            let response = self
                .client
                .post(CHAT_COMPLETIONS_URL)
                .bearer_auth(token)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    warn!("LLM request with {model} failed: {e}");
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(LlmError::Unauthorized);
            }

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {status} for {model}: {body}");
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse a structured error message
                let message = serde_json::from_str::<ApiError>(&body)
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
                    "LLM call succeeded with {model}: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat);
        }

        Err(last_error.unwrap_or(LlmError::AllModelsBusy))
    }

    /// Convenience method that calls the LLM and deserializes the text
    /// response as JSON. The prompt must instruct the model to return JSON;
    /// a reminder is appended regardless.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, LlmError> {
        let prompt = format!("{prompt}\n\nIMPORTANT: Output ONLY valid JSON.");
        let response = self.call(system, &prompt).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let text = extract_json(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips fences and trims to the outermost JSON object. Models wrap JSON in
/// ```json fences or lead with prose often enough that both cleanups pay off.
fn extract_json(text: &str) -> &str {
    let text = strip_json_fences(text);
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
