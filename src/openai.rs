//! Minimal OpenAI-compatible client acting as the remote game agent.
//!
//! We only call chat.completions and request either plain text (game code) or
//! a strict JSON object (validation verdict). Calls are instrumented and log
//! model names, latencies and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::ValidationResult;
use crate::errors::AgentError;
use crate::game_agent::{extract_game_code, GameAgent};
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
  pub prompts: Prompts,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(prompts: Prompts) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());

    // Game generation is slow; keep a generous timeout.
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, strong_model, prompts })
  }

  async fn chat(&self, req: &ChatCompletionRequest) -> Result<String, AgentError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let res = self.client.post(&url)
      .header(USER_AGENT, concat!("funlearn-agent/", env!("CARGO_PKG_VERSION")))
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(AgentError::Http { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(target: "game_agent", prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    Ok(body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default())
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_plain(&self, model: &str, system: &str, user: &str, temperature: f32) -> Result<String, AgentError> {
    let req = ChatCompletionRequest::new(model, system, user, temperature, None);
    Ok(self.chat(&req).await?.trim().to_string())
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(&self, model: &str, system: &str, user: &str, temperature: f32) -> Result<T, AgentError> {
    let req = ChatCompletionRequest::new(
      model, system, user, temperature,
      Some(ResponseFormat { r#type: "json_object".into() }),
    );
    let text = self.chat(&req).await?;
    Ok(serde_json::from_str::<T>(&text)?)
  }
}

#[async_trait]
impl GameAgent for OpenAI {
  fn name(&self) -> &str {
    "openai"
  }

  #[instrument(level = "info", skip(self, content), fields(model = %self.strong_model, content_len = content.len()))]
  async fn generate_game_code(&self, content: &str) -> Result<String, AgentError> {
    let user = fill_template(&self.prompts.game_user_template, &[("content", content)]);
    let start = Instant::now();
    let result = self.chat_plain(&self.strong_model, &self.prompts.game_system, &user, 0.7).await;
    let elapsed = start.elapsed();

    let reply = match result {
      Ok(r) => {
        info!(target: "game_agent", ?elapsed, reply_len = r.len(), "Model response received");
        r
      }
      Err(e) => {
        error!(target: "game_agent", ?elapsed, error = %e, "Model call failed during game generation");
        return Err(e);
      }
    };

    extract_game_code(&reply).ok_or(AgentError::NoCode)
  }

  #[instrument(level = "info", skip(self, source), fields(model = %self.fast_model, source_len = source.len()))]
  async fn validate_game_code(&self, source: &str) -> Result<ValidationResult, AgentError> {
    #[derive(Deserialize)]
    struct Verdict { is_valid: bool, score: f32, #[serde(default)] feedback: String }

    let user = fill_template(&self.prompts.validator_user_template, &[("code", source)]);
    let v: Verdict = self.chat_json(&self.fast_model, &self.prompts.validator_system, &user, 0.2).await?;

    // Invalid games always score 0.
    let score = if v.is_valid { v.score.clamp(0.0, 100.0).round() as u8 } else { 0 };
    Ok(ValidationResult { is_valid: v.is_valid, score, feedback: v.feedback })
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}

impl ChatCompletionRequest {
  fn new(model: &str, system: &str, user: &str, temperature: f32, response_format: Option<ResponseFormat>) -> Self {
    Self {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format,
    }
  }
}

#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
