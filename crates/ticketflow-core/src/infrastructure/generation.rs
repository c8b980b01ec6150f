//! Text generation adapters
//!
//! `GeminiClient` talks to the Google Generative Language REST API.
//! `DisabledGenerator` is wired in when generation is off or has no key, so
//! every caller takes its fallback path. `ScriptedGenerator` replays canned
//! answers for tests and offline runs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ports::outbound::{GenerationError, TextGenerator};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Longest error body kept in `GenerationError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Text generation settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    /// Enabled and holding a non-blank key.
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Request timeout in seconds. Zero would fail every call, so it falls
    /// back to the default.
    pub fn effective_timeout_secs(&self) -> u64 {
        if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs
        }
    }
}

/// Pick the generator for a configuration.
pub fn build_generator(config: &GenerationConfig) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    if config.is_active() {
        info!(model = %config.model, timeout_secs = config.timeout_secs, "text generation enabled");
        Ok(Arc::new(GeminiClient::new(config)?))
    } else {
        info!("text generation disabled, fallbacks only");
        Ok(Arc::new(DisabledGenerator))
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::Disabled)?;

        let timeout_secs = config.effective_timeout_secs();
        if timeout_secs != config.timeout_secs {
            warn!(configured = config.timeout_secs, using = timeout_secs, "invalid generation timeout");
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key,
            timeout_secs,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            // strip the URL, it carries the key
            GenerationError::Http(e.without_url().to_string())
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Text of the first candidate's first text part, trimmed.
pub fn extract_text(body: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: [RequestContent { parts: [RequestPart { text: prompt }] }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let mut body = body;
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            return Err(GenerationError::Status { status: status.as_u16(), body });
        }

        let text = extract_text(&body)?;
        debug!(prompt_chars = prompt.len(), response_chars = text.len(), "generation complete");
        Ok(text)
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0)
}

/// Always unavailable
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

/// Replays queued answers in order, then a fixed default (unavailable unless set).
#[derive(Default)]
pub struct ScriptedGenerator {
    queue: Mutex<VecDeque<Result<String, GenerationError>>>,
    default: Option<Result<String, GenerationError>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: impl IntoIterator<Item = Result<String, GenerationError>>) -> Self {
        Self {
            queue: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Answer every prompt with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            default: Some(Ok(text.into())),
            ..Self::default()
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let next = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        next.or_else(|| self.default.clone())
            .unwrap_or(Err(GenerationError::Disabled))
    }
}
