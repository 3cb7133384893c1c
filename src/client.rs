// ABOUTME: Remote client for the text and image generation service
// ABOUTME: Issues one blocking HTTP request per generation step with bearer authentication

use crate::config::Config;
use crate::errors::{Result, SlideError};
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of a chat-style text completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Single user-message request.
    pub fn user(model: &str, prompt: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens,
            temperature,
        }
    }

    pub fn prompt(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Body of an image generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
}

impl ImageRequest {
    pub fn single(model: &str, prompt: String, size: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt,
            n: 1,
            size: size.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// The two calls the pipeline needs from the remote service.
///
/// Implementations make exactly one attempt per call.
pub trait GenerationApi {
    /// Text of the first choice, or `None` when the reply carries no text.
    fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;

    /// URL of the first generated image, or `None` when the reply carries none.
    fn generate_image(&self, request: &ImageRequest) -> Result<Option<String>>;
}

impl<T: GenerationApi + ?Sized> GenerationApi for &T {
    fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        (**self).complete(request)
    }

    fn generate_image(&self, request: &ImageRequest) -> Result<Option<String>> {
        (**self).generate_image(request)
    }
}

/// Blocking client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    completions_url: Url,
    images_url: Url,
}

impl OpenAiClient {
    pub fn new(api_key: &str, config: &Config) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(SlideError::ConfigError("Missing API key".to_string()));
        }

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = config.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;

        let http = Client::builder().build().map_err(SlideError::FetchError)?;

        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            completions_url: base.join("chat/completions")?,
            images_url: base.join("images/generations")?,
        })
    }

    fn post<B: Serialize>(&self, url: &Url, body: &B) -> Result<String> {
        debug!("POST {}", url);

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(SlideError::FetchError)?;

        let status = response.status();
        let text = response.text().map_err(SlideError::FetchError)?;

        if !status.is_success() {
            warn!("Remote service answered {} for {}", status, url);
            return Err(SlideError::RemoteService {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

impl GenerationApi for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        info!(
            "Requesting completion from {} (max_tokens={})",
            request.model, request.max_tokens
        );
        let body = self.post(&self.completions_url, request)?;
        parse_completion(&body)
    }

    fn generate_image(&self, request: &ImageRequest) -> Result<Option<String>> {
        info!("Requesting {} image from {}", request.size, request.model);
        let body = self.post(&self.images_url, request)?;
        parse_image(&body)
    }
}

/// Pull the first choice's text out of a completion envelope
pub fn parse_completion(body: &str) -> Result<Option<String>> {
    let envelope: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| SlideError::ParseError(format!("completion envelope: {}", e)))?;

    Ok(envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content))
}

/// Pull the first image URL out of an image generation envelope
pub fn parse_image(body: &str) -> Result<Option<String>> {
    let envelope: ImageResponse = serde_json::from_str(body)
        .map_err(|e| SlideError::ParseError(format!("image envelope: {}", e)))?;

    Ok(envelope.data.into_iter().next().and_then(|image| image.url))
}
