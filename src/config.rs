// ABOUTME: Configuration module for the party-slides application
// ABOUTME: Provides request parameters, environment overrides and persisted session state

use crate::errors::{Result, SlideError};
use crate::utils;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1/";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";
pub const DEFAULT_IMAGE_SIZE: &str = "256x256";

/// Token and temperature settings for one text call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CallParams {
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Injectable request parameters for the generation pipeline
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub image_size: String,
    pub title_params: CallParams,
    pub narrative_params: CallParams,
    pub slide_params: CallParams,
    /// Chance that a slide is drawn as image-only.
    pub image_only_probability: f64,
    pub include_narrative: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            title_params: CallParams::new(30, 0.9),
            narrative_params: CallParams::new(150, 0.8),
            slide_params: CallParams::new(100, 0.9),
            image_only_probability: 0.7,
            include_narrative: true,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base = env::var("PARTY_SLIDES_API_BASE").unwrap_or(defaults.api_base);
        let text_model = env::var("PARTY_SLIDES_TEXT_MODEL").unwrap_or(defaults.text_model);
        let image_model = env::var("PARTY_SLIDES_IMAGE_MODEL").unwrap_or(defaults.image_model);
        let image_size = env::var("PARTY_SLIDES_IMAGE_SIZE").unwrap_or(defaults.image_size);
        let image_only_probability = env::var("PARTY_SLIDES_IMAGE_ONLY_PROBABILITY")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|p| (0.0..=1.0).contains(p))
            .unwrap_or(defaults.image_only_probability);
        let include_narrative = env::var("PARTY_SLIDES_NARRATIVE")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let seed = env::var("PARTY_SLIDES_SEED")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        Self {
            api_base,
            text_model,
            image_model,
            image_size,
            image_only_probability,
            include_narrative,
            seed,
            ..defaults
        }
    }

    /// Check values a caller may have set by hand
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.image_only_probability) {
            return Err(SlideError::ConfigError(format!(
                "image_only_probability must be within [0, 1], got {}",
                self.image_only_probability
            )));
        }
        if self.text_model.trim().is_empty() || self.image_model.trim().is_empty() {
            return Err(SlideError::ConfigError(
                "Model identifiers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// State that outlives a single run: the credential and the popup notice flag.
///
/// Loaded once at session start and only changed by explicit user action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub popup_acknowledged: bool,
}

impl SessionState {
    /// Default location of the state file
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("PARTY_SLIDES_STATE") {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".party-slides.json")
    }

    /// Load state from disk. A missing file yields empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No session state at {:?}, starting fresh", path);
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(SlideError::FileReadError)?;
        let state = serde_json::from_str(&raw)?;
        info!("Loaded session state from {:?}", path);
        Ok(state)
    }

    /// Write state to disk, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        utils::ensure_parent_directory_exists(path)?;
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).map_err(SlideError::FileReadError)?;
        info!("Saved session state to {:?}", path);
        Ok(())
    }

    /// Store a credential after checking its shape
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SlideError::ValidationError(
                "Please enter your OpenAI API key".to_string(),
            ));
        }
        if !key.starts_with("sk-") {
            return Err(SlideError::ValidationError(
                "OpenAI API keys should start with \"sk-\"".to_string(),
            ));
        }
        self.api_key = Some(key.to_string());
        Ok(())
    }

    pub fn clear_api_key(&mut self) {
        self.api_key = None;
    }

    pub fn acknowledge_popup(&mut self) {
        self.popup_acknowledged = true;
    }

    /// Credential from state, falling back to `OPENAI_API_KEY`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()))
    }
}
