// ABOUTME: Error types for the party-slides application
// ABOUTME: Provides structured error handling for each stage of the generation pipeline

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The pipeline stage a failure was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Title,
    Narrative,
    SlideText(usize),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Title => write!(f, "title"),
            Stage::Narrative => write!(f, "narrative"),
            Stage::SlideText(ordinal) => write!(f, "slide {} text", ordinal),
        }
    }
}

#[derive(Error, Debug)]
pub enum SlideError {
    #[error("Remote service error: HTTP {status}")]
    RemoteService { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Raised when the title, narrative or a slide text stage fails outright.
    /// The message is the only thing shown to the user.
    #[error("Failed to generate presentation. Please check your API key and try again.")]
    GenerationFailed {
        stage: Stage,
        #[source]
        source: Box<SlideError>,
    },

    #[error("Failed to reach remote service: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("Serve error: {0}")]
    ServeError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl SlideError {
    /// Wrap a stage failure into the aggregate error surfaced to the user.
    pub fn generation_failed(stage: Stage, source: SlideError) -> Self {
        SlideError::GenerationFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// HTTP status carried by a remote failure, looking through the aggregate.
    pub fn status(&self) -> Option<u16> {
        match self {
            SlideError::RemoteService { status, .. } => Some(*status),
            SlideError::GenerationFailed { source, .. } => source.status(),
            _ => None,
        }
    }
}

// Implement conversion from anyhow::Error to our SlideError
impl From<anyhow::Error> for SlideError {
    fn from(err: anyhow::Error) -> Self {
        SlideError::UnknownError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlideError>;
