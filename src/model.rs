// ABOUTME: Presentation data model for the party-slides application
// ABOUTME: Defines slides, presentations, themes and validated generation requests

use crate::errors::{Result, SlideError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Glyph used whenever generation does not supply an emoji.
pub const FALLBACK_EMOJI: &str = "🎉";

/// Most topics a request may carry after blank entries are dropped.
pub const MAX_TOPICS: usize = 3;

/// Inclusive range of supported slide counts.
pub const MIN_SLIDES: usize = 1;
pub const MAX_SLIDES: usize = 20;

/// One unit of display content.
///
/// `content` is empty for image-only slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based position within the presentation.
    pub id: usize,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub emoji: String,
}

impl Slide {
    pub fn is_image_only(&self) -> bool {
        self.content.is_empty()
    }
}

/// Fixed set of color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Party,
    Neon,
    Sunset,
    Ocean,
    Forest,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Party,
        Theme::Neon,
        Theme::Sunset,
        Theme::Ocean,
        Theme::Forest,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Theme::Party => "party",
            Theme::Neon => "neon",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
        }
    }

    /// CSS background treatment.
    pub fn background(&self) -> &'static str {
        match self {
            Theme::Party => "linear-gradient(135deg, #ff6b6b, #feca57, #48dbfb, #ff9ff3)",
            Theme::Neon => "linear-gradient(135deg, #00d2ff, #3a7bd5, #00f2fe, #4facfe)",
            Theme::Sunset => "linear-gradient(135deg, #ff9a9e, #fecfef, #ffecd2, #fcb69f)",
            Theme::Ocean => "linear-gradient(135deg, #667eea, #764ba2, #89f7fe, #66a6ff)",
            Theme::Forest => "linear-gradient(135deg, #11998e, #38ef7d, #56ab2f, #a8edea)",
        }
    }

    /// Foreground text color as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Theme::Sunset => "#333333",
            _ => "#ffffff",
        }
    }

    /// Solid color standing in for the gradient on surfaces that cannot draw one.
    pub fn accent(&self) -> &'static str {
        match self {
            Theme::Party => "#ff6b6b",
            Theme::Neon => "#3a7bd5",
            Theme::Sunset => "#ff9a9e",
            Theme::Ocean => "#667eea",
            Theme::Forest => "#11998e",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.id() == wanted)
            .ok_or_else(|| SlideError::ValidationError(format!("Unknown theme: {}", s)))
    }
}

/// A generated slideshow. Owned by whoever generated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: String,
    pub title: String,
    pub slides: Vec<Slide>,
    pub theme: Theme,
    pub created_at: DateTime<Utc>,
}

impl Presentation {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }
}

/// Validated input for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topics: Vec<String>,
    slide_count: usize,
    theme: Theme,
}

impl GenerationRequest {
    /// Build a request, dropping blank topics and checking bounds.
    pub fn new<I, S>(topics: I, slide_count: usize, theme: Theme) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let topics: Vec<String> = topics
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if topics.len() > MAX_TOPICS {
            return Err(SlideError::ValidationError(format!(
                "At most {} topics are allowed, got {}",
                MAX_TOPICS,
                topics.len()
            )));
        }

        validate_slide_count(slide_count)?;

        Ok(Self {
            topics,
            slide_count,
            theme,
        })
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }
}

/// Check a slide count against the supported range.
pub fn validate_slide_count(slide_count: usize) -> Result<()> {
    if !(MIN_SLIDES..=MAX_SLIDES).contains(&slide_count) {
        return Err(SlideError::ValidationError(format!(
            "Slide count must be between {} and {}, got {}",
            MIN_SLIDES, MAX_SLIDES, slide_count
        )));
    }
    Ok(())
}
