// ABOUTME: Slide generation pipeline for the party-slides application
// ABOUTME: Sequences title, narrative, per-slide text and per-slide image calls into a presentation

use crate::client::{CompletionRequest, GenerationApi, ImageRequest};
use crate::config::{CallParams, Config};
use crate::errors::{Result, SlideError, Stage};
use crate::model::{GenerationRequest, Presentation, Slide, Theme, FALLBACK_EMOJI};
use crate::prompts::{self, SlideContext, SlideKind};
use crate::utils;
use chrono::Utc;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

pub const DEFAULT_TITLE: &str = "Amazing Party Presentation";
pub const DEFAULT_NARRATIVE: &str =
    "A fun journey through unexpected party adventures with surprising twists and memorable moments.";

/// Body used for minimal-text slides whose reply had no usable content.
pub const FALLBACK_CONTENT: &str = "Get ready for fun!";
pub const FALLBACK_IMAGE_ONLY_TITLE: &str = "Party!";
pub const FALLBACK_MINIMAL_TITLE: &str = "Amazing";

/// Image prompt title and context used when a slide reply could not be decoded.
pub const FALLBACK_IMAGE_TITLE: &str = "Party Time";
pub const FALLBACK_IMAGE_CONTEXT: &str = "Amazing";

/// Anything that can turn a request into a complete presentation.
pub trait PresentationSource {
    fn generate(&mut self, request: &GenerationRequest) -> Result<Presentation>;
}

/// Fields decoded from a per-slide reply. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct SlideDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Decode the JSON object embedded in a per-slide reply.
///
/// The object may be wrapped in prose or a code fence; the outermost braces are used.
pub fn parse_slide_reply(reply: &str) -> Result<SlideDraft> {
    let start = reply
        .find('{')
        .ok_or_else(|| SlideError::ParseError("no JSON object in slide reply".to_string()))?;
    let end = reply
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| SlideError::ParseError("unterminated JSON object in slide reply".to_string()))?;

    serde_json::from_str(&reply[start..=end])
        .map_err(|e| SlideError::ParseError(format!("slide reply: {}", e)))
}

/// Turn a decoded draft (or a parse failure) into a slide for `ordinal`.
///
/// Image-only slides always end up with empty content and minimal-text slides never do.
pub fn build_slide(ordinal: usize, kind: SlideKind, draft: Option<SlideDraft>) -> Slide {
    let Some(draft) = draft else {
        let (title, content) = match kind {
            SlideKind::ImageOnly => (FALLBACK_IMAGE_ONLY_TITLE, ""),
            SlideKind::MinimalText => (FALLBACK_MINIMAL_TITLE, FALLBACK_CONTENT),
        };
        return Slide {
            id: ordinal,
            title: title.to_string(),
            content: content.to_string(),
            image_url: None,
            emoji: FALLBACK_EMOJI.to_string(),
        };
    };

    let title = non_blank(draft.title).unwrap_or_else(|| format!("Slide {}", ordinal));
    let content = match kind {
        SlideKind::ImageOnly => String::new(),
        SlideKind::MinimalText => {
            non_blank(draft.content).unwrap_or_else(|| FALLBACK_CONTENT.to_string())
        }
    };
    let emoji = non_blank(draft.emoji).unwrap_or_else(|| FALLBACK_EMOJI.to_string());

    Slide {
        id: ordinal,
        title,
        content,
        image_url: None,
        emoji,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim whitespace and any quotes the model wrapped around a one-line answer.
fn clean_reply(reply: &str) -> String {
    reply
        .trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim()
        .to_string()
}

/// Builds presentations by calling the remote service one stage at a time.
pub struct SlidePipeline<C, R = StdRng> {
    client: C,
    config: Config,
    rng: R,
}

impl<C: GenerationApi> SlidePipeline<C, StdRng> {
    /// Pipeline with a random source seeded from `config.seed`, or from entropy.
    pub fn new(client: C, config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(client, config, rng)
    }
}

impl<C: GenerationApi, R: Rng> SlidePipeline<C, R> {
    pub fn with_rng(client: C, config: Config, rng: R) -> Self {
        Self {
            client,
            config,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage in order and assemble the presentation.
    ///
    /// Text stage failures abort the run. Image failures only drop that slide's image.
    pub fn run(&mut self, request: &GenerationRequest) -> Result<Presentation> {
        let topics = request.topics();
        let total = request.slide_count();
        let theme = request.theme();

        info!(
            "Generating {} slide presentation with theme {} ({} topics)",
            total,
            theme,
            topics.len()
        );

        let title = self
            .generate_title(topics)
            .map_err(|e| SlideError::generation_failed(Stage::Title, e))?;
        info!("Presentation title: {}", title);

        let narrative = if self.config.include_narrative {
            let narrative = self
                .generate_narrative(topics, &title, total)
                .map_err(|e| SlideError::generation_failed(Stage::Narrative, e))?;
            debug!("Narrative: {}", narrative);
            Some(narrative)
        } else {
            None
        };

        let mut slides = Vec::with_capacity(total);
        for ordinal in 1..=total {
            let kind = self.choose_kind();
            let ctx = SlideContext {
                ordinal,
                total,
                presentation_title: &title,
                topics,
                narrative: narrative.as_deref(),
                kind,
            };

            let (mut slide, decoded) = self
                .generate_slide_text(&ctx)
                .map_err(|e| SlideError::generation_failed(Stage::SlideText(ordinal), e))?;
            slide.image_url = if decoded {
                self.generate_image(ordinal, &slide.title, &slide.content, theme)
            } else {
                self.generate_image(ordinal, FALLBACK_IMAGE_TITLE, FALLBACK_IMAGE_CONTEXT, theme)
            };

            info!(
                "Slide {}/{} ready: {:?} ({:?}, image: {})",
                ordinal,
                total,
                slide.title,
                kind,
                slide.image_url.is_some()
            );
            slides.push(slide);
        }

        Ok(Presentation {
            id: utils::timestamp_id(),
            title,
            slides,
            theme,
            created_at: Utc::now(),
        })
    }

    /// Independent weighted draw for one slide's layout.
    pub fn choose_kind(&mut self) -> SlideKind {
        let p = self.config.image_only_probability;
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        if self.rng.gen_bool(p) {
            SlideKind::ImageOnly
        } else {
            SlideKind::MinimalText
        }
    }

    fn complete_text(&self, prompt: String, params: CallParams) -> Result<Option<String>> {
        let request = CompletionRequest::user(
            &self.config.text_model,
            prompt,
            params.max_tokens,
            params.temperature,
        );

        match self.client.complete(&request) {
            Ok(reply) => Ok(reply.map(|r| clean_reply(&r)).filter(|r| !r.is_empty())),
            Err(SlideError::ParseError(reason)) => {
                warn!("Unreadable completion, using fallback: {}", reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn generate_title(&self, topics: &[String]) -> Result<String> {
        let reply = self.complete_text(prompts::title_prompt(topics), self.config.title_params)?;
        Ok(reply.unwrap_or_else(|| {
            warn!("Title reply was empty, using default title");
            DEFAULT_TITLE.to_string()
        }))
    }

    fn generate_narrative(&self, topics: &[String], title: &str, total: usize) -> Result<String> {
        let reply = self.complete_text(
            prompts::narrative_prompt(topics, title, total),
            self.config.narrative_params,
        )?;
        Ok(reply.unwrap_or_else(|| {
            warn!("Narrative reply was empty, using default narrative");
            DEFAULT_NARRATIVE.to_string()
        }))
    }

    /// The flag is false when the reply was unusable and fallback text was used.
    fn generate_slide_text(&self, ctx: &SlideContext<'_>) -> Result<(Slide, bool)> {
        let reply = self.complete_text(prompts::slide_prompt(ctx), self.config.slide_params)?;

        let draft = match reply.as_deref().map(parse_slide_reply) {
            Some(Ok(draft)) => Some(draft),
            Some(Err(e)) => {
                warn!("Slide {} reply unusable, using fallback: {}", ctx.ordinal, e);
                None
            }
            None => {
                warn!("Slide {} reply was empty, using fallback", ctx.ordinal);
                None
            }
        };

        let decoded = draft.is_some();
        Ok((build_slide(ctx.ordinal, ctx.kind, draft), decoded))
    }

    /// Never fails: any error becomes a missing image.
    fn generate_image(
        &self,
        ordinal: usize,
        title: &str,
        content: &str,
        theme: Theme,
    ) -> Option<String> {
        let request = ImageRequest::single(
            &self.config.image_model,
            prompts::image_prompt(title, content, theme),
            &self.config.image_size,
        );

        match self.client.generate_image(&request) {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                warn!("Image reply for slide {} carried no URL", ordinal);
                None
            }
            Err(e) => {
                warn!("Image generation failed for slide {}: {}", ordinal, e);
                None
            }
        }
    }
}

impl<C: GenerationApi, R: Rng> PresentationSource for SlidePipeline<C, R> {
    fn generate(&mut self, request: &GenerationRequest) -> Result<Presentation> {
        self.run(request)
    }
}
