// ABOUTME: Offline stand-in for the generation pipeline
// ABOUTME: Builds presentations from a fixed template table without touching the network

use crate::errors::Result;
use crate::model::{self, GenerationRequest, Presentation, Slide, Theme};
use crate::pipeline::PresentationSource;
use crate::utils;
use chrono::Utc;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// One row of the template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideTemplate {
    pub title: &'static str,
    pub content: &'static str,
    pub emoji: &'static str,
    pub has_image: bool,
}

const fn template(
    title: &'static str,
    content: &'static str,
    emoji: &'static str,
    has_image: bool,
) -> SlideTemplate {
    SlideTemplate {
        title,
        content,
        emoji,
        has_image,
    }
}

pub const SLIDE_TEMPLATES: [SlideTemplate; 10] = [
    template("Welcome!", "Let the party begin!", "🎉", false),
    template("Fun Facts", "Did you know penguins can jump 6 feet high?", "🐧", true),
    template("Mystery", "", "🔍", true),
    template("Dance Time", "Show us your best moves!", "💃", false),
    template("Surprise", "Plot twist incoming...", "😱", true),
    template("Adventure", "", "🗺️", true),
    template("Celebration", "You made it to the end!", "🏆", false),
    template("Magic", "Abracadabra!", "✨", true),
    template("Journey", "", "🚀", true),
    template("Victory", "Champions never quit!", "🎯", false),
];

pub const MOCK_TITLES: [&str; 8] = [
    "🎪 Amazing Party Adventures",
    "🌟 Epic Fun Journey",
    "🎭 Spectacular Entertainment Show",
    "🎨 Creative Party Experience",
    "🎵 Musical Mystery Tour",
    "🎲 Random Fun Generator",
    "🎊 Celebration Spectacular",
    "🎈 Party Time Extravaganza",
];

/// Fixed image for the templated titles, random placeholder otherwise.
fn mock_image_url<R: Rng>(title: &str, rng: &mut R) -> String {
    let slot = match title {
        "Fun Facts" => 1,
        "Mystery" => 2,
        "Surprise" => 3,
        "Adventure" => 4,
        "Magic" => 5,
        "Journey" => 6,
        _ => rng.gen_range(0..100),
    };
    format!("https://picsum.photos/400/300?random={}", slot)
}

/// Canned demo presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    QuickDemo,
    StandardParty,
    ExtendedShow,
    ImageHeavy,
    TextOnly,
    RandomMix,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::QuickDemo,
        Scenario::StandardParty,
        Scenario::ExtendedShow,
        Scenario::ImageHeavy,
        Scenario::TextOnly,
        Scenario::RandomMix,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::QuickDemo => "quick-demo",
            Scenario::StandardParty => "standard-party",
            Scenario::ExtendedShow => "extended-show",
            Scenario::ImageHeavy => "image-heavy",
            Scenario::TextOnly => "text-only",
            Scenario::RandomMix => "random-mix",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = crate::errors::SlideError;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name() == s.trim())
            .ok_or_else(|| {
                crate::errors::SlideError::ValidationError(format!("Unknown scenario: {}", s))
            })
    }
}

/// Synthesizes presentations locally.
pub struct MockPipeline<R = StdRng> {
    rng: R,
}

impl MockPipeline<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MockPipeline<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MockPipeline<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Build `slide_count` slides, reusing templates round-robin.
    pub fn slides(&mut self, slide_count: usize) -> Vec<Slide> {
        (0..slide_count)
            .map(|i| {
                let template = &SLIDE_TEMPLATES[i % SLIDE_TEMPLATES.len()];
                Slide {
                    id: i + 1,
                    title: template.title.to_string(),
                    content: template.content.to_string(),
                    image_url: template
                        .has_image
                        .then(|| mock_image_url(template.title, &mut self.rng)),
                    emoji: template.emoji.to_string(),
                }
            })
            .collect()
    }

    /// Build a presentation; the theme is drawn at random when not given.
    pub fn presentation(&mut self, slide_count: usize, theme: Option<Theme>) -> Result<Presentation> {
        model::validate_slide_count(slide_count)?;

        let theme = match theme {
            Some(theme) => theme,
            None => *Theme::ALL.choose(&mut self.rng).unwrap_or(&Theme::Party),
        };
        let title = MOCK_TITLES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MOCK_TITLES[0])
            .to_string();
        let slides = self.slides(slide_count);

        info!(
            "Built mock presentation {:?} with {} slides ({})",
            title, slide_count, theme
        );

        Ok(Presentation {
            id: format!("mock-{}", utils::timestamp_id()),
            title,
            slides,
            theme,
            created_at: Utc::now(),
        })
    }

    /// Build one of the canned demo presentations.
    pub fn scenario(&mut self, scenario: Scenario) -> Result<Presentation> {
        match scenario {
            Scenario::QuickDemo => self.presentation(3, Some(Theme::Party)),
            Scenario::StandardParty => self.presentation(5, Some(Theme::Neon)),
            Scenario::ExtendedShow => self.presentation(8, Some(Theme::Sunset)),
            Scenario::ImageHeavy => {
                let mut presentation = self.presentation(4, Some(Theme::Ocean))?;
                for slide in &mut presentation.slides {
                    slide.image_url = Some(mock_image_url(&slide.title, &mut self.rng));
                }
                Ok(presentation)
            }
            Scenario::TextOnly => {
                let mut presentation = self.presentation(4, Some(Theme::Forest))?;
                for slide in &mut presentation.slides {
                    slide.image_url = None;
                }
                Ok(presentation)
            }
            Scenario::RandomMix => {
                let count = self.rng.gen_range(3..=8);
                self.presentation(count, None)
            }
        }
    }
}

impl<R: Rng> PresentationSource for MockPipeline<R> {
    fn generate(&mut self, request: &GenerationRequest) -> Result<Presentation> {
        self.presentation(request.slide_count(), Some(request.theme()))
    }
}
