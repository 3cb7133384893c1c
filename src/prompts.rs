// ABOUTME: Prompt construction for each stage of the generation pipeline
// ABOUTME: Embeds topics, narrative and slide position into text and image prompts

use crate::model::Theme;
use std::fmt;

/// Where a slide sits in the story arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRole {
    Opening,
    BuildingUp,
    ClimaxResolution,
    Conclusion,
}

impl SlideRole {
    /// Role of the 1-based `ordinal` in a presentation of `total` slides.
    pub fn for_position(ordinal: usize, total: usize) -> Self {
        if ordinal <= 1 {
            SlideRole::Opening
        } else if ordinal >= total {
            SlideRole::Conclusion
        } else if ordinal <= (total + 1) / 2 {
            SlideRole::BuildingUp
        } else {
            SlideRole::ClimaxResolution
        }
    }
}

impl fmt::Display for SlideRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SlideRole::Opening => "opening",
            SlideRole::BuildingUp => "building up",
            SlideRole::ClimaxResolution => "climax/resolution",
            SlideRole::Conclusion => "conclusion",
        };
        f.write_str(text)
    }
}

/// Which layout a slide was drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    ImageOnly,
    MinimalText,
}

/// Everything a per-slide prompt needs.
pub struct SlideContext<'a> {
    pub ordinal: usize,
    pub total: usize,
    pub presentation_title: &'a str,
    pub topics: &'a [String],
    pub narrative: Option<&'a str>,
    pub kind: SlideKind,
}

pub fn title_prompt(topics: &[String]) -> String {
    let topics_text = if topics.is_empty() {
        "with completely random topics".to_string()
    } else {
        format!("incorporating these topics: {}", topics.join(", "))
    };

    format!(
        "Generate a fun, catchy title for a party presentation {}.\n\
         The title should be entertaining, memorable, and suitable for a party or icebreaker game.\n\
         Return only the title, nothing else.",
        topics_text
    )
}

pub fn narrative_prompt(topics: &[String], title: &str, slide_count: usize) -> String {
    let topics_text = if topics.is_empty() {
        "with completely random and entertaining themes".to_string()
    } else {
        format!("incorporating these topics: {}", topics.join(", "))
    };

    format!(
        "Create a cohesive narrative arc for a party presentation titled \"{}\" with {} slides {}.\n\n\
         This narrative should:\n\
         1. Create an overarching story or theme that connects all slides\n\
         2. Have a clear beginning, middle, and end progression\n\
         3. Be fun, engaging, and suitable for party entertainment\n\
         4. Include unexpected twists or surprising elements\n\
         5. Guide the flow from one slide to the next\n\n\
         Return a brief narrative outline (2-3 sentences) that will guide the individual slide creation.",
        title, slide_count, topics_text
    )
}

pub fn slide_prompt(ctx: &SlideContext<'_>) -> String {
    let topics_text = if ctx.topics.is_empty() {
        "The presentation should be completely random and entertaining".to_string()
    } else {
        format!(
            "The presentation should incorporate these topics: {}",
            ctx.topics.join(", ")
        )
    };
    let narrative_text = ctx
        .narrative
        .map(|n| format!("Follow this narrative arc: {}\n", n))
        .unwrap_or_default();
    let role = SlideRole::for_position(ctx.ordinal, ctx.total);

    let (layout, asks, content_hint) = match ctx.kind {
        SlideKind::ImageOnly => (
            "This slide should be IMAGE-ONLY with no text content - just a powerful visual that fits the narrative flow.",
            "1. A single word or very short phrase (1-3 words max) that advances the narrative\n\
             2. One relevant emoji that fits the story moment",
            "",
        ),
        SlideKind::MinimalText => (
            "This slide can have minimal text with an image that advances the narrative.",
            "1. A single word or very short phrase (1-3 words max) that fits the story flow\n\
             2. One short sentence or phrase (max 8 words) that continues the narrative\n\
             3. One relevant emoji that matches this story moment",
            "one short sentence max 8 words",
        ),
    };

    format!(
        "Create slide {ordinal} of {total} for a party presentation titled \"{title}\".\n\n\
         {topics_text}\n\
         {narrative_text}\n\
         This is the {role} part of the story. {layout}\n\n\
         Generate:\n{asks}\n\n\
         Keep it minimal, narratively coherent, and perfect for party entertainment!\n\n\
         Format your response as JSON:\n\
         {{\n  \"title\": \"single word or short phrase\",\n  \"content\": \"{content_hint}\",\n  \"emoji\": \"single emoji here\"\n}}",
        ordinal = ctx.ordinal,
        total = ctx.total,
        title = ctx.presentation_title,
        topics_text = topics_text,
        narrative_text = narrative_text,
        role = role,
        layout = layout,
        asks = asks,
        content_hint = content_hint,
    )
}

pub fn image_prompt(title: &str, content: &str, theme: Theme) -> String {
    let context = if content.is_empty() { title } else { content };
    format!(
        "Create a vibrant, party-themed image for a presentation slide titled \"{}\".\n\
         Content context: {}\n\
         Theme: {}\n\
         Style: Colorful, fun, party atmosphere, suitable for entertainment and icebreaker games.\n\
         Make it visually appealing and engaging for a party presentation.",
        title, context, theme
    )
}
