// ABOUTME: Library module for the party-slides program.
// ABOUTME: Contains the generation pipeline, presentation model and slideshow renderers.

// Reexport modules
pub mod client;
pub mod config;
pub mod errors;
pub mod html;
pub mod mock;
pub mod model;
pub mod navigation;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod terminal;
pub mod utils;

// Reexport common types and functions
pub use client::{GenerationApi, OpenAiClient};
pub use config::{Config, SessionState};
pub use errors::{Result, SlideError, Stage};
pub use html::{extract_slides_data, generate_presentation_html, write_html_to_file};
pub use mock::{MockPipeline, Scenario};
pub use model::{GenerationRequest, Presentation, Slide, Theme};
pub use navigation::{NavKey, NavOutcome, Navigator, Presenter, SlideView};
pub use pipeline::{PresentationSource, SlidePipeline};
pub use server::DocumentServer;
pub use terminal::present_in_terminal;

#[cfg(test)]
mod tests;
