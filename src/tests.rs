use super::*;
use crate::client::{parse_completion, parse_image, CompletionRequest, ImageRequest};
use crate::errors::Stage;
use crate::mock::SLIDE_TEMPLATES;
use crate::pipeline::{
    build_slide, parse_slide_reply, SlideDraft, DEFAULT_NARRATIVE, DEFAULT_TITLE, FALLBACK_CONTENT,
    FALLBACK_IMAGE_CONTEXT, FALLBACK_IMAGE_TITLE,
};
use crate::prompts::{SlideKind, SlideRole};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::{Cell, RefCell};
use tempfile::TempDir;

type TextFn = Box<dyn Fn(&CompletionRequest) -> errors::Result<Option<String>>>;
type ImageFn = Box<dyn Fn(&ImageRequest) -> errors::Result<Option<String>>>;

/// In-memory stand-in for the remote service.
struct ScriptedApi {
    text: TextFn,
    image: ImageFn,
    text_calls: RefCell<Vec<CompletionRequest>>,
    image_calls: Cell<usize>,
    image_prompts: RefCell<Vec<String>>,
}

impl ScriptedApi {
    fn new(text: TextFn, image: ImageFn) -> Self {
        Self {
            text,
            image,
            text_calls: RefCell::new(Vec::new()),
            image_calls: Cell::new(0),
            image_prompts: RefCell::new(Vec::new()),
        }
    }

    /// Answers every stage successfully.
    fn happy() -> Self {
        Self::new(
            Box::new(|request: &CompletionRequest| Ok(Some(reply_for(request)))),
            Box::new(|_: &ImageRequest| Ok(Some("https://images.test/slide.png".to_string()))),
        )
    }
}

impl GenerationApi for ScriptedApi {
    fn complete(&self, request: &CompletionRequest) -> errors::Result<Option<String>> {
        self.text_calls.borrow_mut().push(request.clone());
        (self.text)(request)
    }

    fn generate_image(&self, request: &ImageRequest) -> errors::Result<Option<String>> {
        self.image_calls.set(self.image_calls.get() + 1);
        self.image_prompts.borrow_mut().push(request.prompt.clone());
        (self.image)(request)
    }
}

fn reply_for(request: &CompletionRequest) -> String {
    let prompt = request.prompt();
    if prompt.contains("catchy title") {
        "\"Penguins in Space\"".to_string()
    } else if prompt.starts_with("Create a cohesive narrative arc") {
        "The penguins build a rocket and land on the moon.".to_string()
    } else {
        r#"Sure! {"title": "Liftoff", "content": "Five penguins, one rocket", "emoji": "🚀"}"#
            .to_string()
    }
}

fn seeded_config(probability: f64) -> Config {
    Config {
        image_only_probability: probability,
        ..Config::default()
    }
}

fn request(count: usize) -> GenerationRequest {
    GenerationRequest::new(["penguins", "", "  space "], count, Theme::Ocean)
        .expect("valid request")
}

fn sample_presentation() -> Presentation {
    MockPipeline::seeded(3)
        .presentation(4, Some(Theme::Neon))
        .expect("mock presentation")
}

// ---------- model ----------

#[test]
fn test_generation_request_drops_blank_topics() {
    let request = request(5);
    assert_eq!(request.topics(), &["penguins".to_string(), "space".to_string()]);
    assert_eq!(request.slide_count(), 5);
    assert_eq!(request.theme(), Theme::Ocean);
}

#[test]
fn test_generation_request_rejects_too_many_topics() {
    let result = GenerationRequest::new(["a", "b", "c", "d"], 5, Theme::Party);
    assert!(matches!(result, Err(SlideError::ValidationError(_))));
}

#[test]
fn test_generation_request_rejects_out_of_range_counts() {
    assert!(GenerationRequest::new(Vec::<String>::new(), 0, Theme::Party).is_err());
    assert!(GenerationRequest::new(Vec::<String>::new(), model::MAX_SLIDES + 1, Theme::Party)
        .is_err());
    assert!(GenerationRequest::new(Vec::<String>::new(), model::MAX_SLIDES, Theme::Party).is_ok());
}

#[test]
fn test_theme_parsing() {
    assert_eq!("ocean".parse::<Theme>().unwrap(), Theme::Ocean);
    assert_eq!(" Forest ".parse::<Theme>().unwrap(), Theme::Forest);
    assert!("disco".parse::<Theme>().is_err());
    assert_eq!(Theme::default(), Theme::Party);
    assert_eq!(Theme::Sunset.color(), "#333333");
}

// ---------- prompts ----------

#[test]
fn test_slide_roles_follow_position() {
    let roles: Vec<SlideRole> = (1..=5).map(|i| SlideRole::for_position(i, 5)).collect();
    assert_eq!(
        roles,
        vec![
            SlideRole::Opening,
            SlideRole::BuildingUp,
            SlideRole::BuildingUp,
            SlideRole::ClimaxResolution,
            SlideRole::Conclusion,
        ]
    );
    assert_eq!(SlideRole::for_position(1, 1), SlideRole::Opening);
    assert_eq!(SlideRole::for_position(2, 2), SlideRole::Conclusion);
}

#[test]
fn test_title_prompt_mentions_topics_or_randomness() {
    let with = prompts::title_prompt(&["cats".to_string(), "tacos".to_string()]);
    assert!(with.contains("cats, tacos"));
    let without = prompts::title_prompt(&[]);
    assert!(without.contains("completely random topics"));
}

#[test]
fn test_image_prompt_uses_title_when_content_is_empty() {
    let prompt = prompts::image_prompt("Mystery", "", Theme::Forest);
    assert!(prompt.contains("Content context: Mystery"));
    assert!(prompt.contains("Theme: forest"));
}

// ---------- slide parsing ----------

#[test]
fn test_parse_slide_reply_inside_prose() {
    let draft = parse_slide_reply("Here you go:\n```json\n{\"title\": \"Hi\", \"emoji\": \"👋\"}\n```")
        .expect("embedded JSON");
    assert_eq!(draft.title.as_deref(), Some("Hi"));
    assert_eq!(draft.content, None);
    assert_eq!(draft.emoji.as_deref(), Some("👋"));
}

#[test]
fn test_parse_slide_reply_malformed() {
    assert!(matches!(
        parse_slide_reply("no json here"),
        Err(SlideError::ParseError(_))
    ));
    assert!(matches!(
        parse_slide_reply("{\"title\": \"cut off\""),
        Err(SlideError::ParseError(_))
    ));
}

#[test]
fn test_build_slide_fallbacks() {
    let image_only = build_slide(2, SlideKind::ImageOnly, None);
    assert_eq!(image_only.title, "Party!");
    assert_eq!(image_only.content, "");
    assert_eq!(image_only.emoji, model::FALLBACK_EMOJI);

    let minimal = build_slide(3, SlideKind::MinimalText, None);
    assert_eq!(minimal.title, "Amazing");
    assert_eq!(minimal.content, FALLBACK_CONTENT);
    assert_eq!(minimal.id, 3);
}

#[test]
fn test_build_slide_enforces_layout() {
    let draft = SlideDraft {
        title: None,
        content: Some("Words the model added anyway".to_string()),
        emoji: Some("  ".to_string()),
    };
    let image_only = build_slide(4, SlideKind::ImageOnly, Some(draft.clone()));
    assert_eq!(image_only.title, "Slide 4");
    assert!(image_only.content.is_empty());
    assert_eq!(image_only.emoji, model::FALLBACK_EMOJI);

    let empty = SlideDraft {
        content: Some(String::new()),
        ..draft
    };
    let minimal = build_slide(4, SlideKind::MinimalText, Some(empty));
    assert_eq!(minimal.content, FALLBACK_CONTENT);
}

// ---------- pipeline ----------

#[test]
fn test_pipeline_returns_exact_slide_count() {
    for count in model::MIN_SLIDES..=model::MAX_SLIDES {
        let api = ScriptedApi::happy();
        let mut pipeline =
            SlidePipeline::with_rng(&api, seeded_config(0.7), StdRng::seed_from_u64(count as u64));
        let presentation = pipeline.run(&request(count)).expect("presentation");

        assert_eq!(presentation.len(), count);
        let ids: Vec<usize> = presentation.slides.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=count).collect::<Vec<_>>());
        assert_eq!(api.image_calls.get(), count);
    }
}

#[test]
fn test_pipeline_content_empty_only_for_image_only_slides() {
    let seed = 42;
    let api = ScriptedApi::happy();
    let mut pipeline =
        SlidePipeline::with_rng(&api, seeded_config(0.7), StdRng::seed_from_u64(seed));
    let presentation = pipeline.run(&request(8)).expect("presentation");

    // The pipeline draws exactly once per slide, so replaying the seed predicts each layout
    let mut replay = StdRng::seed_from_u64(seed);
    for slide in &presentation.slides {
        let image_only = replay.gen_bool(0.7);
        assert_eq!(slide.is_image_only(), image_only, "slide {}", slide.id);
        assert_eq!(slide.content.is_empty(), image_only);
    }
}

#[test]
fn test_pipeline_probability_extremes() {
    let api = ScriptedApi::happy();
    let mut all_images = SlidePipeline::with_rng(&api, seeded_config(1.0), StdRng::seed_from_u64(1));
    let presentation = all_images.run(&request(4)).expect("presentation");
    assert!(presentation.slides.iter().all(|s| s.is_image_only()));

    let mut all_text = SlidePipeline::with_rng(&api, seeded_config(0.0), StdRng::seed_from_u64(1));
    let presentation = all_text.run(&request(4)).expect("presentation");
    assert!(presentation
        .slides
        .iter()
        .all(|s| s.content == "Five penguins, one rocket"));
}

#[test]
fn test_pipeline_uses_cleaned_title_and_stage_order() {
    let api = ScriptedApi::happy();
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.5), StdRng::seed_from_u64(9));
    let presentation = pipeline.run(&request(3)).expect("presentation");

    assert_eq!(presentation.title, "Penguins in Space");
    assert_eq!(presentation.theme, Theme::Ocean);

    let calls = api.text_calls.borrow();
    assert_eq!(calls.len(), 5);
    assert!(calls[0].prompt().contains("catchy title"));
    assert_eq!(calls[0].max_tokens, 30);
    assert!(calls[1].prompt().contains("narrative arc"));
    assert!(calls[1].prompt().contains("Penguins in Space"));
    assert!(calls[2].prompt().contains("Create slide 1 of 3"));
    assert!(calls[2].prompt().contains("The penguins build a rocket"));
    assert!(calls[4].prompt().contains("Create slide 3 of 3"));
    assert!(calls[4].prompt().contains("conclusion"));
}

#[test]
fn test_pipeline_skips_narrative_when_disabled() {
    let api = ScriptedApi::happy();
    let config = Config {
        include_narrative: false,
        ..seeded_config(0.7)
    };
    let mut pipeline = SlidePipeline::with_rng(&api, config, StdRng::seed_from_u64(2));
    assert!(!pipeline.config().include_narrative);
    pipeline.run(&request(2)).expect("presentation");

    let calls = api.text_calls.borrow();
    assert_eq!(calls.len(), 3);
    assert!(!calls.iter().any(|c| c.prompt().contains("narrative arc")));
    assert!(!calls[1].prompt().contains("Follow this narrative arc"));
}

#[test]
fn test_title_failure_aborts_pipeline() {
    let api = ScriptedApi::new(
        Box::new(|_: &CompletionRequest| {
            Err(SlideError::RemoteService {
                status: 401,
                body: "bad key".to_string(),
            })
        }),
        Box::new(|_: &ImageRequest| Ok(None)),
    );
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.7), StdRng::seed_from_u64(1));
    let err = pipeline.run(&request(5)).expect_err("title failure");

    match &err {
        SlideError::GenerationFailed { stage, .. } => assert_eq!(*stage, Stage::Title),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("check your API key"));
    assert_eq!(api.text_calls.borrow().len(), 1);
    assert_eq!(api.image_calls.get(), 0);
}

#[test]
fn test_narrative_failure_aborts_pipeline() {
    let api = ScriptedApi::new(
        Box::new(|request: &CompletionRequest| {
            if request.prompt().starts_with("Create a cohesive narrative arc") {
                Err(SlideError::RemoteService {
                    status: 500,
                    body: "overloaded".to_string(),
                })
            } else {
                Ok(Some(reply_for(request)))
            }
        }),
        Box::new(|_: &ImageRequest| Ok(Some("https://images.test/x.png".to_string()))),
    );
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.7), StdRng::seed_from_u64(1));
    let err = pipeline.run(&request(4)).expect_err("narrative failure");

    assert!(matches!(
        err,
        SlideError::GenerationFailed {
            stage: Stage::Narrative,
            ..
        }
    ));
    assert_eq!(err.status(), Some(500));
    assert_eq!(api.text_calls.borrow().len(), 2);
    assert_eq!(api.image_calls.get(), 0);
}

#[test]
fn test_slide_text_failure_aborts_pipeline() {
    let api = ScriptedApi::new(
        Box::new(|request: &CompletionRequest| {
            if request.prompt().contains("Create slide 2") {
                Err(SlideError::RemoteService {
                    status: 500,
                    body: String::new(),
                })
            } else {
                Ok(Some(reply_for(request)))
            }
        }),
        Box::new(|_: &ImageRequest| Ok(None)),
    );
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.7), StdRng::seed_from_u64(1));
    let err = pipeline.run(&request(4)).expect_err("slide failure");

    assert!(matches!(
        err,
        SlideError::GenerationFailed {
            stage: Stage::SlideText(2),
            ..
        }
    ));
}

#[test]
fn test_image_failure_leaves_slide_without_image() {
    let api = ScriptedApi::new(
        Box::new(|request: &CompletionRequest| Ok(Some(reply_for(request)))),
        Box::new(|_: &ImageRequest| {
            Err(SlideError::RemoteService {
                status: 400,
                body: "content policy".to_string(),
            })
        }),
    );
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.7), StdRng::seed_from_u64(1));
    let presentation = pipeline.run(&request(3)).expect("images are optional");

    assert_eq!(presentation.len(), 3);
    assert!(presentation.slides.iter().all(|s| s.image_url.is_none()));
    assert_eq!(api.image_calls.get(), 3);
}

#[test]
fn test_unparseable_replies_use_fallback_content() {
    let api = ScriptedApi::new(
        Box::new(|request: &CompletionRequest| {
            if request.prompt().contains("catchy title") {
                Err(SlideError::ParseError("not json".to_string()))
            } else if request.prompt().starts_with("Create a cohesive narrative arc") {
                Ok(None)
            } else {
                Ok(Some("I'd rather not use JSON today".to_string()))
            }
        }),
        Box::new(|_: &ImageRequest| Ok(Some("https://images.test/x.png".to_string()))),
    );
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.0), StdRng::seed_from_u64(1));
    let presentation = pipeline.run(&request(2)).expect("fallbacks keep the run alive");

    assert_eq!(presentation.title, DEFAULT_TITLE);
    for slide in &presentation.slides {
        assert_eq!(slide.title, "Amazing");
        assert_eq!(slide.content, FALLBACK_CONTENT);
        assert!(slide.image_url.is_some());
    }
    let calls = api.text_calls.borrow();
    assert!(calls[2].prompt().contains(DEFAULT_NARRATIVE));

    // unusable slide replies get the fixed image prompt, not the fallback slide text
    let image_prompts = api.image_prompts.borrow();
    assert_eq!(image_prompts.len(), 2);
    for prompt in image_prompts.iter() {
        assert_eq!(
            prompt,
            &prompts::image_prompt(FALLBACK_IMAGE_TITLE, FALLBACK_IMAGE_CONTEXT, Theme::Ocean)
        );
    }
}

#[test]
fn test_decoded_slides_drive_their_own_image_prompt() {
    let api = ScriptedApi::happy();
    let mut pipeline = SlidePipeline::with_rng(&api, seeded_config(0.0), StdRng::seed_from_u64(1));
    pipeline.run(&request(1)).expect("presentation");

    let image_prompts = api.image_prompts.borrow();
    assert_eq!(
        image_prompts.as_slice(),
        &[prompts::image_prompt(
            "Liftoff",
            "Five penguins, one rocket",
            Theme::Ocean
        )]
    );
}

// ---------- mock ----------

#[test]
fn test_mock_presentation_ocean_five() {
    let presentation = MockPipeline::seeded(11)
        .presentation(5, Some(Theme::Ocean))
        .expect("mock");

    assert!(presentation.id.starts_with("mock-"));
    assert_eq!(presentation.theme, Theme::Ocean);
    assert_eq!(presentation.len(), 5);
    assert!(mock::MOCK_TITLES.contains(&presentation.title.as_str()));
    for (i, slide) in presentation.slides.iter().enumerate() {
        let template = &SLIDE_TEMPLATES[i];
        assert_eq!(slide.id, i + 1);
        assert_eq!(slide.title, template.title);
        assert_eq!(slide.content, template.content);
        assert_eq!(slide.image_url.is_some(), template.has_image);
    }
}

#[test]
fn test_mock_reuses_templates_round_robin() {
    let count = SLIDE_TEMPLATES.len() + 3;
    let presentation = MockPipeline::seeded(5)
        .presentation(count, None)
        .expect("mock");

    assert_eq!(presentation.len(), count);
    assert_eq!(presentation.slides[10].title, SLIDE_TEMPLATES[0].title);
    assert_eq!(presentation.slides[12].title, SLIDE_TEMPLATES[2].title);
    assert_eq!(presentation.slides[12].id, 13);
    for slide in &presentation.slides {
        let template = &SLIDE_TEMPLATES[(slide.id - 1) % SLIDE_TEMPLATES.len()];
        assert_eq!(slide.content.is_empty(), template.content.is_empty());
    }
}

#[test]
fn test_mock_scenarios() {
    let mut mock = MockPipeline::seeded(8);

    let heavy = mock.scenario(Scenario::ImageHeavy).expect("image heavy");
    assert_eq!(heavy.theme, Theme::Ocean);
    assert!(heavy.slides.iter().all(|s| s.image_url.is_some()));

    let text = mock.scenario(Scenario::TextOnly).expect("text only");
    assert_eq!(text.theme, Theme::Forest);
    assert!(text.slides.iter().all(|s| s.image_url.is_none()));

    let mix = mock.scenario(Scenario::RandomMix).expect("random mix");
    assert!((3..=8).contains(&mix.len()));

    assert_eq!(
        "extended-show".parse::<Scenario>().unwrap(),
        Scenario::ExtendedShow
    );
}

#[test]
fn test_mock_through_presentation_source() {
    let mut source: Box<dyn PresentationSource> = Box::new(MockPipeline::seeded(1));
    let presentation = source.generate(&request(6)).expect("mock");
    assert_eq!(presentation.len(), 6);
    assert_eq!(presentation.theme, Theme::Ocean);
}

// ---------- navigation ----------

#[test]
fn test_navigator_boundaries() {
    let mut nav = Navigator::new(3);
    assert_eq!(nav.total(), 3);
    assert_eq!(nav.current(), 0);
    assert_eq!(nav.previous(), NavOutcome::Unchanged);
    assert!(!nav.can_previous());

    assert_eq!(nav.jump(2), NavOutcome::Moved(2));
    assert_eq!(nav.next(), NavOutcome::Unchanged);
    assert!(!nav.can_next());
    assert_eq!(nav.current(), 2);

    assert_eq!(nav.jump(99), NavOutcome::Unchanged);
    assert_eq!(nav.jump(0), NavOutcome::Moved(0));
}

#[test]
fn test_navigator_next_then_previous_returns() {
    let mut nav = Navigator::new(6);
    for start in 1..5 {
        nav.jump(start);
        nav.next();
        nav.previous();
        assert_eq!(nav.current(), start);
    }
}

#[test]
fn test_navigator_single_slide() {
    let mut nav = Navigator::new(1);
    assert_eq!(nav.apply(NavKey::Advance), NavOutcome::Unchanged);
    assert_eq!(nav.apply(NavKey::Retreat), NavOutcome::Unchanged);
    assert!(!nav.can_next());
    assert!(!nav.can_previous());
}

#[test]
fn test_dismiss_leaves_fullscreen_first() {
    let mut nav = Navigator::new(2);
    assert_eq!(
        nav.apply(NavKey::Fullscreen),
        NavOutcome::FullscreenChanged(true)
    );
    assert_eq!(
        nav.apply(NavKey::Dismiss),
        NavOutcome::FullscreenChanged(false)
    );
    assert_eq!(nav.apply(NavKey::Dismiss), NavOutcome::Dismissed);
}

#[test]
fn test_key_names() {
    assert_eq!(NavKey::from_key_name("ArrowRight"), Some(NavKey::Advance));
    assert_eq!(NavKey::from_key_name(" "), Some(NavKey::Advance));
    assert_eq!(NavKey::from_key_name("ArrowLeft"), Some(NavKey::Retreat));
    assert_eq!(NavKey::from_key_name("Escape"), Some(NavKey::Dismiss));
    assert_eq!(NavKey::from_key_name("F11"), Some(NavKey::Fullscreen));
    assert_eq!(NavKey::from_key_name("Enter"), None);
}

#[derive(Default)]
struct RecordingView {
    rendered: Vec<usize>,
    affordances: Vec<(bool, bool)>,
    fullscreen: Vec<bool>,
}

impl SlideView for RecordingView {
    fn render_slide(
        &mut self,
        _presentation: &Presentation,
        index: usize,
        _slide: &Slide,
    ) -> errors::Result<()> {
        self.rendered.push(index);
        Ok(())
    }

    fn update_affordances(&mut self, can_previous: bool, can_next: bool) -> errors::Result<()> {
        self.affordances.push((can_previous, can_next));
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> errors::Result<()> {
        self.fullscreen.push(fullscreen);
        Ok(())
    }
}

#[test]
fn test_presenter_drives_view() {
    let presentation = sample_presentation();
    let mut presenter = Presenter::new(&presentation, RecordingView::default());

    presenter.show().unwrap();
    presenter.dispatch(NavKey::Retreat).unwrap();
    presenter.dispatch(NavKey::Advance).unwrap();
    presenter.jump(10).unwrap();
    presenter.dispatch(NavKey::Advance).unwrap();
    presenter.dispatch(NavKey::Fullscreen).unwrap();
    assert_eq!(presenter.view().fullscreen, vec![true]);
    assert_eq!(presenter.navigator().current(), 3);

    let view = presenter.into_view();
    assert_eq!(view.rendered, vec![0, 1, 3, 3]);
    assert_eq!(
        view.affordances,
        vec![(false, true), (true, true), (true, false), (true, false)]
    );
    assert_eq!(view.fullscreen, vec![true]);
}

// ---------- terminal view ----------

#[test]
fn test_terminal_view_draws_slide_and_affordances() {
    let presentation = sample_presentation();
    let view = terminal::TerminalView::new(Vec::new(), presentation.theme, 80, 24);
    let mut presenter = Presenter::new(&presentation, view);
    presenter.show().unwrap();

    let out = String::from_utf8_lossy(&presenter.into_view().into_inner()).to_string();
    assert!(out.contains(&presentation.title));
    assert!(out.contains("Welcome!"));
    assert!(out.contains("Let the party begin!"));
    assert!(out.contains("1 / 4"));
    assert!(out.contains("Next →"));
    assert!(!out.contains("← Previous"));
}

#[test]
fn test_terminal_keys_map_to_commands() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
    assert_eq!(terminal::map_key(&key(KeyCode::Right)), Some(NavKey::Advance));
    assert_eq!(terminal::map_key(&key(KeyCode::Char(' '))), Some(NavKey::Advance));
    assert_eq!(terminal::map_key(&key(KeyCode::Left)), Some(NavKey::Retreat));
    assert_eq!(terminal::map_key(&key(KeyCode::Esc)), Some(NavKey::Dismiss));
    assert_eq!(terminal::map_key(&key(KeyCode::F(11))), Some(NavKey::Fullscreen));
    assert_eq!(terminal::map_key(&key(KeyCode::Enter)), None);
}

// ---------- client envelopes ----------

#[test]
fn test_parse_completion_envelope() {
    let body = r#"{"choices": [{"message": {"role": "assistant", "content": " Hello "}}]}"#;
    assert_eq!(parse_completion(body).unwrap().as_deref(), Some(" Hello "));
    assert_eq!(parse_completion(r#"{"choices": []}"#).unwrap(), None);
    assert!(matches!(
        parse_completion("<html>oops</html>"),
        Err(SlideError::ParseError(_))
    ));
}

#[test]
fn test_parse_image_envelope() {
    let body = r#"{"created": 1, "data": [{"url": "https://img.test/a.png"}]}"#;
    assert_eq!(
        parse_image(body).unwrap().as_deref(),
        Some("https://img.test/a.png")
    );
    assert_eq!(parse_image(r#"{"data": []}"#).unwrap(), None);
}

#[test]
fn test_client_requires_key() {
    assert!(matches!(
        OpenAiClient::new("  ", &Config::default()),
        Err(SlideError::ConfigError(_))
    ));
}

// ---------- config ----------

#[test]
fn test_config_defaults_and_validation() {
    let config = Config::new();
    assert_eq!(config.text_model, "gpt-3.5-turbo");
    assert_eq!(config.image_size, "256x256");
    assert_eq!(config.title_params.max_tokens, 30);
    assert!(config.validate().is_ok());

    let bad = Config {
        image_only_probability: 1.5,
        ..Config::default()
    };
    assert!(matches!(bad.validate(), Err(SlideError::ConfigError(_))));
}

#[test]
fn test_session_state_roundtrip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("state.json");

    let empty = SessionState::load(&path).expect("missing file is empty state");
    assert_eq!(empty, SessionState::default());

    let mut state = SessionState::default();
    state.set_api_key(" sk-test-123 ").expect("valid key");
    state.acknowledge_popup();
    state.save(&path).expect("save");

    let loaded = SessionState::load(&path).expect("load");
    assert_eq!(loaded.api_key.as_deref(), Some("sk-test-123"));
    assert!(loaded.popup_acknowledged);

    let mut cleared = loaded;
    cleared.clear_api_key();
    cleared.save(&path).expect("save");
    assert_eq!(SessionState::load(&path).unwrap().api_key, None);
}

#[test]
fn test_session_state_rejects_bad_keys() {
    let mut state = SessionState::default();
    assert!(state.set_api_key("   ").is_err());
    assert!(state.set_api_key("pk-live-123").is_err());
    assert_eq!(state.api_key, None);
}

// ---------- utils ----------

#[test]
fn test_escape_html_and_colors() {
    assert_eq!(
        utils::escape_html("<b>\"Tom\" & 'Jerry'</b>"),
        "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
    );
    assert_eq!(utils::parse_hex_color("#11998e"), Some((0x11, 0x99, 0x8e)));
    assert_eq!(utils::parse_hex_color("11998e"), None);
}
