// ABOUTME: Main entry point for the party-slides program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use party_slides::{
    Config, GenerationRequest, MockPipeline, OpenAiClient, Presentation, Scenario, SessionState,
    SlidePipeline, Theme,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session state file (defaults to $PARTY_SLIDES_STATE or ~/.party-slides.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a presentation with the remote service
    Generate(GenerateArgs),

    /// Build an offline presentation from built-in templates
    Mock(MockArgs),

    /// Present a previously written document
    Present {
        /// Path to an HTML document written by this tool
        input: PathBuf,
    },

    /// Manage the stored API key
    #[command(subcommand)]
    Key(KeyCommand),
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Store an API key
    Set { key: String },
    /// Forget the stored API key
    Clear,
    /// Report whether a key is stored
    Show,
}

#[derive(Args)]
struct OutputArgs {
    /// Theme: party, neon, sunset, ocean or forest
    #[arg(long, value_parser = parse_theme)]
    theme: Option<Theme>,

    /// Number of slides
    #[arg(short = 'n', long, default_value_t = 5)]
    slides: usize,

    /// Write the standalone HTML document here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Serve the document on a local port
    #[arg(long)]
    serve: bool,

    /// Port for --serve
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Show the slideshow in this terminal
    #[arg(long)]
    present: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Up to three topics; blank entries are ignored
    #[arg(short, long = "topic")]
    topics: Vec<String>,

    /// Skip the narrative stage
    #[arg(long)]
    no_narrative: bool,

    /// Seed for the image-only/minimal-text draw
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct MockArgs {
    /// Use a canned demo instead of --slides/--theme
    #[arg(long, value_parser = parse_scenario)]
    scenario: Option<Scenario>,

    #[command(flatten)]
    output: OutputArgs,
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse().map_err(|e: party_slides::SlideError| e.to_string())
}

fn parse_scenario(s: &str) -> Result<Scenario, String> {
    s.parse().map_err(|e: party_slides::SlideError| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let state_path = cli.state.clone().unwrap_or_else(SessionState::default_path);

    let result = match cli.command {
        Some(Commands::Generate(args)) => run_generate(args, &state_path),
        Some(Commands::Mock(args)) => run_mock(args, &state_path),
        Some(Commands::Present { input }) => run_present(input),
        Some(Commands::Key(command)) => run_key(command, &state_path),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs, state_path: &Path) -> anyhow::Result<()> {
    let mut state = SessionState::load(state_path)?;
    let api_key = state
        .resolve_api_key()
        .context("No API key stored. Run `party-slides key set <KEY>` or set OPENAI_API_KEY")?;

    let mut config = Config::from_env();
    if args.no_narrative {
        config.include_narrative = false;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let theme = args.output.theme.unwrap_or_default();
    let request = GenerationRequest::new(&args.topics, args.output.slides, theme)?;

    println!("Generating presentation...");
    let client = OpenAiClient::new(&api_key, &config)?;
    let mut pipeline = SlidePipeline::new(client, config);
    // Only the generic notice reaches the user; the cause goes to the log
    let presentation = pipeline.run(&request).map_err(|e| {
        if let party_slides::SlideError::GenerationFailed { stage, source } = &e {
            error!("Generation failed at {} stage: {}", stage, source);
        }
        e
    })?;

    deliver(&presentation, &args.output, &mut state, state_path)
}

fn run_mock(args: MockArgs, state_path: &Path) -> anyhow::Result<()> {
    let mut state = SessionState::load(state_path)?;
    let mut pipeline = MockPipeline::new();

    let presentation = match args.scenario {
        Some(scenario) => pipeline.scenario(scenario)?,
        None => pipeline.presentation(args.output.slides, args.output.theme)?,
    };

    deliver(&presentation, &args.output, &mut state, state_path)
}

fn run_present(input: PathBuf) -> anyhow::Result<()> {
    let presentation = party_slides::html::read_presentation_from_file(&input)?;
    party_slides::present_in_terminal(&presentation)?;
    Ok(())
}

fn run_key(command: KeyCommand, state_path: &Path) -> anyhow::Result<()> {
    let mut state = SessionState::load(state_path)?;
    match command {
        KeyCommand::Set { key } => {
            state.set_api_key(&key)?;
            state.save(state_path)?;
            println!("API key stored in {:?}", state_path);
        }
        KeyCommand::Clear => {
            state.clear_api_key();
            state.save(state_path)?;
            println!("API key removed");
        }
        KeyCommand::Show => match state.api_key {
            Some(_) => println!("An API key is stored in {:?}", state_path),
            None => println!("No API key stored"),
        },
    }
    Ok(())
}

/// Hand a finished presentation to every requested output
fn deliver(
    presentation: &Presentation,
    output: &OutputArgs,
    state: &mut SessionState,
    state_path: &Path,
) -> anyhow::Result<()> {
    println!(
        "Created \"{}\" with {} slides ({})",
        presentation.title,
        presentation.len(),
        presentation.theme
    );

    let needs_document = output.output.is_some() || output.serve;
    let html = if needs_document {
        Some(party_slides::generate_presentation_html(presentation)?)
    } else {
        None
    };

    if let (Some(path), Some(html)) = (&output.output, &html) {
        party_slides::write_html_to_file(html, path)?;
        println!("HTML generated successfully: {:?}", path);
    }

    if output.present {
        party_slides::present_in_terminal(presentation)?;
    }

    if let (true, Some(html)) = (output.serve, html) {
        let server = party_slides::DocumentServer::bind(html, output.port)?;
        if !state.popup_acknowledged {
            println!(
                "The presentation opens in a separate browser tab. Allow it if your browser asks."
            );
            state.acknowledge_popup();
            state.save(state_path)?;
        }
        println!("Open {} (Press Ctrl+C to stop)", server.url());
        info!("Serving presentation {}", presentation.id);
        server.serve_forever()?;
    }

    if !needs_document && !output.present {
        println!("Nothing to show. Pass --output, --serve or --present.");
    }

    Ok(())
}
