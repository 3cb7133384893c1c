// ABOUTME: Terminal slideshow view for the party-slides application
// ABOUTME: Draws slides with crossterm and feeds key presses into the shared navigator

use crate::errors::{Result, SlideError};
use crate::model::{Presentation, Slide, Theme};
use crate::navigation::{NavKey, NavOutcome, Presenter, SlideView};
use crate::utils::parse_hex_color;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::{debug, info};
use std::io::{self, Write};

fn term_err(err: io::Error) -> SlideError {
    SlideError::TerminalError(err.to_string())
}

fn theme_color(theme: Theme) -> Color {
    parse_hex_color(theme.accent())
        .map(|(r, g, b)| Color::Rgb { r, g, b })
        .unwrap_or(Color::Magenta)
}

/// Map a terminal key to a navigation command.
pub fn map_key(key: &KeyEvent) -> Option<NavKey> {
    match key.code {
        KeyCode::Right | KeyCode::Char(' ') => Some(NavKey::Advance),
        KeyCode::Left => Some(NavKey::Retreat),
        KeyCode::Esc => Some(NavKey::Dismiss),
        KeyCode::F(11) => Some(NavKey::Fullscreen),
        _ => None,
    }
}

/// Draws one slide at a time onto any writer.
pub struct TerminalView<W: Write> {
    out: W,
    theme: Theme,
    width: u16,
    height: u16,
    fullscreen: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, theme: Theme, width: u16, height: u16) -> Self {
        Self {
            out,
            theme,
            width,
            height,
            fullscreen: false,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn centered(&mut self, row: u16, text: &str) -> io::Result<()> {
        let len = text.chars().count() as u16;
        let col = self.width.saturating_sub(len) / 2;
        queue!(self.out, MoveTo(col, row), Print(text))
    }
}

impl<W: Write> SlideView for TerminalView<W> {
    fn render_slide(
        &mut self,
        presentation: &Presentation,
        index: usize,
        slide: &Slide,
    ) -> Result<()> {
        let color = theme_color(self.theme);
        let counter = format!("{} / {}", index + 1, presentation.len());
        let mid = self.height / 2;

        queue!(
            self.out,
            Clear(ClearType::All),
            MoveTo(1, 0),
            SetForegroundColor(color),
            Print(&presentation.title),
            MoveTo(self.width.saturating_sub(counter.len() as u16 + 1), 0),
            Print(&counter),
            ResetColor
        )
        .map_err(term_err)?;

        // Slides with an image show the link where the emoji would go
        let top = match &slide.image_url {
            Some(url) => format!("[image] {}", url),
            None => slide.emoji.clone(),
        };
        self.centered(mid.saturating_sub(2), &top).map_err(term_err)?;

        queue!(
            self.out,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold)
        )
        .map_err(term_err)?;
        self.centered(mid, &slide.title).map_err(term_err)?;
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor).map_err(term_err)?;

        if !slide.content.is_empty() {
            self.centered(mid + 2, &slide.content).map_err(term_err)?;
        }

        debug!("Rendered slide {} in terminal", slide.id);
        Ok(())
    }

    fn update_affordances(&mut self, can_previous: bool, can_next: bool) -> Result<()> {
        let row = self.height.saturating_sub(2);
        let prev = if can_previous { "← Previous" } else { "          " };
        let next = if can_next { "Next →" } else { "      " };
        let hint = "Arrows/Space navigate • F11 fullscreen • Esc exit";

        let nav = format!("{}    {}", prev, next);
        self.centered(row, &nav).map_err(term_err)?;
        queue!(self.out, SetAttribute(Attribute::Dim)).map_err(term_err)?;
        self.centered(row + 1, hint).map_err(term_err)?;
        queue!(self.out, SetAttribute(Attribute::Reset)).map_err(term_err)?;

        self.out.flush().map_err(term_err)
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        if fullscreen == self.fullscreen {
            return Ok(());
        }
        if fullscreen {
            execute!(self.out, EnterAlternateScreen).map_err(term_err)?;
        } else {
            execute!(self.out, LeaveAlternateScreen).map_err(term_err)?;
        }
        self.fullscreen = fullscreen;
        Ok(())
    }
}

/// Show a presentation in the current terminal until the user dismisses it
pub fn present_in_terminal(presentation: &Presentation) -> Result<()> {
    if presentation.is_empty() {
        return Err(SlideError::ValidationError(
            "Presentation has no slides".to_string(),
        ));
    }

    info!("Presenting {:?} in the terminal", presentation.title);

    let (width, height) = terminal::size().map_err(term_err)?;
    enable_raw_mode().map_err(term_err)?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, Hide) {
        let _ = disable_raw_mode();
        return Err(term_err(e));
    }

    let view = TerminalView::new(stdout, presentation.theme, width, height);
    let mut presenter = Presenter::new(presentation, view);
    let result = run_loop(&mut presenter);

    // Restore the terminal whatever happened in the loop
    let view = presenter.view_mut();
    let _ = view.set_fullscreen(false);
    let _ = execute!(view.out, Clear(ClearType::All), MoveTo(0, 0), Show);
    let _ = disable_raw_mode();

    result
}

fn run_loop<W: Write>(presenter: &mut Presenter<'_, TerminalView<W>>) -> Result<()> {
    presenter.show()?;

    loop {
        match event::read().map_err(term_err)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }
                if let Some(nav) = map_key(&key) {
                    if presenter.dispatch(nav)? == NavOutcome::Dismissed {
                        return Ok(());
                    }
                }
            }
            Event::Resize(width, height) => {
                presenter.view_mut().resize(width, height);
                presenter.show()?;
            }
            _ => {}
        }
    }
}
