// ABOUTME: Slide navigation state machine shared by every display surface
// ABOUTME: Clamped next/previous/jump transitions, key bindings and the view adapter trait

use crate::errors::Result;
use crate::model::{Presentation, Slide};
use log::debug;
use serde::Serialize;

/// Abstract navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKey {
    Advance,
    Retreat,
    Dismiss,
    Fullscreen,
}

/// Browser key names and the command each triggers.
///
/// The terminal maps its own key codes onto the same commands.
pub const KEY_BINDINGS: [(&str, NavKey); 5] = [
    ("ArrowRight", NavKey::Advance),
    (" ", NavKey::Advance),
    ("ArrowLeft", NavKey::Retreat),
    ("Escape", NavKey::Dismiss),
    ("F11", NavKey::Fullscreen),
];

impl NavKey {
    /// Look up a browser key name.
    pub fn from_key_name(name: &str) -> Option<NavKey> {
        KEY_BINDINGS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, nav)| *nav)
    }
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved(usize),
    Unchanged,
    FullscreenChanged(bool),
    Dismissed,
}

/// Current slide index, always within `[0, total - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
    fullscreen: bool,
}

impl Navigator {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            fullscreen: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn last(&self) -> usize {
        self.total.saturating_sub(1)
    }

    pub fn can_previous(&self) -> bool {
        self.current > 0
    }

    pub fn can_next(&self) -> bool {
        self.current < self.last()
    }

    /// Move to `index`, clamped into range.
    pub fn jump(&mut self, index: usize) -> NavOutcome {
        let target = index.min(self.last());
        if target == self.current {
            return NavOutcome::Unchanged;
        }
        self.current = target;
        NavOutcome::Moved(target)
    }

    pub fn next(&mut self) -> NavOutcome {
        if !self.can_next() {
            return NavOutcome::Unchanged;
        }
        self.jump(self.current + 1)
    }

    pub fn previous(&mut self) -> NavOutcome {
        if !self.can_previous() {
            return NavOutcome::Unchanged;
        }
        self.jump(self.current - 1)
    }

    /// Apply a command. Dismiss leaves full screen before it closes anything.
    pub fn apply(&mut self, key: NavKey) -> NavOutcome {
        let outcome = match key {
            NavKey::Advance => self.next(),
            NavKey::Retreat => self.previous(),
            NavKey::Fullscreen => {
                self.fullscreen = !self.fullscreen;
                NavOutcome::FullscreenChanged(self.fullscreen)
            }
            NavKey::Dismiss if self.fullscreen => {
                self.fullscreen = false;
                NavOutcome::FullscreenChanged(false)
            }
            NavKey::Dismiss => NavOutcome::Dismissed,
        };
        debug!("{:?} -> {:?} (slide {})", key, outcome, self.current);
        outcome
    }
}

/// A display surface the presenter can drive.
pub trait SlideView {
    /// Show `slide`, which sits at `index` within `presentation`.
    fn render_slide(&mut self, presentation: &Presentation, index: usize, slide: &Slide)
        -> Result<()>;

    fn update_affordances(&mut self, can_previous: bool, can_next: bool) -> Result<()>;

    fn set_fullscreen(&mut self, _fullscreen: bool) -> Result<()> {
        Ok(())
    }
}

/// Couples one presentation, its navigator and one active view.
pub struct Presenter<'a, V> {
    presentation: &'a Presentation,
    navigator: Navigator,
    view: V,
}

impl<'a, V: SlideView> Presenter<'a, V> {
    pub fn new(presentation: &'a Presentation, view: V) -> Self {
        Self {
            presentation,
            navigator: Navigator::new(presentation.len()),
            view,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Draw the current slide and refresh the affordances.
    pub fn show(&mut self) -> Result<()> {
        let index = self.navigator.current();
        if let Some(slide) = self.presentation.slide(index) {
            self.view.render_slide(self.presentation, index, slide)?;
        }
        self.view
            .update_affordances(self.navigator.can_previous(), self.navigator.can_next())
    }

    /// Apply a command and update the view for whatever changed.
    pub fn dispatch(&mut self, key: NavKey) -> Result<NavOutcome> {
        let outcome = self.navigator.apply(key);
        match outcome {
            NavOutcome::Moved(_) => self.show()?,
            NavOutcome::FullscreenChanged(on) => {
                self.view.set_fullscreen(on)?;
                self.show()?;
            }
            NavOutcome::Unchanged | NavOutcome::Dismissed => {}
        }
        Ok(outcome)
    }

    /// Jump straight to `index`, clamped.
    pub fn jump(&mut self, index: usize) -> Result<NavOutcome> {
        let outcome = self.navigator.jump(index);
        if let NavOutcome::Moved(_) = outcome {
            self.show()?;
        }
        Ok(outcome)
    }
}
