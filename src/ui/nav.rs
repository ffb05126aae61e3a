//! Section navigation, mobile drawer, theme flag, and skill-bar fills.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::render::RenderOp;
use super::theme::Theme;

// ──────────────────── sections ────────────────────

/// Top-level page sections, in navigation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Home,
    Projects,
    Info,
    About,
}

impl Section {
    /// Fixed navigation order used for arrow-key cycling and the drawer.
    pub const ALL: [Self; 4] = [Self::Home, Self::Projects, Self::Info, Self::About];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Projects => "projects",
            Self::Info => "info",
            Self::About => "about",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    const fn position(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Projects => 1,
            Self::Info => 2,
            Self::About => 3,
        }
    }

    /// Next section, wrapping from the last to the first.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous section, wrapping from the first to the last.
    #[must_use]
    pub const fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Sections that display skill indicators and replay their fill on entry.
    #[must_use]
    pub const fn shows_skill_bars(self) -> bool {
        matches!(self, Self::Projects | Self::About)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ──────────────────── controller ────────────────────

/// Navigation state: active section, drawer, theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub active: Section,
    pub drawer_open: bool,
    /// The drawer's link list is built lazily on first open.
    pub drawer_built: bool,
    pub theme: Theme,
}

#[derive(Debug, Clone)]
pub struct NavController {
    state: NavState,
    skill_percents: Vec<u8>,
}

impl NavController {
    #[must_use]
    pub fn new(start: Section, theme: Theme, skill_percents: Vec<u8>) -> Self {
        Self {
            state: NavState {
                active: start,
                drawer_open: false,
                drawer_built: false,
                theme,
            },
            skill_percents,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &NavState {
        &self.state
    }

    #[must_use]
    pub const fn active(&self) -> Section {
        self.state.active
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.state.theme
    }

    #[must_use]
    pub const fn drawer_open(&self) -> bool {
        self.state.drawer_open
    }

    /// Ops that mark the current section active, used once at startup.
    #[must_use]
    pub fn initial_ops(&self) -> Vec<RenderOp> {
        Section::ALL
            .into_iter()
            .map(|section| RenderOp::SectionActive {
                section,
                active: section == self.state.active,
            })
            .collect()
    }

    /// Deactivate the current section and activate `target`.
    ///
    /// Re-selecting the active section re-applies it, so skill indicators
    /// replay their fill exactly as they would on a fresh entry.
    pub fn switch_to(&mut self, target: Section) -> Vec<RenderOp> {
        let previous = self.state.active;
        self.state.active = target;
        let mut ops = Vec::with_capacity(2);
        if previous != target {
            ops.push(RenderOp::SectionActive {
                section: previous,
                active: false,
            });
        }
        ops.push(RenderOp::SectionActive {
            section: target,
            active: true,
        });
        ops
    }

    /// Step through [`Section::ALL`], wrapping at both ends.
    pub fn cycle(&mut self, forward: bool) -> Vec<RenderOp> {
        let target = if forward {
            self.state.active.next()
        } else {
            self.state.active.prev()
        };
        self.switch_to(target)
    }

    pub fn toggle_drawer(&mut self) -> Vec<RenderOp> {
        if self.state.drawer_open {
            return self.close_drawer();
        }
        let mut ops = Vec::with_capacity(2);
        if !self.state.drawer_built {
            self.state.drawer_built = true;
            ops.push(RenderOp::DrawerLinks {
                links: Section::ALL.to_vec(),
                active: self.state.active,
            });
        }
        self.state.drawer_open = true;
        ops.push(RenderOp::DrawerVisible { open: true });
        ops
    }

    /// Close the drawer if open; no ops otherwise.
    pub fn close_drawer(&mut self) -> Vec<RenderOp> {
        if !self.state.drawer_open {
            return Vec::new();
        }
        self.state.drawer_open = false;
        vec![RenderOp::DrawerVisible { open: false }]
    }

    /// Flip the theme. Persisting it is the caller's job.
    pub fn toggle_theme(&mut self) -> (Theme, RenderOp) {
        self.state.theme = self.state.theme.toggled();
        (
            self.state.theme,
            RenderOp::ApplyTheme {
                theme: self.state.theme,
            },
        )
    }

    pub fn set_theme(&mut self, theme: Theme) -> RenderOp {
        self.state.theme = theme;
        RenderOp::ApplyTheme { theme }
    }

    /// First half of the fill animation: every indicator back to empty.
    #[must_use]
    pub fn reset_skill_bars(&self) -> Vec<RenderOp> {
        (0..self.skill_percents.len())
            .map(|bar| RenderOp::SkillFill { bar, percent: 0 })
            .collect()
    }

    /// Second half, run after the fill delay: every indicator to its target.
    #[must_use]
    pub fn fill_skill_bars(&self) -> Vec<RenderOp> {
        self.skill_percents
            .iter()
            .enumerate()
            .map(|(bar, &percent)| RenderOp::SkillFill { bar, percent })
            .collect()
    }

    #[must_use]
    pub fn has_skill_bars(&self) -> bool {
        !self.skill_percents.is_empty()
    }
}
