//! Elm-style state model for the portfolio page.
//!
//! All interaction state lives in [`SiteModel`]. Page events arrive as
//! [`SiteMsg`] values; side-effects are described by [`SiteCmd`] values
//! returned from [`super::update::update`] and executed by the runtime.
//!
//! Nothing in this module performs I/O.

use std::time::Duration;

use rand::rngs::StdRng;

use crate::catalog::ProjectCatalog;
use crate::core::config::{Config, MarqueeConfig};
use crate::logger::LogEntry;

use super::gallery::{CategoryFilter, GalleryView, SortMode};
use super::input::Key;
use super::marquee::{LoopPresenter, SlotId};
use super::modal::DetailModal;
use super::nav::{NavController, Section};
use super::render::RenderOp;
use super::theme::Theme;
use super::widgets::{Accordion, Carousel};

// ──────────────────── events ────────────────────

/// Logical element an event originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A marquee slot itself.
    Slot(SlotId),
    /// A child element inside a marquee slot (title, image, text).
    SlotContent(SlotId),
    /// The dimmed area around the modal content.
    ModalBackdrop,
    ModalContent,
    ModalClose,
    ModalPrev,
    ModalNext,
    /// Header navigation link.
    NavLink(Section),
    /// Hamburger button for the mobile drawer.
    DrawerToggle,
    DrawerLink(Section),
    ThemeToggle,
    FilterButton(CategoryFilter),
    SortButton(SortMode),
    ShuffleButton,
    LayoutToggle,
    /// "Details" button on a gallery card, by catalog index.
    CardDetails(usize),
    /// "Details" button on a search result, by catalog index.
    SearchResult(usize),
    AccordionToggle(usize),
    CarouselNext,
    CarouselPrev,
}

impl Target {
    /// The marquee slot this element belongs to, if any.
    #[must_use]
    pub const fn slot(&self) -> Option<SlotId> {
        match self {
            Self::Slot(slot) | Self::SlotContent(slot) => Some(*slot),
            _ => None,
        }
    }
}

/// Messages that drive the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteMsg {
    PointerEnter(Target),
    /// Pointer left `from`. `to` is the element it moved onto, if known.
    PointerLeave { from: Target, to: Option<Target> },
    Click(Target),
    Key(Key),
    /// Full current contents of the search box.
    SearchInput(String),
    Resize { width: u32, height: u32 },
    /// Debounced follow-up to a resize.
    TuneSpeed,
    /// Delayed second half of the skill-bar animation.
    FillSkillBars,
}

// ──────────────────── commands ────────────────────

/// Side-effects requested by the update function.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteCmd {
    /// No side-effect.
    None,
    /// Apply render instructions in order.
    Render(Vec<RenderOp>),
    /// Write the theme preference to the persistent store.
    PersistTheme(Theme),
    /// Deliver `msg` once after `after` has elapsed. Never cancelled.
    Schedule { after: Duration, msg: SiteMsg },
    /// Append to the activity log.
    Log(LogEntry),
    /// Execute multiple commands in order.
    Batch(Vec<Self>),
}

impl SiteCmd {
    /// Render command, or `None` when there is nothing to draw.
    #[must_use]
    pub fn render(ops: Vec<RenderOp>) -> Self {
        if ops.is_empty() {
            Self::None
        } else {
            Self::Render(ops)
        }
    }

    /// Batch that drops `None` entries and unwraps single commands.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Flatten into a list of render ops, ignoring other effects.
    #[must_use]
    pub fn render_ops(&self) -> Vec<RenderOp> {
        match self {
            Self::Render(ops) => ops.clone(),
            Self::Batch(cmds) => cmds.iter().flat_map(Self::render_ops).collect(),
            _ => Vec::new(),
        }
    }
}

// ──────────────────── model ────────────────────

/// Timing and layout knobs copied out of [`Config`] at construction.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub marquee: MarqueeConfig,
    pub mobile_breakpoint_px: u32,
    pub skill_fill_delay: Duration,
    pub resize_debounce: Duration,
}

impl SiteSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            marquee: config.marquee.clone(),
            mobile_breakpoint_px: config.nav.mobile_breakpoint_px,
            skill_fill_delay: Duration::from_millis(config.nav.skill_fill_delay_ms),
            resize_debounce: Duration::from_millis(config.marquee.resize_debounce_ms),
        }
    }
}

/// Which optional mounts the surface reported at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mounted {
    pub track: bool,
    pub modal: bool,
}

impl Mounted {
    /// Every mount present.
    pub const ALL: Self = Self {
        track: true,
        modal: true,
    };
}

/// Single owner of every piece of page state.
#[derive(Debug)]
pub struct SiteModel {
    pub catalog: ProjectCatalog,
    pub nav: NavController,
    pub marquee: LoopPresenter,
    pub modal: DetailModal,
    pub gallery: GalleryView,
    pub accordion: Accordion,
    pub carousel: Carousel,
    pub settings: SiteSettings,
    /// Last reported viewport size (width, height) in CSS pixels.
    pub viewport: Option<(u32, u32)>,
    /// Pause state last sent to the surface.
    pub loop_paused: bool,
    /// False when the surface has no modal; opens are then skipped.
    pub modal_mounted: bool,
    pub shuffle_rng: StdRng,
}

impl SiteModel {
    #[must_use]
    pub fn new(catalog: ProjectCatalog, config: &Config, shuffle_rng: StdRng) -> Self {
        let gallery = GalleryView::new(catalog.len(), &config.search);
        Self {
            nav: NavController::new(
                config.nav.start_section,
                Theme::default(),
                config.nav.skill_percents(),
            ),
            marquee: LoopPresenter::new(),
            modal: DetailModal::new(),
            gallery,
            accordion: Accordion::new(config.widgets.accordion_panels),
            carousel: Carousel::new(config.widgets.carousel_items),
            settings: SiteSettings::from_config(config),
            viewport: None,
            loop_paused: false,
            modal_mounted: true,
            shuffle_rng,
            catalog,
        }
    }

    /// Marquee is paused while a slot is expanded or the modal is open.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.marquee.expanded().is_some() || self.modal.is_open()
    }

    /// Whether the viewport is narrow enough for the mobile drawer layout.
    /// Unknown until the first resize report.
    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        match self.viewport {
            Some((width, _)) => width <= self.settings.mobile_breakpoint_px,
            None => false,
        }
    }
}
