//! Render instructions and the output surface seam.
//!
//! The state machine never touches a rendering backend. It emits [`RenderOp`]
//! values, each addressed to a [`Mount`]; the runtime forwards them to a
//! [`RenderSurface`], skipping any op whose mount the surface does not have.

use serde::Serialize;

use super::gallery::{CategoryFilter, Layout, SearchPanel};
use super::marquee::{SlotId, SlotView};
use super::modal::ModalView;
use super::nav::Section;
use super::theme::Theme;

/// Named regions of the page that render instructions target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mount {
    Body,
    SectionNav,
    MobileNav,
    SkillBars,
    MarqueeTrack,
    Modal,
    ProjectList,
    SearchResults,
    Accordion,
    Carousel,
}

/// One presentation mutation. Applied synchronously and in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    /// Set or clear the theme class on the document body.
    ApplyTheme { theme: Theme },
    /// Show/hide a section and mark its navigation links.
    SectionActive { section: Section, active: bool },
    /// Populate the mobile drawer's link list (first open only).
    DrawerLinks { links: Vec<Section>, active: Section },
    DrawerVisible { open: bool },
    /// Set a skill indicator's fill width in percent.
    SkillFill { bar: usize, percent: u8 },
    /// Build the doubled marquee strip.
    LoopBuilt { slots: Vec<SlotView> },
    SlotExpanded { slot: SlotId, expanded: bool },
    LoopPaused { paused: bool },
    /// Full-cycle animation duration for the strip.
    LoopDuration { seconds: u32 },
    ModalShow { view: ModalView },
    ModalHide,
    /// Catalog indices of gallery cards in display order; all others hidden.
    GalleryOrder { visible: Vec<usize> },
    GalleryLayout {
        layout: Layout,
        toggle_label: &'static str,
    },
    FilterActive { category: CategoryFilter },
    SearchResults { panel: SearchPanel },
    AccordionPanel { panel: usize, expanded: bool },
    CarouselActive { item: usize },
}

impl RenderOp {
    /// The page region this instruction mutates.
    #[must_use]
    pub const fn mount(&self) -> Mount {
        match self {
            Self::ApplyTheme { .. } => Mount::Body,
            Self::SectionActive { .. } => Mount::SectionNav,
            Self::DrawerLinks { .. } | Self::DrawerVisible { .. } => Mount::MobileNav,
            Self::SkillFill { .. } => Mount::SkillBars,
            Self::LoopBuilt { .. }
            | Self::SlotExpanded { .. }
            | Self::LoopPaused { .. }
            | Self::LoopDuration { .. } => Mount::MarqueeTrack,
            Self::ModalShow { .. } | Self::ModalHide => Mount::Modal,
            Self::GalleryOrder { .. } | Self::GalleryLayout { .. } | Self::FilterActive { .. } => {
                Mount::ProjectList
            }
            Self::SearchResults { .. } => Mount::SearchResults,
            Self::AccordionPanel { .. } => Mount::Accordion,
            Self::CarouselActive { .. } => Mount::Carousel,
        }
    }
}

/// Output collaborator. Implementations own all actual drawing.
pub trait RenderSurface {
    /// Whether the given region exists. Ops for absent regions are dropped.
    fn has_mount(&self, _mount: Mount) -> bool {
        true
    }

    fn apply(&mut self, op: RenderOp);
}

/// Surface that records every applied op. Used by tests and CLI replay.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<RenderOp>,
    missing: Vec<Mount>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a page without the given region.
    #[must_use]
    pub fn without(mut self, mount: Mount) -> Self {
        if !self.missing.contains(&mount) {
            self.missing.push(mount);
        }
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Drain recorded ops, leaving the surface empty.
    pub fn take(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }
}

impl RenderSurface for RecordingSurface {
    fn has_mount(&self, mount: Mount) -> bool {
        !self.missing.contains(&mount)
    }

    fn apply(&mut self, op: RenderOp) {
        self.ops.push(op);
    }
}
