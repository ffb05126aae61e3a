//! Small standalone page widgets: accordion and image carousel.

use super::render::RenderOp;

/// Independent collapsible panels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    panels: Vec<bool>,
}

impl Accordion {
    /// All panels start collapsed.
    #[must_use]
    pub fn new(panel_count: usize) -> Self {
        Self {
            panels: vec![false; panel_count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    #[must_use]
    pub fn is_expanded(&self, panel: usize) -> bool {
        self.panels.get(panel).copied().unwrap_or(false)
    }

    /// Flip one panel. Out-of-range panels are ignored.
    pub fn toggle(&mut self, panel: usize) -> Option<RenderOp> {
        let expanded = self.panels.get_mut(panel)?;
        *expanded = !*expanded;
        Some(RenderOp::AccordionPanel {
            panel,
            expanded: *expanded,
        })
    }
}

/// One-at-a-time image carousel with wrap-around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
}

impl Carousel {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    #[must_use]
    pub const fn active(&self) -> usize {
        self.index
    }

    /// Show the first item. `None` for an empty carousel.
    #[must_use]
    pub const fn show_initial(&self) -> Option<RenderOp> {
        if self.len == 0 {
            return None;
        }
        Some(RenderOp::CarouselActive { item: self.index })
    }

    pub fn next(&mut self) -> Option<RenderOp> {
        if self.len == 0 {
            return None;
        }
        self.index = (self.index + 1) % self.len;
        Some(RenderOp::CarouselActive { item: self.index })
    }

    pub fn prev(&mut self) -> Option<RenderOp> {
        if self.len == 0 {
            return None;
        }
        self.index = (self.index + self.len - 1) % self.len;
        Some(RenderOp::CarouselActive { item: self.index })
    }
}
