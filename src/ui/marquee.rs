//! Looping marquee of project cards.
//!
//! The strip renders the catalog twice in a row: `displayed = originals ++
//! originals`. Animating from offset 0 to the midpoint and snapping back looks
//! like an endless loop because the second half is indistinguishable from the
//! first. Every visual slot therefore maps back to a catalog index by
//! `slot mod n`, and both copies of a project resolve to the same index.
//!
//! Hover expands a slot and pauses scrolling. Whether the strip is paused is
//! derived, not stored: it is paused while a slot is expanded or the detail
//! modal is open (see [`super::model::SiteModel::is_paused`]).

use serde::Serialize;

use crate::core::config::MarqueeConfig;

use super::render::RenderOp;

/// Position of one rendered card in the doubled strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlotId(pub usize);

/// Render-facing description of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub slot: SlotId,
    pub catalog_index: usize,
    /// `false` for the first copy, `true` for the trailing duplicate.
    pub duplicate: bool,
}

/// Marquee state and operations.
#[derive(Debug, Clone, Default)]
pub struct LoopPresenter {
    /// Catalog index shown in each slot. Empty until initialized.
    displayed: Vec<usize>,
    expanded: Option<SlotId>,
    duration_secs: Option<u32>,
}

impl LoopPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the doubled strip for a catalog of `catalog_len` projects.
    ///
    /// No-op when the catalog is empty, the track is not mounted, or the strip
    /// was already built (re-running must never quadruple the list).
    pub fn initialize(&mut self, catalog_len: usize, mounted: bool) -> Vec<RenderOp> {
        if catalog_len == 0 || !mounted || self.is_active() {
            return Vec::new();
        }
        self.displayed = (0..catalog_len).chain(0..catalog_len).collect();
        vec![RenderOp::LoopBuilt {
            slots: self.slot_views(),
        }]
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.displayed.is_empty()
    }

    /// Number of logical projects in the loop.
    #[must_use]
    pub fn original_count(&self) -> usize {
        self.displayed.len() / 2
    }

    /// Catalog index per rendered slot.
    #[must_use]
    pub fn displayed(&self) -> &[usize] {
        &self.displayed
    }

    #[must_use]
    pub fn slot_views(&self) -> Vec<SlotView> {
        let n = self.original_count();
        self.displayed
            .iter()
            .enumerate()
            .map(|(slot, &catalog_index)| SlotView {
                slot: SlotId(slot),
                catalog_index,
                duplicate: slot >= n,
            })
            .collect()
    }

    #[must_use]
    pub const fn expanded(&self) -> Option<SlotId> {
        self.expanded
    }

    #[must_use]
    pub const fn duration_secs(&self) -> Option<u32> {
        self.duration_secs
    }

    /// Map a visual slot to its catalog index: `slot mod n`.
    ///
    /// `None` for slots that do not exist (including every slot of an empty
    /// loop).
    #[must_use]
    pub fn resolve(&self, slot: SlotId) -> Option<usize> {
        if slot.0 >= self.displayed.len() {
            return None;
        }
        Some(slot.0 % self.original_count())
    }

    /// Pointer entered `slot`: collapse any other expanded slot and expand
    /// this one. Idempotent for the already-expanded slot.
    pub fn set_hover(&mut self, slot: SlotId) -> Vec<RenderOp> {
        if slot.0 >= self.displayed.len() || self.expanded == Some(slot) {
            return Vec::new();
        }
        let mut ops = Vec::with_capacity(2);
        if let Some(previous) = self.expanded.take() {
            ops.push(RenderOp::SlotExpanded {
                slot: previous,
                expanded: false,
            });
        }
        self.expanded = Some(slot);
        ops.push(RenderOp::SlotExpanded {
            slot,
            expanded: true,
        });
        ops
    }

    /// Pointer left `slot`. `still_inside` is true when the pointer only
    /// moved onto a child element of the same slot, which is not a leave.
    pub fn clear_hover(&mut self, slot: SlotId, still_inside: bool) -> Vec<RenderOp> {
        if still_inside || self.expanded != Some(slot) {
            return Vec::new();
        }
        self.expanded = None;
        vec![RenderOp::SlotExpanded {
            slot,
            expanded: false,
        }]
    }

    /// Scale the cycle duration with the rendered slot count so that per-item
    /// speed stays constant: `max(min, round(base * slots / baseline))`.
    ///
    /// Leaves the hover state untouched. Returns `None` for an inactive loop.
    pub fn tune_speed(&mut self, config: &MarqueeConfig) -> Option<RenderOp> {
        if !self.is_active() {
            return None;
        }
        let seconds = cycle_seconds(self.displayed.len(), config);
        self.duration_secs = Some(seconds);
        Some(RenderOp::LoopDuration { seconds })
    }
}

/// Duration formula, exposed for callers that want to preview the pacing.
#[must_use]
pub fn cycle_seconds(slot_count: usize, config: &MarqueeConfig) -> u32 {
    let baseline = u64::from(config.baseline_count.max(1));
    let scaled = u64::from(config.base_seconds).saturating_mul(slot_count as u64);
    // Integer round-half-up of scaled / baseline.
    let rounded = (scaled.saturating_mul(2) + baseline) / (baseline * 2);
    u32::try_from(rounded)
        .unwrap_or(u32::MAX)
        .max(config.minimum_seconds)
}
