//! Single-instance project detail modal.
//!
//! Navigation wraps over the whole catalog, independent of any gallery filter.

use serde::Serialize;

use crate::catalog::{Project, ProjectCatalog};
use crate::core::errors::{FolioError, Result};

use super::render::RenderOp;

/// Everything the modal displays for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub tools: String,
    pub impact: String,
    pub image_ref: String,
    pub image_alt: String,
    pub bullets: Vec<String>,
}

impl ModalView {
    fn from_project(index: usize, project: &Project) -> Self {
        Self {
            index,
            title: project.title.clone(),
            description: project.description.clone(),
            tools: project.tools.clone(),
            impact: project.impact.clone(),
            image_ref: project.image_ref.clone(),
            image_alt: project.title.clone(),
            bullets: project.bullets.clone(),
        }
    }
}

/// Modal state: which catalog entry is open, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailModal {
    open_index: Option<usize>,
}

impl DetailModal {
    #[must_use]
    pub const fn new() -> Self {
        Self { open_index: None }
    }

    #[must_use]
    pub const fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open_index.is_some()
    }

    /// Open (or re-target) the modal at `index`.
    ///
    /// An out-of-range index is a caller bug; state is left unchanged.
    pub fn open_at(&mut self, index: usize, catalog: &ProjectCatalog) -> Result<RenderOp> {
        let project = catalog.get(index).ok_or(FolioError::InvalidIndex {
            index,
            len: catalog.len(),
        })?;
        self.open_index = Some(index);
        Ok(RenderOp::ModalShow {
            view: ModalView::from_project(index, project),
        })
    }

    pub fn next(&mut self, catalog: &ProjectCatalog) -> Option<RenderOp> {
        self.step(catalog, 1)
    }

    pub fn previous(&mut self, catalog: &ProjectCatalog) -> Option<RenderOp> {
        self.step(catalog, catalog.len().saturating_sub(1))
    }

    /// Close the modal. `None` when it was already closed.
    pub fn close(&mut self) -> Option<RenderOp> {
        self.open_index.take().map(|_| RenderOp::ModalHide)
    }

    /// Move by `offset` positions modulo the catalog length. Callers pass
    /// `len - 1` for a backwards step so the arithmetic stays unsigned.
    fn step(&mut self, catalog: &ProjectCatalog, offset: usize) -> Option<RenderOp> {
        let current = self.open_index?;
        let len = catalog.len();
        if len == 0 {
            return None;
        }
        let target = (current + offset) % len;
        self.open_at(target, catalog).ok()
    }
}
