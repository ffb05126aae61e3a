//! Project gallery: search, category filter, sort, shuffle, and layout.
//!
//! The gallery keeps an arrangement of *all* catalog indices. The visible set
//! is that arrangement filtered by the active query and category. Sort and
//! shuffle only permute the positions currently occupied by visible cards;
//! hidden cards keep their positions, so clearing a filter brings them back
//! exactly where they were.

use rand::Rng;
use serde::Serialize;

use crate::catalog::{Project, ProjectCatalog};
use crate::core::config::SearchConfig;

use super::render::RenderOp;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Authored catalog order.
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortMode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "none" => Some(Self::None),
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

impl Layout {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }

    /// Label for the toggle control: it names the layout a click switches to.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Grid => "List View",
            Self::List => "Grid View",
        }
    }
}

/// Category predicate. `All` matches every project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` is the wildcard; anything else is an exact category.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == "all" {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }

    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => project.category == *category,
        }
    }
}

/// One entry in the search results panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub title: String,
    pub image_ref: String,
    pub excerpt: String,
}

/// State of the search results panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "hits", rename_all = "snake_case")]
pub enum SearchPanel {
    /// Empty query: panel hidden.
    Hidden,
    /// Non-empty query with no match.
    NoResults,
    Hits(Vec<SearchHit>),
}

#[derive(Debug, Clone)]
pub struct GalleryView {
    query: String,
    category: CategoryFilter,
    sort: SortMode,
    layout: Layout,
    order: Vec<usize>,
    include_tools: bool,
    excerpt_chars: usize,
}

impl GalleryView {
    #[must_use]
    pub fn new(catalog_len: usize, search: &SearchConfig) -> Self {
        Self {
            query: String::new(),
            category: CategoryFilter::All,
            sort: SortMode::None,
            layout: Layout::Grid,
            order: (0..catalog_len).collect(),
            include_tools: search.include_tools,
            excerpt_chars: search.excerpt_chars,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    #[must_use]
    pub const fn sort_mode(&self) -> SortMode {
        self.sort
    }

    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Arrangement of every catalog index, visible or not.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Ops that paint the gallery's starting state.
    #[must_use]
    pub fn initial_ops(&self, catalog: &ProjectCatalog) -> Vec<RenderOp> {
        vec![
            RenderOp::FilterActive {
                category: self.category.clone(),
            },
            self.layout_op(),
            self.order_op(catalog),
        ]
    }

    /// Visible catalog indices in display order.
    #[must_use]
    pub fn visible(&self, catalog: &ProjectCatalog) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|&i| catalog.get(i).is_some_and(|p| self.is_visible(p)))
            .collect()
    }

    fn is_visible(&self, project: &Project) -> bool {
        self.category.matches(project) && self.query_matches(project)
    }

    /// Case-insensitive substring match, OR across title, description, and
    /// (when enabled) tools. Empty query matches everything.
    fn query_matches(&self, project: &Project) -> bool {
        let needle = normalize(&self.query);
        if needle.is_empty() {
            return true;
        }
        let hit = |field: &str| field.to_lowercase().contains(&needle);
        hit(&project.title)
            || hit(&project.description)
            || (self.include_tools && hit(&project.tools))
    }

    pub fn apply_query(&mut self, text: &str, catalog: &ProjectCatalog) -> Vec<RenderOp> {
        self.query = text.to_string();
        self.reapply_sort(catalog);
        vec![
            self.order_op(catalog),
            RenderOp::SearchResults {
                panel: self.search_panel(catalog),
            },
        ]
    }

    pub fn apply_category(
        &mut self,
        category: CategoryFilter,
        catalog: &ProjectCatalog,
    ) -> Vec<RenderOp> {
        self.category = category;
        self.reapply_sort(catalog);
        vec![
            RenderOp::FilterActive {
                category: self.category.clone(),
            },
            self.order_op(catalog),
        ]
    }

    /// Stable sort of the visible cards by case-insensitive title.
    /// Descending is the reverse of the ascending result.
    pub fn sort(&mut self, mode: SortMode, catalog: &ProjectCatalog) -> Vec<RenderOp> {
        self.sort = mode;
        self.rearrange_visible(catalog, |values| sort_values(values, mode, catalog));
        vec![self.order_op(catalog)]
    }

    /// Fisher–Yates over the visible cards only. Clears the sort mode since
    /// the result is no longer sorted.
    pub fn shuffle<R: Rng>(
        &mut self,
        rng: &mut R,
        catalog: &ProjectCatalog,
    ) -> Vec<RenderOp> {
        self.sort = SortMode::None;
        self.rearrange_visible(catalog, |values| {
            for i in (1..values.len()).rev() {
                let j = rng.random_range(0..=i);
                values.swap(i, j);
            }
        });
        vec![self.order_op(catalog)]
    }

    /// Presentation only; the visible set is untouched.
    pub fn set_layout(&mut self, layout: Layout) -> RenderOp {
        self.layout = layout;
        self.layout_op()
    }

    pub fn toggle_layout(&mut self) -> RenderOp {
        self.set_layout(self.layout.toggled())
    }

    /// Search results for the current query, in catalog order. The category
    /// filter does not apply here.
    #[must_use]
    pub fn search_panel(&self, catalog: &ProjectCatalog) -> SearchPanel {
        if normalize(&self.query).is_empty() {
            return SearchPanel::Hidden;
        }
        let hits: Vec<SearchHit> = catalog
            .iter()
            .enumerate()
            .filter(|(_, project)| self.query_matches(project))
            .map(|(index, project)| SearchHit {
                index,
                title: project.title.clone(),
                image_ref: project.image_ref.clone(),
                excerpt: excerpt(&project.description, self.excerpt_chars),
            })
            .collect();
        if hits.is_empty() {
            SearchPanel::NoResults
        } else {
            SearchPanel::Hits(hits)
        }
    }

    /// Keep a sorted gallery sorted after the visible set changes.
    fn reapply_sort(&mut self, catalog: &ProjectCatalog) {
        if self.sort != SortMode::None {
            let mode = self.sort;
            self.rearrange_visible(catalog, |values| sort_values(values, mode, catalog));
        }
    }

    /// Pull the visible values out of `order`, let `f` permute them, and write
    /// them back into the same positions.
    fn rearrange_visible<F>(&mut self, catalog: &ProjectCatalog, f: F)
    where
        F: FnOnce(&mut Vec<usize>),
    {
        let positions: Vec<usize> = self
            .order
            .iter()
            .enumerate()
            .filter(|&(_, &i)| catalog.get(i).is_some_and(|p| self.is_visible(p)))
            .map(|(pos, _)| pos)
            .collect();
        let mut values: Vec<usize> = positions.iter().map(|&pos| self.order[pos]).collect();
        f(&mut values);
        for (pos, value) in positions.into_iter().zip(values) {
            self.order[pos] = value;
        }
    }

    fn order_op(&self, catalog: &ProjectCatalog) -> RenderOp {
        RenderOp::GalleryOrder {
            visible: self.visible(catalog),
        }
    }

    const fn layout_op(&self) -> RenderOp {
        RenderOp::GalleryLayout {
            layout: self.layout,
            toggle_label: self.layout.toggle_label(),
        }
    }
}

fn sort_values(values: &mut [usize], mode: SortMode, catalog: &ProjectCatalog) {
    let key = |i: usize| {
        catalog
            .get(i)
            .map(|p| p.title.to_lowercase())
            .unwrap_or_default()
    };
    match mode {
        SortMode::None => values.sort_unstable(),
        SortMode::Ascending => values.sort_by_key(|&i| key(i)),
        SortMode::Descending => {
            values.sort_by_key(|&i| key(i));
            values.reverse();
        }
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// First `max_chars` characters, with an ellipsis when anything was cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}
