//! Project records and the catalog that owns them.
//!
//! The catalog is supplied once at session start and is read-only afterwards.
//! Indices into it are stable for the lifetime of the session, which is what
//! lets the marquee, gallery, and modal exchange plain `usize` handles instead
//! of reading data back off rendered elements.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{FolioError, Result};

const DEFAULT_CATEGORY: &str = "uncategorized";

/// One portfolio entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tools: String,
    #[serde(default)]
    pub impact: String,
    /// Opaque image locator, passed through to the render surface untouched.
    #[serde(default, rename = "image")]
    pub image_ref: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Project {
    /// Minimal constructor; remaining fields default to empty.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tools: String::new(),
            impact: String::new(),
            image_ref: String::new(),
            bullets: Vec::new(),
            category: default_category(),
        }
    }

    #[must_use]
    pub fn with_tools(mut self, tools: impl Into<String>) -> Self {
        self.tools = tools.into();
        self
    }

    #[must_use]
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = impact.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    /// Identity used for duplicate detection: two entries with the same title
    /// and description describe the same project.
    fn identity(&self) -> (&str, &str) {
        (&self.title, &self.description)
    }
}

/// On-disk shape: `[[project]]` tables in TOML, `{"project": [...]}` in JSON.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    project: Vec<Project>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    Wrapped(CatalogFile),
    Bare(Vec<Project>),
}

/// Ordered, duplicate-free, immutable sequence of projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    /// Build a catalog, rejecting entries that repeat an earlier identity.
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        let mut seen: HashMap<(&str, &str), usize> = HashMap::with_capacity(projects.len());
        for (index, project) in projects.iter().enumerate() {
            if let Some(&first) = seen.get(&project.identity()) {
                return Err(FolioError::DuplicateProject {
                    title: project.title.clone(),
                    first,
                    second: index,
                });
            }
            seen.insert(project.identity(), index);
        }
        Ok(Self { projects })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog file, choosing the format by extension (`.json` or TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| FolioError::io(path, source))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let projects = if is_json {
            parse_json(&raw)
        } else {
            parse_toml(&raw)
        }
        .map_err(|details| FolioError::CatalogParse {
            path: path.to_path_buf(),
            details,
        })?;
        Self::new(projects)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let projects = parse_toml(raw).map_err(|details| FolioError::CatalogParse {
            path: "<inline>".into(),
            details,
        })?;
        Self::new(projects)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let projects = parse_json(raw).map_err(|details| FolioError::CatalogParse {
            path: "<inline>".into(),
            details,
        })?;
        Self::new(projects)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.projects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Project] {
        &self.projects
    }

    /// Distinct categories in first-appearance order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for project in &self.projects {
            if !out.contains(&project.category.as_str()) {
                out.push(&project.category);
            }
        }
        out
    }
}

fn parse_toml(raw: &str) -> std::result::Result<Vec<Project>, String> {
    toml::from_str::<CatalogFile>(raw)
        .map(|file| file.project)
        .map_err(|e| e.to_string())
}

fn parse_json(raw: &str) -> std::result::Result<Vec<Project>, String> {
    match serde_json::from_str::<JsonCatalog>(raw) {
        Ok(JsonCatalog::Wrapped(file)) => Ok(file.project),
        Ok(JsonCatalog::Bare(projects)) => Ok(projects),
        Err(e) => Err(e.to_string()),
    }
}
