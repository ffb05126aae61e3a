//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FolioError, Result};
use crate::ui::nav::Section;

/// Full folio configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub marquee: MarqueeConfig,
    pub search: SearchConfig,
    pub nav: NavConfig,
    pub widgets: WidgetsConfig,
    pub storage: StorageConfig,
    pub paths: PathsConfig,
}

/// Marquee animation pacing.
///
/// The full-cycle duration scales with the number of rendered slots so the
/// per-item scroll speed looks the same for any catalog size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Cycle duration in seconds when exactly `baseline_count` slots render.
    pub base_seconds: u32,
    /// Slot count the base duration was tuned for (originals + duplicates).
    pub baseline_count: u32,
    /// Floor for very small catalogs.
    pub minimum_seconds: u32,
    /// Delay before re-tuning after a viewport resize.
    pub resize_debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Match the query against the tools field as well as title/description.
    pub include_tools: bool,
    /// Maximum description characters shown in a search result card.
    pub excerpt_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavConfig {
    pub start_section: Section,
    /// Header link clicks close the mobile drawer at or below this width.
    pub mobile_breakpoint_px: u32,
    pub skill_fill_delay_ms: u64,
    /// Fill used for skill bars that omit `percent`.
    pub default_skill_percent: u8,
    pub skills: Vec<SkillConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct WidgetsConfig {
    pub accordion_panels: usize,
    pub carousel_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Key under which the theme preference is stored.
    pub theme_key: String,
    /// Backing file for the persistent key-value store.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub catalog_file: PathBuf,
    pub activity_log: PathBuf,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            base_seconds: 16,
            baseline_count: 14,
            minimum_seconds: 6,
            resize_debounce_ms: 120,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            include_tools: true,
            excerpt_chars: 140,
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            start_section: Section::Home,
            mobile_breakpoint_px: 840,
            skill_fill_delay_ms: 120,
            default_skill_percent: 60,
            skills: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            theme_key: "site-theme".to_string(),
            path: config_dir().join("storage.json"),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let cfg = config_dir();
        Self {
            config_file: cfg.join("config.toml"),
            catalog_file: cfg.join("projects.toml"),
            activity_log: home_dir()
                .join(".local")
                .join("share")
                .join("folio")
                .join("activity.jsonl"),
        }
    }
}

impl NavConfig {
    /// Target fill for each configured skill bar, in configuration order.
    #[must_use]
    pub fn skill_percents(&self) -> Vec<u8> {
        self.skills
            .iter()
            .map(|skill| skill.percent.unwrap_or(self.default_skill_percent))
            .collect()
    }
}

impl Config {
    /// Default configuration path: `$FOLIO_CONFIG` or `~/.config/folio/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        env_var("FOLIO_CONFIG").map_or_else(|| PathsConfig::default().config_file, PathBuf::from)
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| FolioError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(FolioError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize_paths();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FolioError::Serialization {
            context: "toml",
            details: e.to_string(),
        })
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // marquee
        set_parsed(
            &mut lookup,
            "FOLIO_MARQUEE_BASE_SECONDS",
            &mut self.marquee.base_seconds,
        )?;
        set_parsed(
            &mut lookup,
            "FOLIO_MARQUEE_BASELINE_COUNT",
            &mut self.marquee.baseline_count,
        )?;
        set_parsed(
            &mut lookup,
            "FOLIO_MARQUEE_MINIMUM_SECONDS",
            &mut self.marquee.minimum_seconds,
        )?;
        set_parsed(
            &mut lookup,
            "FOLIO_MARQUEE_RESIZE_DEBOUNCE_MS",
            &mut self.marquee.resize_debounce_ms,
        )?;

        // search
        set_parsed(
            &mut lookup,
            "FOLIO_SEARCH_INCLUDE_TOOLS",
            &mut self.search.include_tools,
        )?;
        set_parsed(
            &mut lookup,
            "FOLIO_SEARCH_EXCERPT_CHARS",
            &mut self.search.excerpt_chars,
        )?;

        // nav
        if let Some(raw) = lookup("FOLIO_NAV_START_SECTION") {
            self.nav.start_section =
                Section::from_id(raw.trim()).ok_or_else(|| FolioError::ConfigParse {
                    context: "env",
                    details: format!("FOLIO_NAV_START_SECTION={raw:?}: unknown section"),
                })?;
        }
        set_parsed(
            &mut lookup,
            "FOLIO_NAV_SKILL_FILL_DELAY_MS",
            &mut self.nav.skill_fill_delay_ms,
        )?;

        // storage + paths
        if let Some(raw) = lookup("FOLIO_STORAGE_THEME_KEY") {
            self.storage.theme_key = raw;
        }
        if let Some(raw) = lookup("FOLIO_STORAGE_PATH") {
            self.storage.path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("FOLIO_CATALOG_FILE") {
            self.paths.catalog_file = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("FOLIO_ACTIVITY_LOG") {
            self.paths.activity_log = PathBuf::from(raw);
        }

        Ok(())
    }

    /// Expand a leading `~/` in user-supplied paths.
    fn normalize_paths(&mut self) {
        for path in [
            &mut self.storage.path,
            &mut self.paths.catalog_file,
            &mut self.paths.activity_log,
        ] {
            if let Ok(rest) = path.strip_prefix("~") {
                *path = home_dir().join(rest);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.marquee.baseline_count == 0 {
            return Err(invalid("marquee.baseline_count must be > 0"));
        }
        if self.marquee.base_seconds == 0 {
            return Err(invalid("marquee.base_seconds must be > 0"));
        }
        if self.marquee.minimum_seconds == 0 {
            return Err(invalid("marquee.minimum_seconds must be > 0"));
        }
        if self.search.excerpt_chars == 0 {
            return Err(invalid("search.excerpt_chars must be > 0"));
        }
        if self.nav.default_skill_percent > 100 {
            return Err(invalid(format!(
                "nav.default_skill_percent must be <= 100, got {}",
                self.nav.default_skill_percent
            )));
        }
        if let Some(skill) = self
            .nav
            .skills
            .iter()
            .find(|skill| skill.percent.is_some_and(|p| p > 100))
        {
            return Err(invalid(format!(
                "skill {:?} percent must be <= 100, got {}",
                skill.label,
                skill.percent.unwrap_or_default()
            )));
        }
        if self.storage.theme_key.trim().is_empty() {
            return Err(invalid("storage.theme_key must not be empty"));
        }
        Ok(())
    }
}

fn invalid(details: impl Into<String>) -> FolioError {
    FolioError::InvalidConfig {
        details: details.into(),
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[FOLIO-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn config_dir() -> PathBuf {
    home_dir().join(".config").join("folio")
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_parsed<F, T>(lookup: &mut F, name: &str, slot: &mut T) -> Result<()>
where
    F: FnMut(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        *slot = raw.trim().parse::<T>().map_err(|error| FolioError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.marquee.base_seconds, 16);
        assert_eq!(cfg.marquee.baseline_count, 14);
        assert_eq!(cfg.storage.theme_key, "site-theme");
    }

    #[test]
    fn zero_baseline_rejected() {
        let mut cfg = Config::default();
        cfg.marquee.baseline_count = 0;
        let err = cfg.validate().expect_err("expected invalid baseline");
        match err {
            FolioError::InvalidConfig { details } => assert!(details.contains("baseline_count")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skill_percent_over_hundred_rejected() {
        let mut cfg = Config::default();
        cfg.nav.skills.push(SkillConfig {
            label: "Rust".into(),
            percent: Some(120),
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_theme_key_rejected() {
        let mut cfg = Config::default();
        cfg.storage.theme_key = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn skill_percents_fall_back_to_default() {
        let mut nav = NavConfig::default();
        nav.skills = vec![
            SkillConfig {
                label: "Rust".into(),
                percent: Some(85),
            },
            SkillConfig {
                label: "SQL".into(),
                percent: None,
            },
        ];
        assert_eq!(nav.skill_percents(), vec![85, 60]);
    }

    #[test]
    fn env_overrides_apply() {
        let env = vars(&[
            ("FOLIO_MARQUEE_BASE_SECONDS", "20"),
            ("FOLIO_SEARCH_INCLUDE_TOOLS", "false"),
            ("FOLIO_NAV_START_SECTION", "about"),
            ("FOLIO_STORAGE_THEME_KEY", "theme"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_env_overrides_from(|name| env.get(name).cloned())
            .unwrap();
        assert_eq!(cfg.marquee.base_seconds, 20);
        assert!(!cfg.search.include_tools);
        assert_eq!(cfg.nav.start_section, Section::About);
        assert_eq!(cfg.storage.theme_key, "theme");
    }

    #[test]
    fn malformed_env_value_is_parse_error() {
        let env = vars(&[("FOLIO_MARQUEE_MINIMUM_SECONDS", "six")]);
        let mut cfg = Config::default();
        let err = cfg
            .apply_env_overrides_from(|name| env.get(name).cloned())
            .unwrap_err();
        assert_eq!(err.code(), "FOLIO-1003");
        assert!(err.to_string().contains("FOLIO_MARQUEE_MINIMUM_SECONDS"));
    }

    #[test]
    fn unknown_start_section_env_rejected() {
        let env = vars(&[("FOLIO_NAV_START_SECTION", "blog")]);
        let mut cfg = Config::default();
        assert!(
            cfg.apply_env_overrides_from(|name| env.get(name).cloned())
                .is_err()
        );
    }

    #[test]
    fn toml_round_trip_preserves_sections() {
        let raw = r#"
            [marquee]
            minimum_seconds = 4

            [nav]
            start_section = "projects"
            skills = [{ label = "Rust", percent = 90 }, { label = "Go" }]

            [widgets]
            carousel_items = 3
        "#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(cfg.marquee.minimum_seconds, 4);
        assert_eq!(cfg.marquee.base_seconds, 16);
        assert_eq!(cfg.nav.start_section, Section::Projects);
        assert_eq!(cfg.nav.skills[1].percent, None);
        assert_eq!(cfg.widgets.carousel_items, 3);

        let rendered = cfg.to_toml().unwrap();
        let back: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn load_returns_error_for_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/folio/config.toml")));
        assert!(matches!(result, Err(FolioError::MissingConfig { .. })));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\nexcerpt_chars = 80\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.search.excerpt_chars, 80);
        assert_eq!(cfg.paths.config_file, path);
    }

    #[test]
    fn normalize_expands_home_prefix() {
        let mut cfg = Config::default();
        cfg.storage.path = PathBuf::from("~/folio/storage.json");
        cfg.normalize_paths();
        assert!(!cfg.storage.path.starts_with("~"));
        assert!(cfg.storage.path.ends_with("folio/storage.json"));
    }
}
