//! Theme preference persistence.
//!
//! Load never fails the caller: every outcome resolves to a theme, and the
//! non-clean outcomes carry enough detail for the activity log.

use crate::core::errors::Result;
use crate::storage::kv::KeyValueStore;
use crate::ui::theme::Theme;

/// Outcome of reading the persisted theme at session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeLoad {
    /// A valid value was stored.
    Stored(Theme),
    /// Nothing stored yet; normal on first visit.
    Missing,
    /// Something was stored but it is not a theme we know.
    Invalid { raw: String },
    /// The store itself could not be read.
    Unavailable { details: String },
}

impl ThemeLoad {
    /// Effective theme: stored value, otherwise the default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        match self {
            Self::Stored(theme) => *theme,
            _ => Theme::default(),
        }
    }
}

/// Read the theme preference under `key`.
pub fn load_theme(store: &dyn KeyValueStore, key: &str) -> ThemeLoad {
    match store.get(key) {
        Ok(Some(raw)) => Theme::parse(&raw).map_or(ThemeLoad::Invalid { raw }, ThemeLoad::Stored),
        Ok(None) => ThemeLoad::Missing,
        Err(e) => ThemeLoad::Unavailable {
            details: e.to_string(),
        },
    }
}

/// Write the theme preference. Callers are expected to log and swallow errors.
pub fn persist_theme(store: &mut dyn KeyValueStore, key: &str, theme: Theme) -> Result<()> {
    store.set(key, theme.as_str())
}
