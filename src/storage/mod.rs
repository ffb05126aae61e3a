//! Persistent key-value storage and the theme preference kept in it.
//!
//! Persistence is strictly best-effort: a disabled or broken store must never
//! change what the user sees within the current session.

pub mod kv;
pub mod theme_pref;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use theme_pref::{ThemeLoad, load_theme, persist_theme};
