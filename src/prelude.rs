//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use folio::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{FolioError, Result};

// Catalog
pub use crate::catalog::{Project, ProjectCatalog};

// Storage
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};

// Logging
pub use crate::logger::{ActivitySink, JsonlWriter, LogEntry, MemorySink};

// UI
pub use crate::ui::gallery::{CategoryFilter, Layout, SortMode};
pub use crate::ui::input::Key;
pub use crate::ui::marquee::SlotId;
pub use crate::ui::model::{SiteMsg, Target};
pub use crate::ui::nav::Section;
pub use crate::ui::render::{Mount, RecordingSurface, RenderOp, RenderSurface};
pub use crate::ui::runtime::Session;
pub use crate::ui::script::{Step, parse_script};
pub use crate::ui::theme::Theme;
