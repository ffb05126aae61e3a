#![forbid(unsafe_code)]

//! folio: interaction engine for a personal portfolio page.
//!
//! The page is modelled as one state machine:
//! 1. **Catalog**: the ordered, immutable list of projects
//! 2. **Components**: looping marquee, detail modal, filtered gallery, navigation
//! 3. **Runtime**: a session that turns events into render instructions
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use folio::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use folio::core::config::Config;
//! use folio::ui::marquee::{LoopPresenter, SlotId};
//! ```

pub mod prelude;

pub mod catalog;
pub mod core;
pub mod logger;
pub mod storage;
pub mod ui;
