//! Project catalog: the immutable, ordered list of projects every view reads.

pub mod project;

pub use project::{Project, ProjectCatalog};
