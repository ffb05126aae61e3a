//! Page interaction layer: a single-owner model driven by typed events.
//!
//! `model` holds the state and message/command types, `update` is the pure
//! transition function, and `runtime` executes commands against a render
//! surface, a key-value store, and an activity sink. The remaining modules
//! are the components the model is built from.

#![allow(missing_docs)]

pub mod gallery;
pub mod input;
pub mod marquee;
pub mod modal;
pub mod model;
pub mod nav;
pub mod render;
pub mod runtime;
pub mod script;
pub mod theme;
pub mod update;
pub mod widgets;

#[cfg(test)]
mod test_properties;

pub use runtime::Session;
