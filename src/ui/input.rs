//! Keyboard routing with modal precedence.

#![allow(missing_docs)]

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Char(char),
}

impl Key {
    /// Parse a key name as written in replay scripts.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" | "arrowleft" => Some(Self::ArrowLeft),
            "right" | "arrowright" => Some(Self::ArrowRight),
            "escape" | "esc" => Some(Self::Escape),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Self::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputContext {
    pub modal_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    ModalPrev,
    ModalNext,
    CloseModal,
    SectionPrev,
    SectionNext,
}

/// Resolve a key press: the open modal claims arrows and escape first, then
/// arrows fall through to section cycling. Everything else is ignored.
#[must_use]
pub const fn resolve_key(key: Key, context: InputContext) -> Option<InputAction> {
    if context.modal_open {
        return match key {
            Key::ArrowLeft => Some(InputAction::ModalPrev),
            Key::ArrowRight => Some(InputAction::ModalNext),
            Key::Escape => Some(InputAction::CloseModal),
            Key::Char(_) => None,
        };
    }
    match key {
        Key::ArrowLeft => Some(InputAction::SectionPrev),
        Key::ArrowRight => Some(InputAction::SectionNext),
        Key::Escape | Key::Char(_) => None,
    }
}
