//! Line-oriented event scripts for replaying interactions.
//!
//! ```text
//! # hover the sixth card, open it, step forward, close
//! enter slot 5
//! click slot 5
//! key right
//! key escape
//! leave slot 5
//! type churn model
//! click filter web
//! resize 800 600
//! wait 120
//! ```

#![allow(missing_docs)]

use std::time::Duration;

use crate::core::errors::{FolioError, Result};

use super::gallery::{CategoryFilter, SortMode};
use super::input::Key;
use super::marquee::SlotId;
use super::model::{SiteMsg, Target};
use super::nav::Section;

/// One script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Dispatch(SiteMsg),
    /// Advance the virtual clock.
    Wait(Duration),
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
///
/// # Errors
/// Returns `ScriptParse` with the 1-based line number of the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_step(line).map_err(|details| FolioError::ScriptParse {
            line: idx + 1,
            details,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_step(line: &str) -> std::result::Result<Step, String> {
    let (verb, rest) = split_word(line);
    match verb {
        "enter" => Ok(Step::Dispatch(SiteMsg::PointerEnter(parse_slot_target(rest)?))),
        "leave" => {
            let (from, to) = match rest.split_once(" to ") {
                Some((from, to)) => (from, Some(to)),
                None => (rest, None),
            };
            let from = parse_slot_target(from)?;
            let to = to.map(parse_target).transpose()?;
            Ok(Step::Dispatch(SiteMsg::PointerLeave { from, to }))
        }
        "click" => Ok(Step::Dispatch(SiteMsg::Click(parse_target(rest)?))),
        "key" => Key::parse(rest.trim())
            .map(|key| Step::Dispatch(SiteMsg::Key(key)))
            .ok_or_else(|| format!("unknown key {:?}", rest.trim())),
        // Everything after the verb is the query, spaces included.
        "type" => Ok(Step::Dispatch(SiteMsg::SearchInput(rest.to_string()))),
        "resize" => {
            let mut parts = rest.split_whitespace();
            let width = parse_number(parts.next(), "width")?;
            let height = parse_number(parts.next(), "height")?;
            expect_end(parts.next())?;
            Ok(Step::Dispatch(SiteMsg::Resize { width, height }))
        }
        "wait" => {
            let ms: u64 = parse_number(Some(rest.trim()), "milliseconds")?;
            Ok(Step::Wait(Duration::from_millis(ms)))
        }
        other => Err(format!("unknown step {other:?}")),
    }
}

fn parse_slot_target(text: &str) -> std::result::Result<Target, String> {
    let target = parse_target(text)?;
    if target.slot().is_none() {
        return Err(format!("expected a slot, got {:?}", text.trim()));
    }
    Ok(target)
}

fn parse_target(text: &str) -> std::result::Result<Target, String> {
    let (name, arg) = split_word(text.trim());
    let arg = arg.trim();
    let target = match name {
        "slot" => Target::Slot(SlotId(parse_number(Some(arg), "slot")?)),
        "slot-content" => Target::SlotContent(SlotId(parse_number(Some(arg), "slot")?)),
        "details" => Target::CardDetails(parse_number(Some(arg), "index")?),
        "result" => Target::SearchResult(parse_number(Some(arg), "index")?),
        "backdrop" => Target::ModalBackdrop,
        "modal-content" => Target::ModalContent,
        "close" => Target::ModalClose,
        "prev" => Target::ModalPrev,
        "next" => Target::ModalNext,
        "nav" => Target::NavLink(parse_section(arg)?),
        "drawer" => Target::DrawerToggle,
        "drawer-link" => Target::DrawerLink(parse_section(arg)?),
        "theme" => Target::ThemeToggle,
        "filter" if !arg.is_empty() => Target::FilterButton(CategoryFilter::from_label(arg)),
        "sort" => Target::SortButton(
            SortMode::parse(arg).ok_or_else(|| format!("unknown sort mode {arg:?}"))?,
        ),
        "shuffle" => Target::ShuffleButton,
        "layout" => Target::LayoutToggle,
        "accordion" => Target::AccordionToggle(parse_number(Some(arg), "panel")?),
        "carousel" => match arg {
            "next" => Target::CarouselNext,
            "prev" => Target::CarouselPrev,
            _ => return Err(format!("carousel expects next|prev, got {arg:?}")),
        },
        _ => return Err(format!("unknown target {:?}", text.trim())),
    };
    Ok(target)
}

fn parse_section(id: &str) -> std::result::Result<Section, String> {
    Section::from_id(id).ok_or_else(|| {
        FolioError::UnknownSection {
            id: id.to_string(),
        }
        .to_string()
    })
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<&str>,
    what: &str,
) -> std::result::Result<T, String> {
    let raw = raw.ok_or_else(|| format!("missing {what}"))?;
    raw.parse()
        .map_err(|_| format!("invalid {what} {raw:?}"))
}

fn expect_end(extra: Option<&str>) -> std::result::Result<(), String> {
    match extra {
        Some(word) => Err(format!("unexpected trailing {word:?}")),
        None => Ok(()),
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim_start()),
        None => (text, ""),
    }
}
