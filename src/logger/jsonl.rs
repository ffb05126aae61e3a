//! JSONL logger: append-only line-delimited JSON records of UI activity.
//!
//! Each line is a self-contained JSON object, assembled in memory and written
//! with a single `write_all` so a tailing reader never sees a partial line.
//!
//! Four-level fallback chain:
//! 1. Primary file path
//! 2. Fallback path
//! 3. stderr with `[FOLIO-JSONL]` prefix
//! 4. Silent discard (a logging failure must never disturb the UI)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FolioError, Result};
use crate::ui::nav::Section;
use crate::ui::theme::Theme;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Activity event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SectionSwitch,
    DrawerToggle,
    ThemeToggle,
    ThemeLoadFailed,
    ThemePersistFailed,
    ModalOpen,
    ModalNavigate,
    ModalClose,
    GalleryQuery,
    GalleryFilter,
    GallerySort,
    GalleryShuffle,
    GalleryLayout,
    MarqueeTuned,
    InvalidIndex,
}

/// A single JSONL log entry. All fields are optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    /// Catalog index the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Marquee cycle duration after re-tuning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            section: None,
            project_index: None,
            theme: None,
            query: None,
            duration_secs: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn info(event: EventType) -> Self {
        Self::new(event, Severity::Info)
    }

    /// Warning entry carrying the code and message of a recoverable error.
    #[must_use]
    pub fn from_error(event: EventType, err: &FolioError) -> Self {
        let mut entry = Self::new(event, Severity::Warning);
        entry.error_code = Some(err.code().to_string());
        entry.details = Some(err.to_string());
        entry
    }

    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    #[must_use]
    pub fn with_project(mut self, index: usize) -> Self {
        self.project_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_secs = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Destination for activity records.
pub trait ActivitySink {
    fn record(&mut self, entry: LogEntry);
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<LogEntry>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn of_type(&self, event: EventType) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.event == event)
    }
}

impl ActivitySink for MemorySink {
    fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    /// Tried once the primary path cannot be opened or written.
    pub fallback_path: Option<PathBuf>,
    /// Size at which the current file is rotated. Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Rotated generations kept beside the live file. Default: 3.
    pub max_rotated_files: u32,
}

impl JsonlConfig {
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback_path: Some(std::env::temp_dir().join("folio-activity.jsonl")),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

/// An open log file and the number of bytes it already holds.
struct LogFile {
    path: PathBuf,
    out: BufWriter<File>,
    size: u64,
}

impl LogFile {
    fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| FolioError::io(parent, source))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| FolioError::io(path, source))?;
        let size = file.metadata().map_or(0, |m| m.len());
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            size,
        })
    }

    /// One `write_all` per line, flushed so readers never see half of it.
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.out.write_all(line.as_bytes())?;
        self.out.flush()?;
        self.size += line.len() as u64;
        Ok(())
    }

    /// Shift `path.N` generations up by one and start an empty live file.
    fn rotate(mut self, keep: u32) -> Result<Self> {
        let _ = self.out.flush();
        let path = self.path;
        drop(self.out);
        for generation in (1..keep).rev() {
            let _ = fs::rename(
                rotated_name(&path, generation),
                rotated_name(&path, generation + 1),
            );
        }
        let _ = fs::rename(&path, rotated_name(&path, 1));
        Self::open(&path)
    }
}

/// Where lines go right now. Every failure moves one rung down, never up.
enum Destination {
    Primary(LogFile),
    Fallback(LogFile),
    Stderr,
    Discard,
}

/// Append-only JSONL writer. Degrades from the primary file to the fallback
/// file, then stderr (`[FOLIO-JSONL]` prefix), then silence.
pub struct JsonlWriter {
    config: JsonlConfig,
    dest: Destination,
}

impl JsonlWriter {
    pub fn open(config: JsonlConfig) -> Self {
        let dest = match LogFile::open(&config.path) {
            Ok(file) => Destination::Primary(file),
            Err(_) => fallback_destination(&config),
        };
        Self { config, dest }
    }

    pub fn write_entry(&mut self, entry: &LogEntry) {
        match serde_json::to_string(entry) {
            Ok(json) => self.write_line(&format!("{json}\n")),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[FOLIO-JSONL] serialize error: {e}");
            }
        }
    }

    pub fn flush(&mut self) {
        if let Destination::Primary(file) | Destination::Fallback(file) = &mut self.dest {
            let _ = file.out.flush();
        }
    }

    /// `normal`, `fallback`, `stderr` or `discard`.
    pub fn state(&self) -> &str {
        match self.dest {
            Destination::Primary(_) => "normal",
            Destination::Fallback(_) => "fallback",
            Destination::Stderr => "stderr",
            Destination::Discard => "discard",
        }
    }

    fn write_line(&mut self, line: &str) {
        loop {
            self.rotate_if_full(line.len() as u64);
            let written = match &mut self.dest {
                Destination::Primary(file) | Destination::Fallback(file) => {
                    file.append(line).is_ok()
                }
                Destination::Stderr => {
                    let _ = write!(io::stderr(), "[FOLIO-JSONL] {line}");
                    true
                }
                Destination::Discard => true,
            };
            if written {
                return;
            }
            self.step_down();
        }
    }

    fn rotate_if_full(&mut self, incoming: u64) {
        let full = match &self.dest {
            Destination::Primary(file) | Destination::Fallback(file) => {
                file.size + incoming > self.config.max_size_bytes
            }
            _ => false,
        };
        if !full {
            return;
        }
        let keep = self.config.max_rotated_files;
        self.dest = match std::mem::replace(&mut self.dest, Destination::Discard) {
            Destination::Primary(file) => match file.rotate(keep) {
                Ok(file) => Destination::Primary(file),
                Err(_) => fallback_destination(&self.config),
            },
            Destination::Fallback(file) => match file.rotate(keep) {
                Ok(file) => Destination::Fallback(file),
                Err(_) => stderr_destination("fallback rotation failed"),
            },
            other => other,
        };
    }

    fn step_down(&mut self) {
        self.dest = match self.dest {
            Destination::Primary(_) => fallback_destination(&self.config),
            Destination::Fallback(_) => stderr_destination("fallback write failed"),
            Destination::Stderr | Destination::Discard => Destination::Discard,
        };
    }
}

impl ActivitySink for JsonlWriter {
    fn record(&mut self, entry: LogEntry) {
        self.write_entry(&entry);
    }
}

// ──────────────────────── helpers ────────────────────────

fn fallback_destination(config: &JsonlConfig) -> Destination {
    let Some(path) = config.fallback_path.as_deref() else {
        return stderr_destination("no writable log path");
    };
    match LogFile::open(path) {
        Ok(file) => {
            let _ = writeln!(
                io::stderr(),
                "[FOLIO-JSONL] primary path failed, using fallback: {}",
                path.display()
            );
            Destination::Fallback(file)
        }
        Err(_) => stderr_destination("no writable log path"),
    }
}

fn stderr_destination(reason: &str) -> Destination {
    let _ = writeln!(io::stderr(), "[FOLIO-JSONL] {reason}, using stderr");
    Destination::Stderr
}

/// `foo.jsonl` → `foo.jsonl.3`.
fn rotated_name(base: &Path, generation: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{generation}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
