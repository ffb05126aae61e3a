//! Activity logging: JSONL append-only records of UI state transitions.

pub mod jsonl;

pub use jsonl::{ActivitySink, EventType, JsonlConfig, JsonlWriter, LogEntry, MemorySink, Severity};
