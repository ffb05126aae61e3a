//! Session runtime: executes commands against the real collaborators.
//!
//! A [`Session`] owns the [`SiteModel`] together with a render surface, a
//! key-value store, and an activity sink. Timers run on a virtual clock that
//! only moves when [`Session::advance`] is called, which keeps replays and
//! tests deterministic.

#![allow(missing_docs)]

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::ProjectCatalog;
use crate::core::config::Config;
use crate::core::errors::Result;
use crate::logger::{ActivitySink, EventType, LogEntry, Severity};
use crate::storage::{KeyValueStore, ThemeLoad, load_theme, persist_theme};

use super::model::{Mounted, SiteCmd, SiteModel, SiteMsg};
use super::render::{Mount, RenderSurface};
use super::update;

// ──────────────────── timers ────────────────────

#[derive(Debug)]
struct Timer {
    due: Duration,
    seq: u64,
    msg: SiteMsg,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Reversed so the max-heap pops the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Fire-once timers ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
struct TimerQueue {
    heap: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    fn push(&mut self, due: Duration, msg: SiteMsg) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer { due, seq, msg });
    }

    fn pop_due(&mut self, deadline: Duration) -> Option<Timer> {
        if self.heap.peek().is_some_and(|t| t.due <= deadline) {
            self.heap.pop()
        } else {
            None
        }
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

// ──────────────────── session ────────────────────

pub struct Session<S, K, L> {
    model: SiteModel,
    surface: S,
    store: K,
    sink: L,
    theme_key: String,
    clock: Duration,
    timers: TimerQueue,
    started: bool,
}

impl<S, K, L> Session<S, K, L>
where
    S: RenderSurface,
    K: KeyValueStore,
    L: ActivitySink,
{
    /// Build a session with OS-seeded shuffle randomness.
    pub fn new(catalog: ProjectCatalog, config: &Config, surface: S, store: K, sink: L) -> Self {
        Self::with_rng(catalog, config, surface, store, sink, StdRng::from_os_rng())
    }

    /// Build a session with a fixed shuffle seed.
    pub fn with_seed(
        catalog: ProjectCatalog,
        config: &Config,
        surface: S,
        store: K,
        sink: L,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            catalog,
            config,
            surface,
            store,
            sink,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        catalog: ProjectCatalog,
        config: &Config,
        surface: S,
        store: K,
        sink: L,
        rng: StdRng,
    ) -> Self {
        Self {
            model: SiteModel::new(catalog, config, rng),
            surface,
            store,
            sink,
            theme_key: config.storage.theme_key.clone(),
            clock: Duration::ZERO,
            timers: TimerQueue::default(),
            started: false,
        }
    }

    /// Load the persisted theme and paint the initial page. Runs once;
    /// later calls are ignored.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        match load_theme(&self.store, &self.theme_key) {
            ThemeLoad::Stored(theme) => {
                self.model.nav.set_theme(theme);
            }
            ThemeLoad::Missing => {}
            ThemeLoad::Invalid { raw } => {
                self.sink.record(
                    LogEntry::new(EventType::ThemeLoadFailed, Severity::Warning)
                        .with_details(format!("ignoring stored theme {raw:?}")),
                );
            }
            ThemeLoad::Unavailable { details } => {
                self.sink.record(
                    LogEntry::new(EventType::ThemeLoadFailed, Severity::Warning)
                        .with_details(details),
                );
            }
        }

        let mounted = Mounted {
            track: self.surface.has_mount(Mount::MarqueeTrack),
            modal: self.surface.has_mount(Mount::Modal),
        };
        let cmd = update::start(&mut self.model, mounted);
        self.execute(cmd);
    }

    /// Run one event through the state machine and execute the result.
    pub fn dispatch(&mut self, msg: SiteMsg) {
        let cmd = update::update(&mut self.model, msg);
        self.execute(cmd);
    }

    /// Open the detail modal directly.
    ///
    /// # Errors
    /// Returns `InvalidIndex` for an index outside the catalog. Nothing is
    /// rendered in that case.
    pub fn open_modal(&mut self, index: usize) -> Result<()> {
        let cmd = update::open_modal(&mut self.model, index)?;
        self.execute(cmd);
        Ok(())
    }

    /// Move the virtual clock forward, firing every timer that comes due in
    /// order. Timers scheduled by fired timers run too if they fall inside
    /// the window.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.clock.saturating_add(by);
        while let Some(timer) = self.timers.pop_due(deadline) {
            self.clock = timer.due;
            self.dispatch(timer.msg);
        }
        self.clock = deadline;
    }

    #[must_use]
    pub const fn model(&self) -> &SiteModel {
        &self.model
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn store(&self) -> &K {
        &self.store
    }

    #[must_use]
    pub const fn sink(&self) -> &L {
        &self.sink
    }

    /// Current virtual time since the session was created.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Tear down the session, handing back its collaborators.
    pub fn into_parts(self) -> (S, K, L) {
        (self.surface, self.store, self.sink)
    }

    fn execute(&mut self, cmd: SiteCmd) {
        match cmd {
            SiteCmd::None => {}
            SiteCmd::Render(ops) => {
                for op in ops {
                    if self.surface.has_mount(op.mount()) {
                        self.surface.apply(op);
                    }
                }
            }
            SiteCmd::PersistTheme(theme) => {
                if let Err(err) = persist_theme(&mut self.store, &self.theme_key, theme) {
                    self.sink.record(
                        LogEntry::from_error(EventType::ThemePersistFailed, &err).with_theme(theme),
                    );
                }
            }
            SiteCmd::Schedule { after, msg } => {
                self.timers.push(self.clock.saturating_add(after), msg);
            }
            SiteCmd::Log(entry) => self.sink.record(entry),
            SiteCmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
        }
    }
}
