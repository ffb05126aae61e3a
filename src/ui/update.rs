//! Pure update function for the portfolio page state machine.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a command describing any side-effects the runtime should execute.
//!
//! **Invariant:** this module performs zero I/O. Rendering, persistence,
//! timers, and logging are all described as [`SiteCmd`] values.

use crate::core::errors::{FolioError, Result};
use crate::logger::{EventType, LogEntry};

use super::input::{InputAction, InputContext, resolve_key};
use super::model::{Mounted, SiteCmd, SiteModel, SiteMsg, Target};
use super::nav::Section;
use super::render::RenderOp;

/// Apply a message to the model and return the next command for the runtime.
///
/// Every state transition goes through here. After the handler runs, the
/// derived pause state is compared with what the surface last saw and a
/// [`RenderOp::LoopPaused`] is appended when it changed.
pub fn update(model: &mut SiteModel, msg: SiteMsg) -> SiteCmd {
    let cmd = match msg {
        SiteMsg::PointerEnter(target) => match target.slot() {
            Some(slot) => SiteCmd::render(model.marquee.set_hover(slot)),
            None => SiteCmd::None,
        },

        SiteMsg::PointerLeave { from, to } => match from.slot() {
            Some(slot) => {
                let still_inside = to.as_ref().and_then(Target::slot) == Some(slot);
                SiteCmd::render(model.marquee.clear_hover(slot, still_inside))
            }
            None => SiteCmd::None,
        },

        SiteMsg::Click(target) => handle_click(model, target),

        SiteMsg::Key(key) => {
            let context = InputContext {
                modal_open: model.modal.is_open(),
            };
            match resolve_key(key, context) {
                Some(action) => apply_input_action(model, action),
                None => SiteCmd::None,
            }
        }

        SiteMsg::SearchInput(text) => {
            let ops = model.gallery.apply_query(&text, &model.catalog);
            SiteCmd::batch(vec![
                SiteCmd::render(ops),
                SiteCmd::Log(LogEntry::info(EventType::GalleryQuery).with_query(text)),
            ])
        }

        SiteMsg::Resize { width, height } => {
            model.viewport = Some((width, height));
            if model.marquee.is_active() {
                SiteCmd::Schedule {
                    after: model.settings.resize_debounce,
                    msg: SiteMsg::TuneSpeed,
                }
            } else {
                SiteCmd::None
            }
        }

        SiteMsg::TuneSpeed => tune_speed(model),

        SiteMsg::FillSkillBars => SiteCmd::render(model.nav.fill_skill_bars()),
    };
    sync_pause(model, cmd)
}

/// Startup sequence, run once by the runtime after the persisted theme has
/// been applied to `model.nav`.
///
/// Without a marquee track the loop stays empty and every marquee operation
/// is a no-op. Without a modal mount, modal opens are skipped.
pub fn start(model: &mut SiteModel, mounted: Mounted) -> SiteCmd {
    model.modal_mounted = mounted.modal;
    let mut ops = vec![RenderOp::ApplyTheme {
        theme: model.nav.theme(),
    }];
    ops.extend(
        model
            .marquee
            .initialize(model.catalog.len(), mounted.track),
    );
    let tuned = model.marquee.tune_speed(&model.settings.marquee);
    ops.extend(tuned.clone());
    ops.extend(model.gallery.initial_ops(&model.catalog));
    ops.extend(model.nav.initial_ops());

    let mut cmds = vec![SiteCmd::render(ops), skill_animation(model)];
    if let Some(op) = model.carousel.show_initial() {
        cmds.push(SiteCmd::Render(vec![op]));
    }
    if let Some(RenderOp::LoopDuration { seconds }) = tuned {
        cmds.push(SiteCmd::Log(
            LogEntry::info(EventType::MarqueeTuned).with_duration(seconds),
        ));
    }
    cmds.push(SiteCmd::Log(
        LogEntry::info(EventType::SessionStart)
            .with_section(model.nav.active())
            .with_theme(model.nav.theme()),
    ));
    SiteCmd::batch(cmds)
}

/// Open the detail modal at a catalog index.
///
/// # Errors
/// Returns `InvalidIndex` when `index` is outside the catalog; the model is
/// left unchanged.
pub fn open_modal(model: &mut SiteModel, index: usize) -> Result<SiteCmd> {
    if !model.modal_mounted {
        if index >= model.catalog.len() {
            return Err(FolioError::InvalidIndex {
                index,
                len: model.catalog.len(),
            });
        }
        return Ok(SiteCmd::None);
    }
    let op = model.modal.open_at(index, &model.catalog)?;
    let cmd = SiteCmd::batch(vec![
        SiteCmd::Render(vec![op]),
        SiteCmd::Log(LogEntry::info(EventType::ModalOpen).with_project(index)),
    ]);
    Ok(sync_pause(model, cmd))
}

// ──────────────────── handlers ────────────────────

fn handle_click(model: &mut SiteModel, target: Target) -> SiteCmd {
    match target {
        Target::Slot(slot) | Target::SlotContent(slot) => match model.marquee.resolve(slot) {
            Some(index) => open_modal_logged(model, index),
            None => SiteCmd::None,
        },
        Target::CardDetails(index) | Target::SearchResult(index) => {
            open_modal_logged(model, index)
        }
        Target::ModalBackdrop | Target::ModalClose => close_modal(model),
        Target::ModalContent => SiteCmd::None,
        Target::ModalPrev => navigate_modal(model, false),
        Target::ModalNext => navigate_modal(model, true),
        Target::NavLink(section) => {
            let mut cmds = vec![switch_section(model, section)];
            if model.is_mobile() {
                cmds.push(close_drawer(model));
            }
            SiteCmd::batch(cmds)
        }
        Target::DrawerToggle => {
            let ops = model.nav.toggle_drawer();
            SiteCmd::batch(vec![
                SiteCmd::render(ops),
                SiteCmd::Log(
                    LogEntry::info(EventType::DrawerToggle)
                        .with_details(drawer_label(model.nav.drawer_open())),
                ),
            ])
        }
        Target::DrawerLink(section) => {
            let switched = switch_section(model, section);
            SiteCmd::batch(vec![switched, close_drawer(model)])
        }
        Target::ThemeToggle => {
            let (theme, op) = model.nav.toggle_theme();
            SiteCmd::batch(vec![
                SiteCmd::Render(vec![op]),
                SiteCmd::PersistTheme(theme),
                SiteCmd::Log(LogEntry::info(EventType::ThemeToggle).with_theme(theme)),
            ])
        }
        Target::FilterButton(category) => {
            let label = category.label().to_string();
            let ops = model.gallery.apply_category(category, &model.catalog);
            SiteCmd::batch(vec![
                SiteCmd::render(ops),
                SiteCmd::Log(LogEntry::info(EventType::GalleryFilter).with_details(label)),
            ])
        }
        Target::SortButton(mode) => {
            let ops = model.gallery.sort(mode, &model.catalog);
            SiteCmd::batch(vec![
                SiteCmd::render(ops),
                SiteCmd::Log(LogEntry::info(EventType::GallerySort).with_details(mode.as_str())),
            ])
        }
        Target::ShuffleButton => {
            let ops = model
                .gallery
                .shuffle(&mut model.shuffle_rng, &model.catalog);
            SiteCmd::batch(vec![
                SiteCmd::render(ops),
                SiteCmd::Log(LogEntry::info(EventType::GalleryShuffle)),
            ])
        }
        Target::LayoutToggle => {
            let op = model.gallery.toggle_layout();
            SiteCmd::batch(vec![
                SiteCmd::Render(vec![op]),
                SiteCmd::Log(
                    LogEntry::info(EventType::GalleryLayout)
                        .with_details(model.gallery.layout().as_str()),
                ),
            ])
        }
        Target::AccordionToggle(panel) => {
            SiteCmd::render(model.accordion.toggle(panel).into_iter().collect())
        }
        Target::CarouselNext => SiteCmd::render(model.carousel.next().into_iter().collect()),
        Target::CarouselPrev => SiteCmd::render(model.carousel.prev().into_iter().collect()),
    }
}

fn apply_input_action(model: &mut SiteModel, action: InputAction) -> SiteCmd {
    match action {
        InputAction::ModalPrev => navigate_modal(model, false),
        InputAction::ModalNext => navigate_modal(model, true),
        InputAction::CloseModal => close_modal(model),
        InputAction::SectionPrev => {
            let ops = model.nav.cycle(false);
            section_switched(model, ops)
        }
        InputAction::SectionNext => {
            let ops = model.nav.cycle(true);
            section_switched(model, ops)
        }
    }
}

/// Event-path modal open: an invalid index is a caller bug, logged and
/// otherwise ignored.
fn open_modal_logged(model: &mut SiteModel, index: usize) -> SiteCmd {
    match open_modal(model, index) {
        Ok(cmd) => cmd,
        Err(err) => SiteCmd::Log(
            LogEntry::from_error(EventType::InvalidIndex, &err).with_project(index),
        ),
    }
}

fn navigate_modal(model: &mut SiteModel, forward: bool) -> SiteCmd {
    let op = if forward {
        model.modal.next(&model.catalog)
    } else {
        model.modal.previous(&model.catalog)
    };
    match (op, model.modal.open_index()) {
        (Some(op), Some(index)) => SiteCmd::batch(vec![
            SiteCmd::Render(vec![op]),
            SiteCmd::Log(LogEntry::info(EventType::ModalNavigate).with_project(index)),
        ]),
        _ => SiteCmd::None,
    }
}

/// Closing the modal never collapses a hovered slot, so the loop resumes only
/// when nothing is expanded (handled by the pause sync).
fn close_modal(model: &mut SiteModel) -> SiteCmd {
    match model.modal.close() {
        Some(op) => SiteCmd::batch(vec![
            SiteCmd::Render(vec![op]),
            SiteCmd::Log(LogEntry::info(EventType::ModalClose)),
        ]),
        None => SiteCmd::None,
    }
}

fn switch_section(model: &mut SiteModel, section: Section) -> SiteCmd {
    let ops = model.nav.switch_to(section);
    section_switched(model, ops)
}

/// Follow-up for a section change already applied to `model.nav`.
fn section_switched(model: &SiteModel, ops: Vec<RenderOp>) -> SiteCmd {
    let section = model.nav.active();
    let mut cmds = vec![SiteCmd::render(ops)];
    if section.shows_skill_bars() {
        cmds.push(skill_animation(model));
    }
    cmds.push(SiteCmd::Log(
        LogEntry::info(EventType::SectionSwitch).with_section(section),
    ));
    SiteCmd::batch(cmds)
}

fn close_drawer(model: &mut SiteModel) -> SiteCmd {
    let ops = model.nav.close_drawer();
    if ops.is_empty() {
        return SiteCmd::None;
    }
    SiteCmd::batch(vec![
        SiteCmd::Render(ops),
        SiteCmd::Log(LogEntry::info(EventType::DrawerToggle).with_details(drawer_label(false))),
    ])
}

/// Reset every skill bar to empty now and fill it after the configured delay.
fn skill_animation(model: &SiteModel) -> SiteCmd {
    if !model.nav.has_skill_bars() {
        return SiteCmd::None;
    }
    SiteCmd::Batch(vec![
        SiteCmd::Render(model.nav.reset_skill_bars()),
        SiteCmd::Schedule {
            after: model.settings.skill_fill_delay,
            msg: SiteMsg::FillSkillBars,
        },
    ])
}

fn tune_speed(model: &mut SiteModel) -> SiteCmd {
    match model.marquee.tune_speed(&model.settings.marquee) {
        Some(op) => {
            let seconds = model.marquee.duration_secs().unwrap_or_default();
            SiteCmd::batch(vec![
                SiteCmd::Render(vec![op]),
                SiteCmd::Log(LogEntry::info(EventType::MarqueeTuned).with_duration(seconds)),
            ])
        }
        None => SiteCmd::None,
    }
}

fn sync_pause(model: &mut SiteModel, cmd: SiteCmd) -> SiteCmd {
    let paused = model.is_paused();
    if paused == model.loop_paused {
        return cmd;
    }
    model.loop_paused = paused;
    if !model.marquee.is_active() {
        return cmd;
    }
    SiteCmd::batch(vec![cmd, SiteCmd::Render(vec![RenderOp::LoopPaused { paused }])])
}

const fn drawer_label(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Project, ProjectCatalog};
    use crate::core::config::{Config, SkillConfig};
    use crate::ui::gallery::{CategoryFilter, SortMode};
    use crate::ui::input::Key;
    use crate::ui::marquee::SlotId;
    use crate::ui::theme::Theme;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn catalog() -> ProjectCatalog {
        ProjectCatalog::new(vec![
            Project::new("Zeta", "z").with_category("data"),
            Project::new("Alpha", "a").with_category("web"),
            Project::new("Mid", "m").with_category("ml"),
            Project::new("Beta", "b").with_category("web"),
        ])
        .unwrap()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.nav.skills = vec![
            SkillConfig {
                label: "Rust".to_string(),
                percent: Some(90),
            },
            SkillConfig {
                label: "SQL".to_string(),
                percent: None,
            },
        ];
        config
    }

    fn started() -> SiteModel {
        let mut model = SiteModel::new(catalog(), &config(), StdRng::seed_from_u64(3));
        start(&mut model, Mounted::ALL);
        model
    }

    fn ops(cmd: &SiteCmd) -> Vec<RenderOp> {
        cmd.render_ops()
    }

    fn has_schedule(cmd: &SiteCmd, wanted: &SiteMsg) -> bool {
        match cmd {
            SiteCmd::Schedule { msg, .. } => msg == wanted,
            SiteCmd::Batch(cmds) => cmds.iter().any(|c| has_schedule(c, wanted)),
            _ => false,
        }
    }

    fn logs(cmd: &SiteCmd) -> Vec<EventType> {
        match cmd {
            SiteCmd::Log(entry) => vec![entry.event],
            SiteCmd::Batch(cmds) => cmds.iter().flat_map(logs).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn start_applies_theme_first_and_builds_loop() {
        let mut model = SiteModel::new(catalog(), &config(), StdRng::seed_from_u64(3));
        model.nav.set_theme(Theme::Dark);
        let cmd = start(&mut model, Mounted::ALL);
        let rendered = ops(&cmd);
        assert_eq!(rendered[0], RenderOp::ApplyTheme { theme: Theme::Dark });
        assert!(matches!(rendered[1], RenderOp::LoopBuilt { ref slots } if slots.len() == 8));
        assert!(rendered.contains(&RenderOp::LoopDuration { seconds: 9 }));
        assert!(has_schedule(&cmd, &SiteMsg::FillSkillBars));
        assert!(logs(&cmd).contains(&EventType::SessionStart));
    }

    #[test]
    fn start_without_track_leaves_loop_inactive() {
        let mut model = SiteModel::new(catalog(), &config(), StdRng::seed_from_u64(3));
        let cmd = start(
            &mut model,
            Mounted {
                track: false,
                modal: true,
            },
        );
        assert!(!model.marquee.is_active());
        assert!(
            !ops(&cmd)
                .iter()
                .any(|op| matches!(op, RenderOp::LoopDuration { .. }))
        );
    }

    #[test]
    fn hover_pauses_and_leave_resumes() {
        let mut model = started();
        let cmd = update(&mut model, SiteMsg::PointerEnter(Target::Slot(SlotId(5))));
        assert!(ops(&cmd).contains(&RenderOp::LoopPaused { paused: true }));

        // Moving onto a child of the same slot is not a leave.
        let cmd = update(
            &mut model,
            SiteMsg::PointerLeave {
                from: Target::Slot(SlotId(5)),
                to: Some(Target::SlotContent(SlotId(5))),
            },
        );
        assert_eq!(cmd, SiteCmd::None);
        assert!(model.is_paused());

        let cmd = update(
            &mut model,
            SiteMsg::PointerLeave {
                from: Target::Slot(SlotId(5)),
                to: None,
            },
        );
        assert!(ops(&cmd).contains(&RenderOp::LoopPaused { paused: false }));
    }

    #[test]
    fn slot_click_opens_resolved_index() {
        let mut model = started();
        update(&mut model, SiteMsg::PointerEnter(Target::Slot(SlotId(5))));
        update(&mut model, SiteMsg::Click(Target::SlotContent(SlotId(5))));
        assert_eq!(model.modal.open_index(), Some(1));
        update(&mut model, SiteMsg::Click(Target::ModalNext));
        assert_eq!(model.modal.open_index(), Some(2));
    }

    #[test]
    fn closing_modal_while_hovered_keeps_loop_paused() {
        let mut model = started();
        update(&mut model, SiteMsg::PointerEnter(Target::Slot(SlotId(1))));
        update(&mut model, SiteMsg::Click(Target::Slot(SlotId(1))));
        let cmd = update(&mut model, SiteMsg::Click(Target::ModalBackdrop));
        assert!(!model.modal.is_open());
        assert!(model.is_paused());
        assert!(
            !ops(&cmd)
                .iter()
                .any(|op| matches!(op, RenderOp::LoopPaused { .. }))
        );
    }

    #[test]
    fn leaving_slot_while_modal_open_keeps_loop_paused() {
        let mut model = started();
        update(&mut model, SiteMsg::PointerEnter(Target::Slot(SlotId(0))));
        update(&mut model, SiteMsg::Click(Target::Slot(SlotId(0))));
        let cmd = update(
            &mut model,
            SiteMsg::PointerLeave {
                from: Target::Slot(SlotId(0)),
                to: Some(Target::ModalContent),
            },
        );
        assert!(model.is_paused());
        assert!(!ops(&cmd).contains(&RenderOp::LoopPaused { paused: false }));

        let cmd = update(&mut model, SiteMsg::Key(Key::Escape));
        assert!(ops(&cmd).contains(&RenderOp::LoopPaused { paused: false }));
    }

    #[test]
    fn modal_content_click_does_not_close() {
        let mut model = started();
        update(&mut model, SiteMsg::Click(Target::CardDetails(3)));
        assert_eq!(update(&mut model, SiteMsg::Click(Target::ModalContent)), SiteCmd::None);
        assert!(model.modal.is_open());
    }

    #[test]
    fn arrows_navigate_modal_before_sections() {
        let mut model = started();
        update(&mut model, SiteMsg::Click(Target::CardDetails(0)));
        update(&mut model, SiteMsg::Key(Key::ArrowLeft));
        assert_eq!(model.modal.open_index(), Some(3));
        assert_eq!(model.nav.active(), Section::Home);

        update(&mut model, SiteMsg::Key(Key::Escape));
        update(&mut model, SiteMsg::Key(Key::ArrowLeft));
        assert_eq!(model.nav.active(), Section::About);
    }

    #[test]
    fn invalid_details_index_is_logged_not_opened() {
        let mut model = started();
        let cmd = update(&mut model, SiteMsg::Click(Target::SearchResult(99)));
        assert!(!model.modal.is_open());
        assert_eq!(logs(&cmd), vec![EventType::InvalidIndex]);
    }

    #[test]
    fn programmatic_open_surfaces_invalid_index() {
        let mut model = started();
        let err = open_modal(&mut model, 4).unwrap_err();
        assert_eq!(err.code(), "FOLIO-2001");
        assert!(!model.modal.is_open());
    }

    #[test]
    fn entering_skill_section_replays_animation() {
        let mut model = started();
        let cmd = update(&mut model, SiteMsg::Click(Target::NavLink(Section::Projects)));
        assert!(ops(&cmd).contains(&RenderOp::SkillFill { bar: 0, percent: 0 }));
        assert!(has_schedule(&cmd, &SiteMsg::FillSkillBars));

        let again = update(&mut model, SiteMsg::Click(Target::NavLink(Section::Projects)));
        assert!(has_schedule(&again, &SiteMsg::FillSkillBars));

        let info = update(&mut model, SiteMsg::Click(Target::NavLink(Section::Info)));
        assert!(!has_schedule(&info, &SiteMsg::FillSkillBars));

        let fill = update(&mut model, SiteMsg::FillSkillBars);
        assert_eq!(
            ops(&fill),
            vec![
                RenderOp::SkillFill {
                    bar: 0,
                    percent: 90
                },
                RenderOp::SkillFill {
                    bar: 1,
                    percent: 60
                },
            ]
        );
    }

    #[test]
    fn drawer_link_switches_then_closes() {
        let mut model = started();
        update(&mut model, SiteMsg::Click(Target::DrawerToggle));
        assert!(model.nav.drawer_open());
        let cmd = update(&mut model, SiteMsg::Click(Target::DrawerLink(Section::Info)));
        assert_eq!(model.nav.active(), Section::Info);
        assert!(!model.nav.drawer_open());
        assert!(ops(&cmd).contains(&RenderOp::DrawerVisible { open: false }));
    }

    #[test]
    fn header_link_closes_drawer_only_on_narrow_viewport() {
        let mut model = started();
        update(
            &mut model,
            SiteMsg::Resize {
                width: 1200,
                height: 800,
            },
        );
        update(&mut model, SiteMsg::Click(Target::DrawerToggle));
        update(&mut model, SiteMsg::Click(Target::NavLink(Section::Info)));
        assert!(model.nav.drawer_open());

        update(
            &mut model,
            SiteMsg::Resize {
                width: 800,
                height: 800,
            },
        );
        update(&mut model, SiteMsg::Click(Target::NavLink(Section::About)));
        assert!(!model.nav.drawer_open());
    }

    #[test]
    fn theme_toggle_requests_persist() {
        let mut model = started();
        let cmd = update(&mut model, SiteMsg::Click(Target::ThemeToggle));
        match cmd {
            SiteCmd::Batch(cmds) => {
                assert!(cmds.contains(&SiteCmd::PersistTheme(Theme::Dark)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn resize_schedules_debounced_tune_without_touching_hover() {
        let mut model = started();
        update(&mut model, SiteMsg::PointerEnter(Target::Slot(SlotId(2))));
        let cmd = update(
            &mut model,
            SiteMsg::Resize {
                width: 500,
                height: 900,
            },
        );
        assert_eq!(
            cmd,
            SiteCmd::Schedule {
                after: Duration::from_millis(120),
                msg: SiteMsg::TuneSpeed
            }
        );
        update(&mut model, SiteMsg::TuneSpeed);
        assert_eq!(model.marquee.expanded(), Some(SlotId(2)));
    }

    #[test]
    fn gallery_events_flow_through() {
        let mut model = started();
        update(
            &mut model,
            SiteMsg::Click(Target::FilterButton(CategoryFilter::from_label("web"))),
        );
        let cmd = update(
            &mut model,
            SiteMsg::Click(Target::SortButton(SortMode::Ascending)),
        );
        assert!(ops(&cmd).contains(&RenderOp::GalleryOrder {
            visible: vec![1, 3]
        }));
        let cmd = update(&mut model, SiteMsg::SearchInput("zeta".to_string()));
        assert_eq!(logs(&cmd), vec![EventType::GalleryQuery]);
        assert!(model.gallery.visible(&model.catalog).is_empty());
    }

    #[test]
    fn empty_catalog_marquee_is_inert() {
        let mut model = SiteModel::new(
            ProjectCatalog::empty(),
            &config(),
            StdRng::seed_from_u64(0),
        );
        start(&mut model, Mounted::ALL);
        assert_eq!(
            update(&mut model, SiteMsg::PointerEnter(Target::Slot(SlotId(0)))),
            SiteCmd::None
        );
        assert_eq!(
            update(&mut model, SiteMsg::Click(Target::Slot(SlotId(0)))),
            SiteCmd::None
        );
        assert_eq!(
            update(
                &mut model,
                SiteMsg::Resize {
                    width: 10,
                    height: 10
                }
            ),
            SiteCmd::None
        );
    }
}
