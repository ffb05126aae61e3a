//! Property-based tests for the page state machine.
//!
//! Covers the loop index mapping, modal wrap-around, gallery ordering, and
//! arbitrary event sequences against the model invariants.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::gallery::{CategoryFilter, GalleryView, SortMode};
use super::input::Key;
use super::marquee::{LoopPresenter, SlotId};
use super::modal::DetailModal;
use super::model::{Mounted, SiteModel, SiteMsg, Target};
use super::nav::Section;
use super::update;
use crate::catalog::{Project, ProjectCatalog};
use crate::core::config::{Config, SearchConfig};

// ──────────────────── strategies ────────────────────

const CATEGORIES: [&str; 3] = ["web", "data", "ml"];
const WORDS: [&str; 6] = ["alpha", "Beta", "gamma", "DELTA", "rust", "model"];

fn arb_project(i: usize) -> impl Strategy<Value = Project> {
    (
        prop::sample::select(WORDS.to_vec()),
        prop::sample::select(WORDS.to_vec()),
        prop::sample::select(CATEGORIES.to_vec()),
    )
        .prop_map(move |(word, tool, category)| {
            // Index suffix keeps identities unique.
            Project::new(format!("{word} {i}"), format!("about {word}"))
                .with_tools(tool)
                .with_category(category)
        })
}

fn arb_catalog(max: usize) -> impl Strategy<Value = ProjectCatalog> {
    (0..=max)
        .prop_flat_map(|n| (0..n).map(arb_project).collect::<Vec<_>>())
        .prop_map(|projects| ProjectCatalog::new(projects).unwrap())
}

fn arb_nonempty_catalog(max: usize) -> impl Strategy<Value = ProjectCatalog> {
    arb_catalog(max).prop_filter("non-empty", |c| !c.is_empty())
}

fn arb_category() -> impl Strategy<Value = CategoryFilter> {
    prop_oneof![
        Just(CategoryFilter::All),
        prop::sample::select(CATEGORIES.to_vec()).prop_map(CategoryFilter::from_label),
    ]
}

fn arb_query() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::sample::select(WORDS.to_vec()).prop_map(str::to_string),
        "[a-e ]{0,3}",
    ]
}

fn arb_target(slots: usize) -> impl Strategy<Value = Target> {
    let slot = 0..slots.max(1) + 2;
    prop_oneof![
        slot.clone().prop_map(|s| Target::Slot(SlotId(s))),
        slot.prop_map(|s| Target::SlotContent(SlotId(s))),
        Just(Target::ModalBackdrop),
        Just(Target::ModalContent),
        Just(Target::ModalClose),
        Just(Target::ModalPrev),
        Just(Target::ModalNext),
        prop::sample::select(Section::ALL.to_vec()).prop_map(Target::NavLink),
        Just(Target::DrawerToggle),
        prop::sample::select(Section::ALL.to_vec()).prop_map(Target::DrawerLink),
        Just(Target::ThemeToggle),
        arb_category().prop_map(Target::FilterButton),
        prop::sample::select(vec![SortMode::None, SortMode::Ascending, SortMode::Descending])
            .prop_map(Target::SortButton),
        Just(Target::ShuffleButton),
        Just(Target::LayoutToggle),
        (0usize..12).prop_map(Target::CardDetails),
        (0usize..12).prop_map(Target::SearchResult),
    ]
}

fn arb_msg(slots: usize) -> impl Strategy<Value = SiteMsg> {
    prop_oneof![
        arb_target(slots).prop_map(SiteMsg::PointerEnter),
        (arb_target(slots), prop::option::of(arb_target(slots)))
            .prop_map(|(from, to)| SiteMsg::PointerLeave { from, to }),
        arb_target(slots).prop_map(SiteMsg::Click),
        prop::sample::select(vec![Key::ArrowLeft, Key::ArrowRight, Key::Escape, Key::Char('x')])
            .prop_map(SiteMsg::Key),
        arb_query().prop_map(SiteMsg::SearchInput),
        (300u32..1600, 300u32..1000).prop_map(|(width, height)| SiteMsg::Resize { width, height }),
        Just(SiteMsg::TuneSpeed),
        Just(SiteMsg::FillSkillBars),
    ]
}

fn started_model(catalog: ProjectCatalog, seed: u64) -> SiteModel {
    let mut model = SiteModel::new(catalog, &Config::default(), StdRng::seed_from_u64(seed));
    update::start(&mut model, Mounted::ALL);
    model
}

fn assert_model_invariants(model: &SiteModel) {
    let n = model.catalog.len();
    if let Some(index) = model.modal.open_index() {
        assert!(index < n, "modal open at {index} with catalog of {n}");
    }
    if let Some(slot) = model.marquee.expanded() {
        assert!(slot.0 < 2 * n, "expanded slot {} beyond loop", slot.0);
    }
    assert_eq!(model.marquee.displayed().len(), 2 * n);
    assert_eq!(model.loop_paused, model.is_paused());

    let mut order = model.gallery.order().to_vec();
    order.sort_unstable();
    assert_eq!(order, (0..n).collect::<Vec<_>>(), "gallery order lost an index");
}

fn titles(catalog: &ProjectCatalog, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&i| catalog.get(i).unwrap().title.to_lowercase())
        .collect()
}

// ──────────────────── property tests ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Doubling yields 2n slots and both copies resolve to the same index.
    #[test]
    fn loop_copies_resolve_together(n in 0usize..40) {
        let mut presenter = LoopPresenter::new();
        presenter.initialize(n, true);
        prop_assert_eq!(presenter.displayed().len(), 2 * n);
        for slot in 0..n {
            let first = presenter.resolve(SlotId(slot));
            prop_assert_eq!(first, presenter.resolve(SlotId(slot + n)));
            prop_assert_eq!(first, Some(slot));
        }
    }

    /// `next` applied n times returns to the start.
    #[test]
    fn modal_next_is_cyclic(catalog in arb_nonempty_catalog(12), start in 0usize..12) {
        let n = catalog.len();
        let start = start % n;
        let mut modal = DetailModal::new();
        modal.open_at(start, &catalog).unwrap();
        for _ in 0..n {
            modal.next(&catalog);
        }
        prop_assert_eq!(modal.open_index(), Some(start));
        modal.next(&catalog);
        modal.previous(&catalog);
        prop_assert_eq!(modal.open_index(), Some(start));
    }

    /// Descending is exactly the reverse of ascending for any visible subset.
    #[test]
    fn descending_reverses_ascending(
        catalog in arb_catalog(12),
        category in arb_category(),
        query in arb_query(),
    ) {
        let mut view = GalleryView::new(catalog.len(), &SearchConfig::default());
        view.apply_category(category, &catalog);
        view.apply_query(&query, &catalog);

        view.sort(SortMode::Ascending, &catalog);
        let ascending = view.visible(&catalog);
        let keys = titles(&catalog, &ascending);
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        view.sort(SortMode::Descending, &catalog);
        let mut descending = view.visible(&catalog);
        descending.reverse();
        prop_assert_eq!(descending, ascending);
    }

    /// Shuffling changes order only, and never reveals hidden cards.
    #[test]
    fn shuffle_preserves_visible_set(
        catalog in arb_catalog(12),
        category in arb_category(),
        seed in any::<u64>(),
        rounds in 1usize..5,
    ) {
        let mut view = GalleryView::new(catalog.len(), &SearchConfig::default());
        view.apply_category(category, &catalog);
        let mut expected = view.visible(&catalog);
        expected.sort_unstable();

        let hidden: Vec<(usize, usize)> = view
            .order()
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, i)| !expected.contains(i))
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..rounds {
            view.shuffle(&mut rng, &catalog);
            let mut visible = view.visible(&catalog);
            visible.sort_unstable();
            prop_assert_eq!(&visible, &expected);
            for &(pos, index) in &hidden {
                prop_assert_eq!(view.order()[pos], index);
            }
        }
    }

    /// An empty query leaves the category-only result.
    #[test]
    fn empty_query_restores_filter_result(
        catalog in arb_catalog(12),
        category in arb_category(),
        query in arb_query(),
    ) {
        let mut view = GalleryView::new(catalog.len(), &SearchConfig::default());
        view.apply_category(category, &catalog);
        let filter_only = view.visible(&catalog);
        view.apply_query(&query, &catalog);
        view.apply_query("", &catalog);
        prop_assert_eq!(view.visible(&catalog), filter_only);
    }

    /// Section cycling is a 4-cycle in both directions.
    #[test]
    fn section_cycle_round_trips(start in prop::sample::select(Section::ALL.to_vec())) {
        prop_assert_eq!(start.next().prev(), start);
        let mut s = start;
        for _ in 0..Section::ALL.len() {
            s = s.prev();
        }
        prop_assert_eq!(s, start);
    }

    /// Any sequence of events keeps the model consistent.
    #[test]
    fn reducer_preserves_invariants(
        (catalog, msgs) in arb_catalog(8).prop_flat_map(|catalog| {
            let slots = catalog.len() * 2;
            (Just(catalog), prop::collection::vec(arb_msg(slots), 1..60))
        }),
        seed in any::<u64>(),
    ) {
        let mut model = started_model(catalog, seed);
        assert_model_invariants(&model);
        for msg in msgs {
            let _ = update::update(&mut model, msg);
            assert_model_invariants(&model);
        }
    }
}
