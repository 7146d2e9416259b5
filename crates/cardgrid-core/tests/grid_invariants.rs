//! Property tests for the reorder, selection, and drag invariants.
//!
//! Random event streams are pushed through the public `CardGrid` API against a
//! single-row layout; after every event the collection must still be a
//! permutation of the starting ids.

use ahash::AHashSet;
use cardgrid_core::reorder::reorder_ids;
use cardgrid_core::{
    Bounds, CardGrid, CardId, Collection, DragPhase, GridEvent, Modifiers, SelectionState,
};
use proptest::prelude::*;

const CARD_W: f64 = 80.0;

fn row(slot: usize, _id: CardId) -> Option<Bounds> {
    Some(Bounds::from_origin_size(
        slot as f64 * CARD_W,
        0.0,
        CARD_W,
        45.0,
    ))
}

fn ids(values: &[u64]) -> Vec<CardId> {
    values.iter().copied().map(CardId::new).collect()
}

fn sequential(len: u64) -> Collection {
    Collection::with_sequential_ids(u32::try_from(len).unwrap())
}

fn sorted(mut v: Vec<CardId>) -> Vec<CardId> {
    v.sort();
    v
}

/// A collection of `len` sequential ids plus a duplicate-free group drawn
/// from it (possibly with ids outside the collection mixed in).
fn collection_and_group() -> impl Strategy<Value = (Vec<u64>, Vec<u64>, usize)> {
    (1usize..24).prop_flat_map(|len| {
        let pool: Vec<u64> = (1..=len as u64 + 3).collect();
        let group = proptest::sample::subsequence(pool, 0..=len).prop_shuffle();
        (Just((1..=len as u64).collect::<Vec<u64>>()), group, 0..=len + 2)
    })
}

fn modifiers() -> impl Strategy<Value = Modifiers> {
    prop_oneof![
        Just(Modifiers::NONE),
        Just(Modifiers::CTRL),
        Just(Modifiers::SUPER),
        Just(Modifiers::SHIFT),
        Just(Modifiers::CTRL | Modifiers::SHIFT),
    ]
}

fn event(len: u64) -> impl Strategy<Value = GridEvent> {
    let id = (1..=len + 1).prop_map(CardId::new);
    prop_oneof![
        (id.clone(), modifiers()).prop_map(|(id, m)| GridEvent::click_with(id, m)),
        id.clone().prop_map(|id| GridEvent::DragBegin { id }),
        (id, -20.0..(len as f64 + 1.0) * CARD_W).prop_map(|(id, x)| GridEvent::hover(id, x)),
        any::<bool>().prop_map(|committed| GridEvent::DragEnd { committed }),
    ]
}

fn grid_and_events() -> impl Strategy<Value = (u64, Vec<GridEvent>)> {
    (1u64..16).prop_flat_map(|len| (Just(len), prop::collection::vec(event(len), 0..64)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn reorder_is_a_permutation((c, d, insert_index) in collection_and_group()) {
        let out = reorder_ids(&ids(&c), &ids(&d), insert_index);
        prop_assert_eq!(sorted(out), ids(&c));
    }

    #[test]
    fn reorder_keeps_group_contiguous_and_in_drag_order(
        (c, d, insert_index) in collection_and_group()
    ) {
        let out = reorder_ids(&ids(&c), &ids(&d), insert_index);
        let live: Vec<CardId> = ids(&d).into_iter().filter(|id| c.contains(&id.get())).collect();
        if let Some(first) = live.first() {
            let start = out.iter().position(|id| id == first).unwrap();
            prop_assert_eq!(&out[start..start + live.len()], live.as_slice());
        }
    }

    #[test]
    fn reorder_keeps_remainder_order((c, d, insert_index) in collection_and_group()) {
        let moved: AHashSet<u64> = d.iter().copied().collect();
        let out = reorder_ids(&ids(&c), &ids(&d), insert_index);
        let before: Vec<u64> = c.iter().copied().filter(|id| !moved.contains(id)).collect();
        let after: Vec<u64> = out
            .iter()
            .map(|id| id.get())
            .filter(|id| !moved.contains(id))
            .collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn range_selection_is_symmetric(len in 2u64..20, a in 0u64..20, b in 0u64..20) {
        let a = CardId::new(a % len + 1);
        let b = CardId::new(b % len + 1);
        prop_assume!(a != b);
        let collection = sequential(len);

        let mut forward = SelectionState::new();
        forward.apply_click(a, Modifiers::NONE, &collection);
        forward.apply_click(b, Modifiers::SHIFT, &collection);

        let mut backward = SelectionState::new();
        backward.apply_click(b, Modifiers::NONE, &collection);
        backward.apply_click(a, Modifiers::SHIFT, &collection);

        prop_assert_eq!(forward.selected_ids(), backward.selected_ids());
        let (lo, hi) = (a.get().min(b.get()), a.get().max(b.get()));
        let expected = ids(&(lo..=hi).collect::<Vec<_>>());
        prop_assert_eq!(forward.selected_ids(), expected.as_slice());
    }

    #[test]
    fn event_streams_preserve_identity((len, events) in grid_and_events()) {
        let mut grid = CardGrid::new(sequential(len));
        let expected: Vec<CardId> = (1..=len).map(CardId::new).collect();
        for event in &events {
            grid.apply(event, &row);
            prop_assert_eq!(sorted(grid.order()), expected.clone());
        }
    }

    #[test]
    fn repeated_hover_is_idempotent((len, events) in grid_and_events(), slot in 0u64..16, x in 0.0..CARD_W) {
        let mut grid = CardGrid::new(sequential(len));
        for event in &events {
            grid.apply(event, &row);
        }
        if grid.phase() == DragPhase::Idle {
            grid.apply(&GridEvent::DragBegin { id: CardId::new(1) }, &row);
        }
        let slot = slot % len;
        let hover = GridEvent::hover(CardId::new(slot + 1), slot as f64 * CARD_W + x);
        grid.apply(&hover, &row);
        let after_first = grid.clone();
        let t = grid.apply(&hover, &row);
        prop_assert!(t.is_noop());
        prop_assert_eq!(grid.revision(), after_first.revision());
        prop_assert_eq!(grid.drag_session(), after_first.drag_session());
    }

    #[test]
    fn cancel_restores_pre_drag_state(
        (len, events) in grid_and_events(),
        initiator in 1u64..16,
        hovers in prop::collection::vec((1u64..16, 0.0..16.0 * CARD_W), 0..8),
    ) {
        let mut grid = CardGrid::new(sequential(len));
        for event in &events {
            grid.apply(event, &row);
        }
        grid.force_cancel();
        let before = grid.clone();

        grid.apply(&GridEvent::DragBegin { id: CardId::new(initiator % len + 1) }, &row);
        for (id, x) in hovers {
            grid.apply(&GridEvent::hover(CardId::new(id % len + 1), x), &row);
        }
        grid.apply(&GridEvent::DragEnd { committed: false }, &row);

        prop_assert_eq!(grid.collection(), before.collection());
        prop_assert_eq!(grid.selection(), before.selection());
    }
}
