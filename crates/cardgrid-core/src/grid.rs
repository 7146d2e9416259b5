#![forbid(unsafe_code)]

//! Grid aggregate: collection, selection, and drag machine behind one event
//! entry point.
//!
//! [`CardGrid::apply`] routes a [`GridEvent`] to the component that owns it
//! and returns a [`GridTransition`] record. Each call runs to completion
//! before the next, so events are totally ordered.
//!
//! # Invariants
//!
//! 1. `transition_id` increases by one on every applied event, accepted or
//!    not.
//! 2. `revision` increases only when the collection order, the selection, or
//!    the drag state visibly changed.
//! 3. Clicks are ignored while a drag is in progress; the drag owns the
//!    selection until it ends.

use crate::card::{Card, CardId, Collection};
use crate::drag::{BoundsProvider, DragEffect, DragMachine, DragPhase, DragSession};
use crate::event::GridEvent;
use crate::geometry::Bounds;
use crate::selection::{SelectionEffect, SelectionIgnoredReason, SelectionState};

/// What one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "detail", rename_all = "snake_case"))]
pub enum GridEffect {
    Selection(SelectionEffect),
    Drag(DragEffect),
}

/// Record of one applied event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTransition {
    pub transition_id: u64,
    /// Revision after the event.
    pub revision: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: GridEffect,
}

impl GridTransition {
    /// Whether the event was dropped without touching state.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(
            self.effect,
            GridEffect::Selection(SelectionEffect::Ignored { .. })
                | GridEffect::Drag(DragEffect::Noop { .. } | DragEffect::HoverUnchanged { .. })
        )
    }
}

/// The whole engine state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardGrid {
    collection: Collection,
    selection: SelectionState,
    drag: DragMachine,
    revision: u64,
    next_transition_id: u64,
}

impl CardGrid {
    /// Engine over `collection` with nothing selected and no drag.
    #[must_use]
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selected cards in display order.
    #[must_use]
    pub fn selected_cards(&self) -> Vec<&Card> {
        self.selection.selected_cards(&self.collection)
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.drag.phase()
    }

    #[inline]
    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// Observable change counter.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Ids in display order.
    #[must_use]
    pub fn order(&self) -> Vec<CardId> {
        self.collection.ids()
    }

    /// Apply one event.
    ///
    /// Clicks that arrive while a drag is in progress are ignored with
    /// [`SelectionIgnoredReason::DragInProgress`], so a cancel can restore
    /// the pre-drag selection exactly.
    pub fn apply<P: BoundsProvider + ?Sized>(
        &mut self,
        event: &GridEvent,
        layout: &P,
    ) -> GridTransition {
        let from = self.drag.phase();
        let (effect, changed) = match *event {
            GridEvent::Click { id, modifiers } => {
                if self.drag.is_dragging() {
                    let effect = SelectionEffect::Ignored {
                        reason: SelectionIgnoredReason::DragInProgress,
                    };
                    (GridEffect::Selection(effect), false)
                } else {
                    let before = self.selection.clone();
                    let effect = self
                        .selection
                        .apply_click(id, modifiers, &self.collection);
                    (GridEffect::Selection(effect), self.selection != before)
                }
            }
            GridEvent::DragBegin { id } => {
                let effect =
                    self.drag
                        .begin(id, &mut self.collection, &mut self.selection, layout);
                (GridEffect::Drag(effect), effect.is_observable())
            }
            GridEvent::DragHover { id, pointer } => {
                let effect = self.drag.hover(id, pointer.x, &self.collection);
                (GridEffect::Drag(effect), effect.is_observable())
            }
            GridEvent::DragEnd { committed } => {
                let effect = self
                    .drag
                    .end(committed, &mut self.collection, &mut self.selection);
                (GridEffect::Drag(effect), effect.is_observable())
            }
        };

        if changed {
            self.revision = self.revision.saturating_add(1);
        }
        let transition_id = self.next_transition_id;
        self.next_transition_id = self.next_transition_id.saturating_add(1);
        GridTransition {
            transition_id,
            revision: self.revision,
            from,
            to: self.drag.phase(),
            effect,
        }
    }

    /// Cancel any running drag, for focus loss or teardown.
    pub fn force_cancel(&mut self) -> Option<GridTransition> {
        self.drag
            .is_dragging()
            .then(|| self.apply(&GridEvent::DragEnd { committed: false }, &no_layout))
    }
}

fn no_layout(_slot: usize, _id: CardId) -> Option<Bounds> {
    None
}

/// Pure form of [`CardGrid::apply`].
#[must_use]
pub fn reduce<P: BoundsProvider + ?Sized>(
    mut state: CardGrid,
    event: &GridEvent,
    layout: &P,
) -> CardGrid {
    state.apply(event, layout);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragNoopReason;
    use crate::event::Modifiers;

    fn id(raw: u64) -> CardId {
        CardId::new(raw)
    }

    fn order(grid: &CardGrid) -> Vec<u64> {
        grid.order().into_iter().map(CardId::get).collect()
    }

    fn selected(grid: &CardGrid) -> Vec<u64> {
        grid.selection()
            .selected_ids()
            .iter()
            .map(|id| id.get())
            .collect()
    }

    fn row(slot: usize, _id: CardId) -> Option<Bounds> {
        Some(Bounds::from_origin_size(slot as f64 * 80.0, 0.0, 80.0, 45.0))
    }

    fn grid(len: u32) -> CardGrid {
        CardGrid::new(Collection::with_sequential_ids(len))
    }

    #[test]
    fn transition_ids_are_sequential() {
        let mut g = grid(3);
        let a = g.apply(&GridEvent::click(id(1)), &row);
        let b = g.apply(&GridEvent::click(id(99)), &row);
        let c = g.apply(&GridEvent::DragEnd { committed: true }, &row);
        assert_eq!(
            [a.transition_id, b.transition_id, c.transition_id],
            [0, 1, 2]
        );
    }

    #[test]
    fn revision_counts_observable_changes_only() {
        let mut g = grid(5);
        g.apply(&GridEvent::click(id(2)), &row);
        assert_eq!(g.revision(), 1);
        // Same click again: nothing changes.
        g.apply(&GridEvent::click(id(2)), &row);
        assert_eq!(g.revision(), 1);
        // Unknown id.
        g.apply(&GridEvent::click(id(42)), &row);
        assert_eq!(g.revision(), 1);

        g.apply(&GridEvent::DragBegin { id: id(2) }, &row);
        assert_eq!(g.revision(), 2);
        g.apply(&GridEvent::hover(id(4), 250.0), &row);
        assert_eq!(g.revision(), 3);
        let repeat = g.apply(&GridEvent::hover(id(4), 255.0), &row);
        assert!(repeat.is_noop());
        assert_eq!(g.revision(), 3);
    }

    #[test]
    fn phases_are_reported() {
        let mut g = grid(3);
        let t = g.apply(&GridEvent::DragBegin { id: id(1) }, &row);
        assert_eq!((t.from, t.to), (DragPhase::Idle, DragPhase::Dragging));
        let t = g.apply(&GridEvent::hover(id(3), 230.0), &row);
        assert_eq!((t.from, t.to), (DragPhase::Dragging, DragPhase::Dragging));
        let t = g.apply(&GridEvent::DragEnd { committed: true }, &row);
        assert_eq!((t.from, t.to), (DragPhase::Dragging, DragPhase::Idle));
    }

    #[test]
    fn clicks_are_ignored_while_dragging() {
        let mut g = grid(4);
        g.apply(&GridEvent::DragBegin { id: id(1) }, &row);
        let t = g.apply(&GridEvent::click_with(id(3), Modifiers::CTRL), &row);
        assert_eq!(
            t.effect,
            GridEffect::Selection(SelectionEffect::Ignored {
                reason: SelectionIgnoredReason::DragInProgress
            })
        );
        assert_eq!(selected(&g), vec![1]);
        assert!(t.is_noop());
        assert_eq!(g.revision(), 1);

        g.apply(&GridEvent::DragEnd { committed: false }, &row);
        assert!(selected(&g).is_empty());
    }

    #[test]
    fn non_finite_hover_does_not_bump_revision() {
        let mut g = grid(3);
        g.apply(&GridEvent::DragBegin { id: id(1) }, &row);
        let t = g.apply(&GridEvent::hover(id(3), f64::NAN), &row);
        assert_eq!(
            t.effect,
            GridEffect::Drag(DragEffect::Noop {
                reason: DragNoopReason::NonFinitePointer
            })
        );
        assert!(t.is_noop());
        assert_eq!(g.revision(), 1);
        assert_eq!(g.drag_session().and_then(DragSession::insert_index), None);
    }

    #[test]
    fn multi_drag_scenario() {
        let mut g = grid(5);
        g.apply(&GridEvent::click(id(2)), &row);
        g.apply(&GridEvent::click_with(id(4), Modifiers::SUPER), &row);
        g.apply(&GridEvent::DragBegin { id: id(2) }, &row);
        // Left half of slot 1 (card 2 itself): insertion index 1.
        g.apply(&GridEvent::hover(id(2), 90.0), &row);
        let t = g.apply(&GridEvent::DragEnd { committed: true }, &row);
        assert_eq!(
            t.effect,
            GridEffect::Drag(DragEffect::Committed {
                insert_index: Some(1),
                group_len: 2
            })
        );
        assert_eq!(order(&g), vec![1, 2, 4, 3, 5]);
        assert_eq!(selected(&g), vec![2, 4]);
        assert_eq!(g.selection().active(), Some(id(2)));
        let selected_order: Vec<u64> = g.selected_cards().iter().map(|c| c.id().get()).collect();
        assert_eq!(selected_order, vec![2, 4]);
    }

    #[test]
    fn cancel_restores_everything() {
        let mut g = grid(5);
        g.apply(&GridEvent::click(id(5)), &row);
        g.apply(&GridEvent::click_with(id(1), Modifiers::SHIFT), &row);
        let before = g.clone();

        g.apply(&GridEvent::DragBegin { id: id(3) }, &row);
        g.apply(&GridEvent::hover(id(1), 5.0), &row);
        g.apply(&GridEvent::DragEnd { committed: false }, &row);

        assert_eq!(g.collection(), before.collection());
        assert_eq!(g.selection(), before.selection());
        assert_eq!(g.phase(), DragPhase::Idle);
    }

    #[test]
    fn double_begin_reports_noop() {
        let mut g = grid(3);
        g.apply(&GridEvent::DragBegin { id: id(1) }, &row);
        let t = g.apply(&GridEvent::DragBegin { id: id(2) }, &row);
        assert_eq!(
            t.effect,
            GridEffect::Drag(DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress
            })
        );
        assert!(t.is_noop());
    }

    #[test]
    fn force_cancel_only_when_dragging() {
        let mut g = grid(3);
        assert!(g.force_cancel().is_none());
        g.apply(&GridEvent::DragBegin { id: id(2) }, &row);
        let t = g.force_cancel().unwrap();
        assert_eq!(t.effect, GridEffect::Drag(DragEffect::Canceled));
        assert_eq!(g.phase(), DragPhase::Idle);
    }

    #[test]
    fn reduce_matches_apply() {
        let events = [
            GridEvent::click(id(3)),
            GridEvent::DragBegin { id: id(3) },
            GridEvent::hover(id(1), 10.0),
            GridEvent::DragEnd { committed: true },
        ];
        let mut applied = grid(4);
        let mut reduced = grid(4);
        for event in &events {
            applied.apply(event, &row);
            reduced = reduce(reduced, event, &row);
        }
        assert_eq!(applied, reduced);
        assert_eq!(order(&reduced), vec![3, 1, 2, 4]);
    }
}
