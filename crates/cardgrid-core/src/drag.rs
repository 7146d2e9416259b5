#![forbid(unsafe_code)]

//! Drag gesture lifecycle: begin, hover, commit or cancel.
//!
//! [`DragMachine`] is a deterministic two-state machine:
//!
//! ```text
//! Idle -> Dragging -> Idle
//!            \  (hover: update insertion index, deduplicated)
//!             \-> commit (reorder) | cancel (restore)
//! ```
//!
//! # Invariants
//!
//! 1. At most one [`DragSession`] is live. A second begin while dragging is
//!    rejected and the running gesture continues.
//! 2. The dragged group is snapshotted at begin and never changes during the
//!    gesture.
//! 3. A hover whose `(dragged, hovered, insert_index)` key equals the last
//!    accepted one changes nothing.
//! 4. Cancel restores the collection and the selection exactly as they were
//!    before begin. Captured bounds are cleared on every exit from
//!    `Dragging`.
//!
//! # Failure Modes
//!
//! - Hovering an id that is not in the collection, or one whose bounds could
//!   not be captured, is a no-op (stale or late pointer event).
//! - A hover with a NaN or infinite pointer x is a no-op.
//! - Hover or end while idle is a no-op.
//! - Committing before any hover was accepted leaves the order unchanged.

use crate::card::{CardId, Collection};
use crate::geometry::Bounds;
use crate::insertion::{InsertSide, InsertionCandidate};
use crate::reorder::reorder_cards;
use crate::selection::SelectionState;

// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::{debug, trace, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace, warn};

/// Layout query for rendered cards.
///
/// Called once per card, in display order, when a drag begins. `slot` is the
/// card's position in the rendered grid. Returning `None` means the card has
/// no on-screen geometry (not rendered); hovers over it are ignored.
pub trait BoundsProvider {
    fn card_bounds(&self, slot: usize, id: CardId) -> Option<Bounds>;
}

impl<F> BoundsProvider for F
where
    F: Fn(usize, CardId) -> Option<Bounds>,
{
    fn card_bounds(&self, slot: usize, id: CardId) -> Option<Bounds> {
        self(slot, id)
    }
}

/// Coarse lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// Identity of an accepted hover, used to drop redundant pointer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoverKey {
    pub dragged: CardId,
    pub hovered: CardId,
    pub insert_index: usize,
}

/// Live state of one drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    initiator: CardId,
    dragged_ids: Vec<CardId>,
    drag_stack: Vec<CardId>,
    hovered_id: CardId,
    hovered_index: Option<usize>,
    insert_index: Option<usize>,
    last_hover: Option<HoverKey>,
    selection_before: SelectionState,
}

impl DragSession {
    /// The card the gesture started on.
    #[inline]
    #[must_use]
    pub const fn initiator(&self) -> CardId {
        self.initiator
    }

    /// The group being moved, in the order it will be placed.
    #[inline]
    #[must_use]
    pub fn dragged_ids(&self) -> &[CardId] {
        &self.dragged_ids
    }

    /// Preview order: initiator first, then the rest of the group.
    #[inline]
    #[must_use]
    pub fn drag_stack(&self) -> &[CardId] {
        &self.drag_stack
    }

    #[inline]
    #[must_use]
    pub const fn hovered_id(&self) -> CardId {
        self.hovered_id
    }

    /// Position of the hovered card in the pre-drag collection.
    #[inline]
    #[must_use]
    pub const fn hovered_index(&self) -> Option<usize> {
        self.hovered_index
    }

    /// Candidate insertion index in the pre-drag collection's index space.
    #[inline]
    #[must_use]
    pub const fn insert_index(&self) -> Option<usize> {
        self.insert_index
    }

    #[inline]
    #[must_use]
    pub const fn last_hover(&self) -> Option<HoverKey> {
        self.last_hover
    }
}

/// Explicit diagnostics for events that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    UnknownCard,
    MissingBounds,
    NonFinitePointer,
}

/// Effect of one drag lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum DragEffect {
    Started {
        initiator: CardId,
        group_len: usize,
    },
    HoverUpdated {
        hovered: CardId,
        hovered_index: usize,
        side: InsertSide,
        insert_index: usize,
    },
    HoverUnchanged {
        hovered: CardId,
        insert_index: usize,
    },
    Committed {
        insert_index: Option<usize>,
        group_len: usize,
    },
    Canceled,
    Noop {
        reason: DragNoopReason,
    },
}

impl DragEffect {
    /// Whether the step changed anything a renderer can observe.
    #[must_use]
    pub const fn is_observable(&self) -> bool {
        !matches!(self, Self::HoverUnchanged { .. } | Self::Noop { .. })
    }
}

/// Runtime lifecycle machine for card drag gestures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragMachine {
    session: Option<DragSession>,
}

impl DragMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The live session, if dragging.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Start a gesture on `initiator`.
    ///
    /// The group is the current selection when the initiator is part of it,
    /// otherwise the initiator alone. Geometry for every card is read from
    /// `layout`, and the selection is switched to the group anchored on the
    /// initiator; the previous selection is kept for cancellation.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn begin<P: BoundsProvider + ?Sized>(
        &mut self,
        initiator: CardId,
        collection: &mut Collection,
        selection: &mut SelectionState,
        layout: &P,
    ) -> DragEffect {
        if let Some(session) = &self.session {
            warn!(
                initiator = initiator.get(),
                active = session.initiator.get(),
                "drag begin while a drag is in progress; ignored"
            );
            return DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            };
        }
        if !collection.contains(initiator) {
            return DragEffect::Noop {
                reason: DragNoopReason::UnknownCard,
            };
        }

        let dragged_ids = if selection.is_selected(initiator) {
            selection.live_ids(collection)
        } else {
            vec![initiator]
        };
        let mut drag_stack = Vec::with_capacity(dragged_ids.len());
        drag_stack.push(initiator);
        drag_stack.extend(dragged_ids.iter().copied().filter(|id| *id != initiator));

        collection.capture_bounds(layout);

        let selection_before = selection.clone();
        selection.sync_to_drag(&dragged_ids, initiator);

        let group_len = dragged_ids.len();
        debug!(initiator = initiator.get(), group_len, "drag started");
        self.session = Some(DragSession {
            initiator,
            dragged_ids,
            drag_stack,
            hovered_id: initiator,
            hovered_index: None,
            insert_index: None,
            last_hover: None,
            selection_before,
        });
        DragEffect::Started {
            initiator,
            group_len,
        }
    }

    /// Track the pointer over `hovered` at client x `pointer_x`.
    pub fn hover(&mut self, hovered: CardId, pointer_x: f64, collection: &Collection) -> DragEffect {
        let Some(session) = self.session.as_mut() else {
            return DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            };
        };
        if !pointer_x.is_finite() {
            return DragEffect::Noop {
                reason: DragNoopReason::NonFinitePointer,
            };
        }
        let Some(hovered_index) = collection.index_of(hovered) else {
            return DragEffect::Noop {
                reason: DragNoopReason::UnknownCard,
            };
        };
        let Some(bounds) = collection.cards()[hovered_index].bounds() else {
            return DragEffect::Noop {
                reason: DragNoopReason::MissingBounds,
            };
        };

        let candidate = InsertionCandidate::resolve(bounds, hovered_index, pointer_x);
        let key = HoverKey {
            dragged: session.initiator,
            hovered,
            insert_index: candidate.insert_index,
        };
        if session.last_hover == Some(key) {
            trace!(
                hovered = hovered.get(),
                insert_index = candidate.insert_index,
                "hover unchanged"
            );
            return DragEffect::HoverUnchanged {
                hovered,
                insert_index: candidate.insert_index,
            };
        }

        session.hovered_id = hovered;
        session.hovered_index = Some(hovered_index);
        session.insert_index = Some(candidate.insert_index);
        session.last_hover = Some(key);
        debug!(
            hovered = hovered.get(),
            hovered_index,
            insert_index = candidate.insert_index,
            "hover updated"
        );
        DragEffect::HoverUpdated {
            hovered,
            hovered_index,
            side: candidate.side,
            insert_index: candidate.insert_index,
        }
    }

    /// Finish the gesture: reorder when `committed`, restore otherwise.
    pub fn end(
        &mut self,
        committed: bool,
        collection: &mut Collection,
        selection: &mut SelectionState,
    ) -> DragEffect {
        let Some(session) = self.session.take() else {
            return DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            };
        };
        collection.clear_bounds();

        if !committed {
            *selection = session.selection_before;
            debug!(initiator = session.initiator.get(), "drag canceled");
            return DragEffect::Canceled;
        }

        let group_len = session.dragged_ids.len();
        if let Some(insert_index) = session.insert_index {
            let cards = collection.cards().to_vec();
            collection.replace_cards(reorder_cards(cards, &session.dragged_ids, insert_index));
        }
        debug!(
            initiator = session.initiator.get(),
            insert_index = ?session.insert_index,
            group_len,
            "drag committed"
        );
        DragEffect::Committed {
            insert_index: session.insert_index,
            group_len,
        }
    }

    /// Unconditionally cancel, for focus loss or teardown paths.
    ///
    /// Returns `None` when already idle.
    pub fn force_cancel(
        &mut self,
        collection: &mut Collection,
        selection: &mut SelectionState,
    ) -> Option<DragEffect> {
        self.is_dragging()
            .then(|| self.end(false, collection, selection))
    }
}
