#![forbid(unsafe_code)]

//! Click-driven multi-selection.
//!
//! [`SelectionState`] holds an ordered set of selected ids and the *anchor*
//! (active card): the target of the most recent plain click, used as the
//! fixed end of range selections.
//!
//! # Rules
//!
//! | Click                     | Selected set                                  | Anchor      |
//! |---------------------------|-----------------------------------------------|-------------|
//! | plain                     | `{clicked}`                                   | `clicked`   |
//! | toggle (Ctrl/Cmd)         | remove `clicked` if selected and not anchor, else append | unchanged |
//! | range (Shift), not anchor | every id between anchor and `clicked`, display order | unchanged |
//! | range on the anchor       | same as plain                                 | `clicked`   |
//!
//! Toggle wins when both modifiers are held. Toggling the anchor never
//! deselects it, so a lone selected anchor cannot be toggled off.
//!
//! # Failure Modes
//!
//! - A range click with no anchor, or with an anchor that is no longer in the
//!   collection, collapses to `{clicked}` and adopts `clicked` as the anchor.
//! - Clicks on ids missing from the collection are ignored.

use crate::card::{Card, CardId, Collection};
use crate::event::Modifiers;

/// Selected ids (in selection order) plus the anchor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected: Vec<CardId>,
    active: Option<CardId>,
}

/// What a click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum SelectionEffect {
    /// Plain click: selection replaced, anchor moved.
    Single { id: CardId },
    /// Toggle click appended an id.
    Added { id: CardId },
    /// Toggle click removed an id.
    Removed { id: CardId },
    /// Toggle click on an id that stays selected (it is the anchor, or it was
    /// already selected).
    Kept { id: CardId },
    /// Range click selected the contiguous span between anchor and click.
    Range {
        anchor: CardId,
        clicked: CardId,
        count: usize,
    },
    /// Range click without a usable anchor.
    Collapsed { id: CardId },
    /// The click was not applied.
    Ignored { reason: SelectionIgnoredReason },
}

/// Why a click was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionIgnoredReason {
    /// The clicked id is not in the collection.
    UnknownCard,
    /// A drag gesture owns the selection until it ends.
    DragInProgress,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    #[inline]
    #[must_use]
    pub fn selected_ids(&self) -> &[CardId] {
        &self.selected
    }

    /// The anchor (active card).
    #[inline]
    #[must_use]
    pub const fn active(&self) -> Option<CardId> {
        self.active
    }

    #[must_use]
    pub fn is_selected(&self, id: CardId) -> bool {
        self.selected.contains(&id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected cards materialized from the live collection, in display
    /// order. Ids no longer in the collection are left out.
    #[must_use]
    pub fn selected_cards<'a>(&self, collection: &'a Collection) -> Vec<&'a Card> {
        collection
            .iter()
            .filter(|card| self.is_selected(card.id()))
            .collect()
    }

    /// Selected ids that are still in the collection, in selection order.
    #[must_use]
    pub fn live_ids(&self, collection: &Collection) -> Vec<CardId> {
        self.selected
            .iter()
            .copied()
            .filter(|id| collection.contains(*id))
            .collect()
    }

    /// Apply a click with explicit modifier flags.
    pub fn selection_changed(
        &mut self,
        clicked: CardId,
        toggle: bool,
        range: bool,
        collection: &Collection,
    ) -> SelectionEffect {
        let Some(clicked_index) = collection.index_of(clicked) else {
            return SelectionEffect::Ignored {
                reason: SelectionIgnoredReason::UnknownCard,
            };
        };

        if toggle {
            return self.toggle(clicked);
        }

        if range && self.active != Some(clicked) {
            let anchor_index = self
                .active
                .and_then(|anchor| collection.index_of(anchor).map(|idx| (anchor, idx)));
            return match anchor_index {
                Some((anchor, anchor_index)) => {
                    let lo = anchor_index.min(clicked_index);
                    let hi = anchor_index.max(clicked_index);
                    self.selected = collection.cards()[lo..=hi].iter().map(Card::id).collect();
                    SelectionEffect::Range {
                        anchor,
                        clicked,
                        count: self.selected.len(),
                    }
                }
                None => {
                    self.selected = vec![clicked];
                    self.active = Some(clicked);
                    SelectionEffect::Collapsed { id: clicked }
                }
            };
        }

        self.selected = vec![clicked];
        self.active = Some(clicked);
        SelectionEffect::Single { id: clicked }
    }

    /// Apply a click, reading toggle/range intent from `modifiers`.
    pub fn apply_click(
        &mut self,
        clicked: CardId,
        modifiers: Modifiers,
        collection: &Collection,
    ) -> SelectionEffect {
        self.selection_changed(
            clicked,
            modifiers.is_toggle(),
            modifiers.is_range(),
            collection,
        )
    }

    fn toggle(&mut self, clicked: CardId) -> SelectionEffect {
        if let Some(pos) = self.selected.iter().position(|id| *id == clicked) {
            if self.active != Some(clicked) {
                self.selected.remove(pos);
                return SelectionEffect::Removed { id: clicked };
            }
            return SelectionEffect::Kept { id: clicked };
        }
        self.selected.push(clicked);
        SelectionEffect::Added { id: clicked }
    }

    /// Make the dragged group the selection, anchored on the initiator.
    pub(crate) fn sync_to_drag(&mut self, group: &[CardId], initiator: CardId) {
        self.selected = group.to_vec();
        self.active = Some(initiator);
    }
}
