#![forbid(unsafe_code)]

//! Multi-card reorder commit.
//!
//! Given the pre-drag sequence `C`, the dragged ids `D`, and an insertion
//! index expressed in `C`'s index space, produce the new sequence:
//!
//! 1. `remaining` = `C` minus every card in `D`, survivors in order.
//! 2. Resolve the insertion index into `remaining`'s index space: scan `C`
//!    forward from the index to the first card not in `D`; its position in
//!    `remaining` is the resolved point. No such card means "append".
//! 3. Splice `D`, in `D`'s order, at the resolved point.
//!
//! # Invariants
//!
//! 1. The output is a permutation of the input: no card is created or lost.
//! 2. Cards of `D` appear contiguously and in `D`'s order.
//! 3. Cards not in `D` keep their pairwise relative order.
//!
//! # Failure Modes
//!
//! - An insertion index past the end is clamped to `C.len()`.
//! - Ids in `D` that are not in `C` are skipped; repeated ids in `D` are
//!   placed once, at their first occurrence.

use ahash::{AHashMap, AHashSet};

use crate::card::{Card, CardId};

/// Map an insertion index in `C`'s index space to one valid for `remaining`.
///
/// The forward scan lands on the first non-dragged card at or after
/// `insert_index`; every card it skips is dragged, so its position in
/// `remaining` equals the number of non-dragged cards before `insert_index`.
/// When the scan runs off the end, that same count equals `remaining.len()`.
#[must_use]
pub fn resolve_insert_point(
    ids: &[CardId],
    dragged: &AHashSet<CardId>,
    insert_index: usize,
) -> usize {
    let end = insert_index.min(ids.len());
    ids[..end].iter().filter(|id| !dragged.contains(id)).count()
}

/// Reorder plain ids. See the module docs for the algorithm.
#[must_use]
pub fn reorder_ids(ids: &[CardId], dragged: &[CardId], insert_index: usize) -> Vec<CardId> {
    reorder_by(ids.to_vec(), |id| *id, dragged, insert_index)
}

/// Reorder cards. See the module docs for the algorithm.
#[must_use]
pub fn reorder_cards(cards: Vec<Card>, dragged: &[CardId], insert_index: usize) -> Vec<Card> {
    reorder_by(cards, Card::id, dragged, insert_index)
}

fn reorder_by<T, K>(items: Vec<T>, id_of: K, dragged: &[CardId], insert_index: usize) -> Vec<T>
where
    K: Fn(&T) -> CardId,
{
    let dragged_set: AHashSet<CardId> = dragged.iter().copied().collect();
    let ids: Vec<CardId> = items.iter().map(&id_of).collect();
    let resolved = resolve_insert_point(&ids, &dragged_set, insert_index);

    let mut remaining = Vec::with_capacity(items.len());
    let mut moved: AHashMap<CardId, T> = AHashMap::with_capacity(dragged_set.len());
    for item in items {
        let id = id_of(&item);
        if dragged_set.contains(&id) {
            moved.insert(id, item);
        } else {
            remaining.push(item);
        }
    }

    let group: Vec<T> = dragged.iter().filter_map(|id| moved.remove(id)).collect();
    debug_assert!(resolved <= remaining.len());
    remaining.splice(resolved..resolved, group);
    remaining
}
