#![forbid(unsafe_code)]

//! Before/after insertion resolution for a hovered card.

use crate::geometry::Bounds;

/// Which side of the hovered card the dragged group lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InsertSide {
    Before,
    After,
}

/// Result of resolving a hover against captured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionCandidate {
    /// Index of the hovered card in the pre-drag collection.
    pub hovered_index: usize,
    pub side: InsertSide,
    /// Candidate insertion index in the pre-drag collection's index space.
    pub insert_index: usize,
}

impl InsertSide {
    /// Left of the midpoint inserts before; the midpoint itself and anything
    /// right of it inserts after.
    #[must_use]
    pub fn resolve(bounds: Bounds, pointer_x: f64) -> Self {
        if pointer_x < bounds.mid_x() {
            Self::Before
        } else {
            Self::After
        }
    }
}

impl InsertionCandidate {
    #[must_use]
    pub fn resolve(bounds: Bounds, hovered_index: usize, pointer_x: f64) -> Self {
        let side = InsertSide::resolve(bounds, pointer_x);
        let insert_index = match side {
            InsertSide::Before => hovered_index,
            InsertSide::After => hovered_index + 1,
        };
        Self {
            hovered_index,
            side,
            insert_index,
        }
    }
}
