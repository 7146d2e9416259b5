#![forbid(unsafe_code)]

//! Canonical grid events.
//!
//! A gesture source (pointer/drag plumbing) and a click source translate raw
//! input into [`GridEvent`] values. The engine never sees raw pointer or key
//! events; it only sees which card was clicked or hovered, where the pointer
//! was, and which modifiers were held.
//!
//! # Design Notes
//!
//! - Toggle selection is bound to Ctrl *or* Super (Cmd on macOS), range
//!   selection to Shift. When both are held, toggle wins.
//! - Pointer positions are client coordinates, the same space the
//!   [`BoundsProvider`](crate::drag::BoundsProvider) reports card bounds in.

use bitflags::bitflags;

use crate::card::CardId;
use crate::geometry::Point;

bitflags! {
    /// Modifier keys held during a click.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Whether the toggle (additive/subtractive) selection modifier is held.
    #[must_use]
    pub const fn is_toggle(self) -> bool {
        self.intersects(Self::CTRL.union(Self::SUPER))
    }

    /// Whether the range selection modifier is held.
    #[must_use]
    pub const fn is_range(self) -> bool {
        self.contains(Self::SHIFT)
    }
}

/// Canonical engine event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum GridEvent {
    /// A card was clicked.
    Click {
        /// The clicked card.
        id: CardId,
        /// Modifier keys held during the click.
        #[cfg_attr(feature = "serde", serde(default))]
        modifiers: Modifiers,
    },

    /// A drag gesture started on a card.
    DragBegin {
        /// The card under the pointer when the gesture started.
        id: CardId,
    },

    /// The pointer moved over a card during a drag.
    DragHover {
        /// The card under the pointer.
        id: CardId,
        /// Pointer position in client coordinates.
        pointer: Point,
    },

    /// The drag gesture finished.
    ///
    /// `committed = false` means the gesture was aborted (no drop target,
    /// Escape, focus loss).
    DragEnd {
        /// Whether the drop should be applied.
        committed: bool,
    },
}

impl GridEvent {
    /// Plain click (no modifiers).
    #[must_use]
    pub const fn click(id: CardId) -> Self {
        Self::Click {
            id,
            modifiers: Modifiers::NONE,
        }
    }

    /// Click with the given modifiers.
    #[must_use]
    pub const fn click_with(id: CardId, modifiers: Modifiers) -> Self {
        Self::Click { id, modifiers }
    }

    /// Hover at a pointer x coordinate (y is irrelevant to insertion).
    #[must_use]
    pub const fn hover(id: CardId, x: f64) -> Self {
        Self::DragHover {
            id,
            pointer: Point::new(x, 0.0),
        }
    }

    /// Short name for logs and diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::DragBegin { .. } => "drag_begin",
            Self::DragHover { .. } => "drag_hover",
            Self::DragEnd { .. } => "drag_end",
        }
    }
}
