#![forbid(unsafe_code)]

//! Core: card collection, selection, and drag-reorder state machines.
//!
//! # Role in cardgrid
//! `cardgrid-core` is the engine behind a reorderable grid of cards (a
//! photo/tile organizer). It owns no rendering and no input plumbing: a
//! renderer reads its state, and a gesture source feeds it [`GridEvent`]s.
//!
//! # Primary responsibilities
//! - **Collection**: ordered cards with stable, unique ids.
//! - **Selection**: click/toggle/range selection with an anchor card.
//! - **Drag**: the `Idle -> Dragging -> Idle` gesture machine, hover
//!   deduplication, and the before/after insertion resolver.
//! - **Reorder**: the multi-card splice that keeps both the dragged group and
//!   the untouched remainder in their relative order.
//!
//! # How it fits together
//! [`CardGrid`] aggregates the collection, selection, and drag machine and
//! routes each [`GridEvent`] to the right component. Every transition runs to
//! completion synchronously; the only thing read from the outside world is
//! card geometry, through the [`BoundsProvider`] capability at drag start.
//!
//! [`CardGrid`]: grid::CardGrid
//! [`GridEvent`]: event::GridEvent
//! [`BoundsProvider`]: drag::BoundsProvider

pub mod card;
pub mod config;
pub mod drag;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod insertion;
pub mod logging;
pub mod reorder;
pub mod selection;

pub use card::{Card, CardId, CardView, Collection, CollectionError};
pub use config::{ConfigError, GridConfig};
pub use drag::{
    BoundsProvider, DragEffect, DragMachine, DragNoopReason, DragPhase, DragSession, HoverKey,
};
pub use event::{GridEvent, Modifiers};
pub use geometry::{Bounds, Point};
pub use grid::{CardGrid, GridEffect, GridTransition, reduce};
pub use insertion::{InsertSide, InsertionCandidate};
pub use selection::{SelectionEffect, SelectionIgnoredReason, SelectionState};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
