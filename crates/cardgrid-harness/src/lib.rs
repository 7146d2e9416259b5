#![forbid(unsafe_code)]

//! Replay harness for cardgrid.
//!
//! Gesture traces recorded as JSONL are replayed through
//! [`cardgrid_core::CardGrid`] against a [`FixedGridLayout`], so a run can be
//! reproduced exactly and compared by checksum.

pub mod layout;
pub mod trace;

pub use layout::FixedGridLayout;
pub use trace::{
    GestureTrace, MAX_TRACE_CARDS, ReplayOutcome, SCHEMA_VERSION, TraceError, TraceHeader,
    order_checksum, replay_trace,
};
