#![forbid(unsafe_code)]

//! JSONL gesture traces and deterministic replay.
//!
//! A trace is one JSON object per line:
//!
//! ```text
//! {"event":"trace_header","schema_version":"cardgrid-trace-v1","card_count":5,"layout":{"columns":5,"card_width":80.0,"card_height":45.0,"gap":8.0}}
//! {"event":"click","id":2}
//! {"event":"click","id":4,"modifiers":"CTRL"}
//! {"event":"drag_begin","id":2}
//! {"event":"drag_hover","id":2,"pointer":{"x":100.0,"y":10.0}}
//! {"event":"drag_end","committed":true}
//! {"event":"trace_end","order_checksum":1234567890}
//! ```
//!
//! The header is mandatory and comes first. `trace_end` is optional; when
//! present, replay fails unless the final order hashes to the recorded
//! checksum. Blank lines are skipped.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use cardgrid_core::{
    CardGrid, CardId, Collection, ConfigError, DragPhase, GridConfig, GridEvent, GridTransition,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::layout::FixedGridLayout;

/// Schema tag written into every header.
pub const SCHEMA_VERSION: &str = "cardgrid-trace-v1";

/// Largest `card_count` a trace header may declare.
pub const MAX_TRACE_CARDS: u32 = 1 << 20;

const HEADER_EVENT: &str = "trace_header";
const END_EVENT: &str = "trace_end";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn default_first_id() -> u64 {
    1
}

/// First line of a trace: where the cards start and how they are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub card_count: u32,
    #[serde(default = "default_first_id")]
    pub first_id: u64,
    #[serde(default)]
    pub layout: FixedGridLayout,
}

impl TraceHeader {
    /// Header for `card_count` sequential cards on the default layout.
    #[must_use]
    pub fn new(card_count: u32) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: None,
            card_count,
            first_id: 1,
            layout: FixedGridLayout::default(),
        }
    }

    /// The startup collection this header describes.
    pub fn collection(&self) -> Result<Collection, TraceError> {
        let config = GridConfig {
            card_count: self.card_count,
            first_id: self.first_id,
            ..GridConfig::default()
        };
        Collection::from_config(&config).map_err(TraceError::Config)
    }
}

#[derive(Serialize)]
struct TaggedHeader<'a> {
    event: &'static str,
    #[serde(flatten)]
    header: &'a TraceHeader,
}

#[derive(Serialize, Deserialize)]
struct TraceEnd {
    order_checksum: u64,
}

#[derive(Serialize)]
struct TaggedEnd {
    event: &'static str,
    #[serde(flatten)]
    end: TraceEnd,
}

/// A parsed gesture trace.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureTrace {
    pub header: TraceHeader,
    pub events: Vec<GridEvent>,
    /// Checksum from the `trace_end` record, if any.
    pub expected_checksum: Option<u64>,
}

/// Result of replaying a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayOutcome {
    pub run_id: Option<String>,
    pub event_count: usize,
    pub final_order: Vec<CardId>,
    pub selected: Vec<CardId>,
    pub active: Option<CardId>,
    pub phase: DragPhase,
    pub revision: u64,
    pub order_checksum: u64,
    pub transitions: Vec<GridTransition>,
}

/// Failures while reading, validating, or replaying a trace.
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    Json {
        line: usize,
        source: serde_json::Error,
    },
    MissingHeader,
    MissingEventTag {
        line: usize,
    },
    UnexpectedHeader {
        line: usize,
    },
    RecordAfterEnd {
        line: usize,
    },
    UnsupportedSchemaVersion {
        found: String,
        expected: &'static str,
    },
    InvalidLayout(Vec<String>),
    TooManyCards {
        card_count: u32,
        max: u32,
    },
    Config(ConfigError),
    ChecksumMismatch {
        recorded: u64,
        computed: u64,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json { line, source } => write!(f, "line {line}: invalid record: {source}"),
            Self::MissingHeader => write!(f, "trace must start with a {HEADER_EVENT} record"),
            Self::MissingEventTag { line } => {
                write!(f, "line {line}: record has no \"event\" tag")
            }
            Self::UnexpectedHeader { line } => {
                write!(f, "line {line}: {HEADER_EVENT} may only appear once, first")
            }
            Self::RecordAfterEnd { line } => {
                write!(f, "line {line}: record after {END_EVENT}")
            }
            Self::UnsupportedSchemaVersion { found, expected } => write!(
                f,
                "unsupported trace schema version {found:?} (expected {expected:?})"
            ),
            Self::InvalidLayout(errors) => write!(f, "invalid layout: {}", errors.join("; ")),
            Self::TooManyCards { card_count, max } => {
                write!(f, "card_count {card_count} exceeds the trace limit of {max}")
            }
            Self::Config(e) => write!(f, "invalid collection: {e}"),
            Self::ChecksumMismatch { recorded, computed } => write!(
                f,
                "order checksum mismatch (recorded={recorded:#018x}, computed={computed:#018x})"
            ),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// FNV-1a over the little-endian bytes of each id, in order.
#[must_use]
pub fn order_checksum(ids: &[CardId]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for id in ids {
        for byte in id.get().to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

impl GestureTrace {
    #[must_use]
    pub fn new(header: TraceHeader) -> Self {
        Self {
            header,
            events: Vec::new(),
            expected_checksum: None,
        }
    }

    /// Parse JSONL text.
    pub fn parse(text: &str) -> Result<Self, TraceError> {
        let mut header = None;
        let mut events = Vec::new();
        let mut expected_checksum = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value: Value =
                serde_json::from_str(raw).map_err(|source| TraceError::Json { line, source })?;
            let kind = value
                .get("event")
                .and_then(Value::as_str)
                .ok_or(TraceError::MissingEventTag { line })?
                .to_owned();

            if expected_checksum.is_some() {
                return Err(TraceError::RecordAfterEnd { line });
            }
            match (kind.as_str(), header.is_some()) {
                (HEADER_EVENT, false) => {
                    let parsed: TraceHeader = serde_json::from_value(value)
                        .map_err(|source| TraceError::Json { line, source })?;
                    header = Some(parsed);
                }
                (HEADER_EVENT, true) => return Err(TraceError::UnexpectedHeader { line }),
                (_, false) => return Err(TraceError::MissingHeader),
                (END_EVENT, true) => {
                    let end: TraceEnd = serde_json::from_value(value)
                        .map_err(|source| TraceError::Json { line, source })?;
                    expected_checksum = Some(end.order_checksum);
                }
                (_, true) => {
                    let event: GridEvent = serde_json::from_value(value)
                        .map_err(|source| TraceError::Json { line, source })?;
                    events.push(event);
                }
            }
        }

        let header = header.ok_or(TraceError::MissingHeader)?;
        let trace = Self {
            header,
            events,
            expected_checksum,
        };
        trace.validate()?;
        Ok(trace)
    }

    /// Check the header before replay.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.header.schema_version != SCHEMA_VERSION {
            return Err(TraceError::UnsupportedSchemaVersion {
                found: self.header.schema_version.clone(),
                expected: SCHEMA_VERSION,
            });
        }
        if self.header.card_count > MAX_TRACE_CARDS {
            return Err(TraceError::TooManyCards {
                card_count: self.header.card_count,
                max: MAX_TRACE_CARDS,
            });
        }
        let errors = self.header.layout.validate();
        if !errors.is_empty() {
            return Err(TraceError::InvalidLayout(errors));
        }
        Ok(())
    }

    /// Drive every event through a fresh engine.
    pub fn replay(&self) -> Result<ReplayOutcome, TraceError> {
        self.validate()?;
        let span = info_span!(
            "cardgrid.replay",
            run_id = self.header.run_id.as_deref().unwrap_or(""),
            events = self.events.len()
        );
        let _guard = span.enter();

        let layout = self.header.layout;
        let mut grid = CardGrid::new(self.header.collection()?);
        let mut transitions = Vec::with_capacity(self.events.len());
        for event in &self.events {
            let transition = grid.apply(event, &layout);
            debug!(
                transition_id = transition.transition_id,
                kind = event.kind_name(),
                noop = transition.is_noop(),
                "replayed event"
            );
            transitions.push(transition);
        }

        let final_order = grid.order();
        let computed = order_checksum(&final_order);
        if let Some(recorded) = self.expected_checksum
            && recorded != computed
        {
            return Err(TraceError::ChecksumMismatch { recorded, computed });
        }
        info!(
            revision = grid.revision(),
            checksum = computed,
            "replay finished"
        );

        Ok(ReplayOutcome {
            run_id: self.header.run_id.clone(),
            event_count: self.events.len(),
            selected: grid.selection().selected_ids().to_vec(),
            active: grid.selection().active(),
            phase: grid.phase(),
            revision: grid.revision(),
            order_checksum: computed,
            final_order,
            transitions,
        })
    }

    /// Write the trace as JSONL, header first.
    ///
    /// JSON has no NaN or infinity, so a hover with a non-finite pointer
    /// fails with [`io::ErrorKind::InvalidInput`] before anything is written.
    pub fn write_jsonl<W: Write>(&self, mut out: W) -> io::Result<()> {
        if let Some(idx) = self.events.iter().position(|event| {
            matches!(event, GridEvent::DragHover { pointer, .. }
                if !(pointer.x.is_finite() && pointer.y.is_finite()))
        }) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("event {idx}: drag_hover pointer is not finite"),
            ));
        }
        let header = TaggedHeader {
            event: HEADER_EVENT,
            header: &self.header,
        };
        serde_json::to_writer(&mut out, &header).map_err(io::Error::other)?;
        out.write_all(b"\n")?;
        for event in &self.events {
            serde_json::to_writer(&mut out, event).map_err(io::Error::other)?;
            out.write_all(b"\n")?;
        }
        if let Some(order_checksum) = self.expected_checksum {
            let end = TaggedEnd {
                event: END_EVENT,
                end: TraceEnd { order_checksum },
            };
            serde_json::to_writer(&mut out, &end).map_err(io::Error::other)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Render as a JSONL string.
    pub fn to_jsonl(&self) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_jsonl(&mut buf)?;
        String::from_utf8(buf).map_err(io::Error::other)
    }
}

/// Read and replay the trace at `path`.
pub fn replay_trace(path: impl AsRef<Path>) -> Result<ReplayOutcome, TraceError> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(TraceError::Io)?;
    GestureTrace::parse(&text)?.replay()
}
