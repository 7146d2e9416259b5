#![forbid(unsafe_code)]

//! Deterministic grid geometry for replay.
//!
//! Real renderers measure cards on screen. Replays need the same answers on
//! every run, so [`FixedGridLayout`] computes bounds from the slot alone:
//! cards flow left to right, `columns` per row, separated by `gap`.

use cardgrid_core::{Bounds, BoundsProvider, CardId};
use serde::{Deserialize, Serialize};

/// Row-major grid of equally sized cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedGridLayout {
    pub columns: u32,
    pub card_width: f64,
    pub card_height: f64,
    #[serde(default)]
    pub gap: f64,
}

impl Default for FixedGridLayout {
    /// 80x45 thumbnails, ten to a row, 8px apart.
    fn default() -> Self {
        Self {
            columns: 10,
            card_width: 80.0,
            card_height: 45.0,
            gap: 8.0,
        }
    }
}

impl FixedGridLayout {
    /// Bounds of the card rendered at `slot`.
    ///
    /// Zero columns is treated as one.
    #[must_use]
    pub fn slot_bounds(&self, slot: usize) -> Bounds {
        let columns = self.columns.max(1) as usize;
        let (col, row) = (slot % columns, slot / columns);
        Bounds::from_origin_size(
            col as f64 * (self.card_width + self.gap),
            row as f64 * (self.card_height + self.gap),
            self.card_width,
            self.card_height,
        )
    }

    /// Pointer x a quarter of the way into `slot` (lands on the "before"
    /// half).
    #[must_use]
    pub fn before_x(&self, slot: usize) -> f64 {
        let b = self.slot_bounds(slot);
        b.left + b.width() / 4.0
    }

    /// Pointer x three quarters of the way into `slot` (lands on the "after"
    /// half).
    #[must_use]
    pub fn after_x(&self, slot: usize) -> f64 {
        let b = self.slot_bounds(slot);
        b.left + b.width() * 3.0 / 4.0
    }

    /// Validate geometry parameters; an empty list means usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.columns == 0 {
            errors.push("columns must be > 0".into());
        }
        if !(self.card_width.is_finite() && self.card_width > 0.0) {
            errors.push(format!("card_width must be positive, got {}", self.card_width));
        }
        if !(self.card_height.is_finite() && self.card_height > 0.0) {
            errors.push(format!(
                "card_height must be positive, got {}",
                self.card_height
            ));
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            errors.push(format!("gap must be non-negative, got {}", self.gap));
        }
        errors
    }
}

impl BoundsProvider for FixedGridLayout {
    fn card_bounds(&self, slot: usize, _id: CardId) -> Option<Bounds> {
        Some(self.slot_bounds(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_flow_row_major() {
        let layout = FixedGridLayout::default();
        assert_eq!(layout.slot_bounds(0), Bounds::new(0.0, 0.0, 80.0, 45.0));
        assert_eq!(layout.slot_bounds(1), Bounds::new(88.0, 0.0, 168.0, 45.0));
        assert_eq!(layout.slot_bounds(10), Bounds::new(0.0, 53.0, 80.0, 98.0));
    }

    #[test]
    fn quarter_points_straddle_midline() {
        let layout = FixedGridLayout::default();
        for slot in [0, 7, 23] {
            let mid = layout.slot_bounds(slot).mid_x();
            assert!(layout.before_x(slot) < mid);
            assert!(layout.after_x(slot) > mid);
        }
    }

    #[test]
    fn zero_columns_is_invalid_but_safe() {
        let layout = FixedGridLayout {
            columns: 0,
            ..FixedGridLayout::default()
        };
        assert_eq!(layout.validate().len(), 1);
        assert_eq!(layout.slot_bounds(3).top, 3.0 * 53.0);
    }

    #[test]
    fn bad_dimensions_are_reported() {
        let layout = FixedGridLayout {
            columns: 4,
            card_width: 0.0,
            card_height: f64::NAN,
            gap: -1.0,
        };
        assert_eq!(layout.validate().len(), 3);
    }
}
