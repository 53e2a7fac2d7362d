//! Results panel state: one row per catalog class.
//!
//! Pure state, separated from terminal rendering; the renderer just reads
//! the rows.

use std::collections::HashMap;

use crate::api::ClassStats;
use crate::catalog::ClassCatalog;

/// Display state for a single class row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRow {
    /// Class name, as listed in the catalog.
    pub name: String,
    /// Rounded average confidence, 0-100. Doubles as the bar fill.
    pub percent: u8,
    /// Whether the class appeared in the latest cycle's stats.
    pub detected: bool,
}

/// Per-class rows, kept in lockstep with the catalog order.
///
/// Rows are created once from the catalog and never added or removed; only
/// their values change. Row `i` always corresponds to catalog entry `i`.
#[derive(Debug, Clone)]
pub struct ResultsPanel {
    rows: Vec<ClassRow>,
}

impl ResultsPanel {
    /// Build the panel from the catalog, every row in the not-detected
    /// state.
    pub fn new(catalog: &ClassCatalog) -> Self {
        let rows = catalog
            .names()
            .iter()
            .map(|name| ClassRow {
                name: name.clone(),
                percent: 0,
                detected: false,
            })
            .collect();
        Self { rows }
    }

    /// Rows in catalog order.
    pub fn rows(&self) -> &[ClassRow] {
        &self.rows
    }

    /// Overwrite every row from one cycle's stats.
    ///
    /// A class present in the stats gets the rounded average confidence and
    /// the detected flag; an absent class resets hard to 0% / not-detected.
    /// No smoothing across cycles.
    pub fn apply_stats(&mut self, stats: &HashMap<String, ClassStats>) {
        for row in &mut self.rows {
            match stats.get(&row.name) {
                Some(class_stats) => {
                    row.percent = class_stats.avg_confidence.round().clamp(0.0, 100.0) as u8;
                    row.detected = true;
                }
                None => {
                    row.percent = 0;
                    row.detected = false;
                }
            }
        }
    }
}
