//! FILENAME: report-engine/src/model.rs
//! Report data model - the stored observation types.
//!
//! These structures are the serializable boundary shared with the form
//! and repository layers: plain data, no behavior beyond accessors.

use serde::{Deserialize, Serialize};
use taxonomy::TaxonomyPath;

// ============================================================================
// PERIODS AND DIMENSIONS
// ============================================================================

/// Which of the two reported periods a query addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Previous,
    Current,
}

/// Which slice of a figure a query addresses.
///
/// `FemaleOnly` is an independently reported parallel figure, never a
/// subtraction from `Total` and never substituted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Total,
    FemaleOnly,
}

// ============================================================================
// ENTRIES
// ============================================================================

/// One stored observation against the indicator taxonomy.
///
/// The four path fields are codes into the taxonomy tree; trailing
/// levels are absent when the figure attaches to a node with no further
/// subdivision. An entry whose path no longer resolves (older taxonomy
/// version) is quarantined by the index, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub program: String,
    pub indicator: String,
    #[serde(default)]
    pub sub_indicator: Option<String>,
    #[serde(default)]
    pub sub_sub_indicator: Option<String>,

    pub previous_period_value: u64,
    pub current_period_value: u64,

    /// Free text, never used in aggregation.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ReportEntry {
    pub fn new(
        program: &str,
        indicator: &str,
        sub_indicator: Option<&str>,
        sub_sub_indicator: Option<&str>,
    ) -> Self {
        ReportEntry {
            program: program.to_string(),
            indicator: indicator.to_string(),
            sub_indicator: sub_indicator.map(str::to_string),
            sub_sub_indicator: sub_sub_indicator.map(str::to_string),
            previous_period_value: 0,
            current_period_value: 0,
            remarks: None,
        }
    }

    pub fn with_values(mut self, previous: u64, current: u64) -> Self {
        self.previous_period_value = previous;
        self.current_period_value = current;
        self
    }

    /// The explicit-sentinel classification path of this entry.
    pub fn path(&self) -> TaxonomyPath {
        TaxonomyPath::new(
            &self.program,
            Some(&self.indicator),
            self.sub_indicator.as_deref(),
            self.sub_sub_indicator.as_deref(),
        )
    }

    pub fn value(&self, period: Period) -> u64 {
        match period {
            Period::Previous => self.previous_period_value,
            Period::Current => self.current_period_value,
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// A named, dated collection of entries - the unit of aggregation.
/// All taxonomy queries are scoped to exactly one report's entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub reporting_period: String,
    pub reporting_office: String,
    pub entries: Vec<ReportEntry>,
}

/// Identifying strings for the export header and signature blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub reporting_period: String,
    pub reporting_office: String,
    pub preparer_name: String,
    pub approver_name: String,
}
