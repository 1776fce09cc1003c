//! FILENAME: report-engine/src/sequence.rs
//! Row Sequencer - the single source of display order for every
//! renderer.
//!
//! Walks the taxonomy in canonical pre-order and asks the aggregator
//! for each node's values, producing the one ordered row sequence the
//! HTML, PDF and Excel surfaces all consume unmodified. Renderers never
//! re-derive values from raw entries; cross-renderer agreement is
//! guaranteed here, structurally, not checked at runtime.

use serde::{Deserialize, Serialize};
use taxonomy::{NodeId, TaxonomyRegistry};

use crate::aggregate::Aggregator;
use crate::index::EntryIndex;
use crate::model::{Dimension, Period, Report, ReportEntry};

// ============================================================================
// DISPLAY ROWS
// ============================================================================

/// What kind of table row a `DisplayRow` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// Program section header; carries no values.
    Section,
    /// One taxonomy category with its aggregated figures.
    Category,
    /// Synthetic per-program total.
    Total,
}

/// One renderer-agnostic output row.
///
/// The female values are present only when the underlying node has a
/// direct gender-breakdown child (or the row is a program total): the
/// paper form places the female count as a second line inside the same
/// logical cell, never as a separate table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub label: String,
    pub level: u8,
    pub kind: RowKind,
    pub previous_total: u64,
    pub current_total: u64,
    pub previous_female: Option<u64>,
    pub current_female: Option<u64>,
}

/// The sequencer's full output: ordered rows plus orphan diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSet {
    pub rows: Vec<DisplayRow>,
    /// Entries whose path did not resolve in this taxonomy version.
    /// Excluded from every total above; surfaced for diagnostics.
    pub orphaned: Vec<ReportEntry>,
}

impl RowSet {
    pub fn orphan_count(&self) -> usize {
        self.orphaned.len()
    }
}

// ============================================================================
// SEQUENCING
// ============================================================================

/// Derives the canonical display-row sequence for one report.
///
/// Pure function of `(report, registry)`: no hidden counters or
/// timestamps, so sequencing the same entries twice yields identical
/// rows.
pub fn sequence_rows(registry: &TaxonomyRegistry, report: &Report) -> RowSet {
    let index = EntryIndex::build(registry, &report.entries);
    let aggregator = Aggregator::new(&index);

    let mut rows = Vec::new();
    for &program in registry.programs() {
        push_section_row(registry, program, &mut rows);
        for node in registry.subtree(program).skip(1) {
            push_category_row(registry, &aggregator, node, &mut rows);
        }
        push_total_row(registry, &aggregator, program, &mut rows);
    }

    RowSet {
        rows,
        orphaned: index.orphans().iter().map(|&entry| entry.clone()).collect(),
    }
}

fn push_section_row(registry: &TaxonomyRegistry, program: NodeId, rows: &mut Vec<DisplayRow>) {
    let node = registry.node(program);
    rows.push(DisplayRow {
        label: node.label.clone(),
        level: node.level,
        kind: RowKind::Section,
        previous_total: 0,
        current_total: 0,
        previous_female: None,
        current_female: None,
    });
}

fn push_category_row(
    registry: &TaxonomyRegistry,
    aggregator: &Aggregator<'_>,
    id: NodeId,
    rows: &mut Vec<DisplayRow>,
) {
    let node = registry.node(id);
    // Gender leaves never become rows of their own; their figure rides
    // on the parent category row below.
    if node.is_gender_breakdown {
        return;
    }

    // Subtree sums so parent categories aggregate across their
    // children; for a leaf this equals its own stored value.
    let previous_total = aggregator.subtree_sum(id, Period::Previous, Dimension::Total);
    let current_total = aggregator.subtree_sum(id, Period::Current, Dimension::Total);

    let has_gender_child = registry.gender_child(id).is_some();
    let (previous_female, current_female) = if has_gender_child {
        (
            Some(aggregator.value_at(id, Period::Previous, Dimension::FemaleOnly)),
            Some(aggregator.value_at(id, Period::Current, Dimension::FemaleOnly)),
        )
    } else {
        (None, None)
    };

    rows.push(DisplayRow {
        label: node.label.clone(),
        level: node.level,
        kind: RowKind::Category,
        previous_total,
        current_total,
        previous_female,
        current_female,
    });
}

fn push_total_row(
    registry: &TaxonomyRegistry,
    aggregator: &Aggregator<'_>,
    program: NodeId,
    rows: &mut Vec<DisplayRow>,
) {
    let node = registry.node(program);
    let label = node
        .total_label
        .clone()
        .unwrap_or_else(|| format!("Total {}", node.title()));

    rows.push(DisplayRow {
        label,
        level: 0,
        kind: RowKind::Total,
        previous_total: aggregator.subtree_sum(program, Period::Previous, Dimension::Total),
        current_total: aggregator.subtree_sum(program, Period::Current, Dimension::Total),
        previous_female: Some(aggregator.subtree_sum(
            program,
            Period::Previous,
            Dimension::FemaleOnly,
        )),
        current_female: Some(aggregator.subtree_sum(
            program,
            Period::Current,
            Dimension::FemaleOnly,
        )),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxonomy::builtin;

    fn create_test_report(entries: Vec<ReportEntry>) -> Report {
        Report {
            reporting_period: "January 2024".to_string(),
            reporting_office: "Provincial Office".to_string(),
            entries,
        }
    }

    fn row<'a>(set: &'a RowSet, label: &str) -> &'a DisplayRow {
        set.rows
            .iter()
            .find(|row| row.label == label)
            .unwrap_or_else(|| panic!("no row labeled {:?}", label))
    }

    #[test]
    fn test_empty_report_is_all_zero_rows() {
        let set = sequence_rows(builtin(), &create_test_report(Vec::new()));
        assert!(!set.rows.is_empty());
        assert_eq!(set.orphan_count(), 0);
        for row in &set.rows {
            assert_eq!(row.current_total, 0);
            assert_eq!(row.previous_total, 0);
        }
    }

    #[test]
    fn test_single_entry_scenario() {
        let entries = vec![
            ReportEntry::new(
                "JOB_VACANCIES",
                "REGULAR_PROGRAM",
                Some("LOCAL_EMPLOYMENT"),
                None,
            )
            .with_values(0, 548),
            ReportEntry::new(
                "JOB_VACANCIES",
                "REGULAR_PROGRAM",
                Some("LOCAL_EMPLOYMENT"),
                Some("FEMALE"),
            )
            .with_values(0, 36),
        ];
        let set = sequence_rows(builtin(), &create_test_report(entries));

        // Female rides on the same row as its category, never separate.
        let local = row(&set, "1.1.1 Local employment");
        assert_eq!(local.kind, RowKind::Category);
        assert_eq!(local.current_total, 548);
        assert_eq!(local.current_female, Some(36));
        assert!(!set.rows.iter().any(|r| r.label.ends_with("Female")));

        // The parent indicator aggregates across its children.
        let regular = row(&set, "1.1 Regular program");
        assert_eq!(regular.current_total, 548);
        assert_eq!(regular.current_female, None);

        // The program total equals the sum of its category rows.
        let total = row(&set, "Total Job Vacancies Solicited");
        assert_eq!(total.kind, RowKind::Total);
        assert_eq!(total.current_total, 548);
        assert_eq!(total.current_female, Some(36));
    }

    #[test]
    fn test_section_rows_carry_no_values() {
        let entries = vec![ReportEntry::new("JOB_VACANCIES", "SPES", None, None)
            .with_values(3, 7)];
        let set = sequence_rows(builtin(), &create_test_report(entries));
        let section = row(&set, "1 Job vacancies solicited");
        assert_eq!(section.kind, RowKind::Section);
        assert_eq!(section.current_total, 0);
        assert_eq!(section.current_female, None);
    }

    #[test]
    fn test_row_order_follows_canonical_traversal() {
        let set = sequence_rows(builtin(), &create_test_report(Vec::new()));
        let registry = builtin();

        // Section first, total last, per program block.
        let mut expected = Vec::new();
        for &program in registry.programs() {
            expected.push(registry.node(program).label.clone());
            for id in registry.subtree(program).skip(1) {
                let node = registry.node(id);
                if !node.is_gender_breakdown {
                    expected.push(node.label.clone());
                }
            }
            expected.push(registry.node(program).total_label.clone().unwrap());
        }
        let actual: Vec<String> = set.rows.iter().map(|row| row.label.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_orphans_reported_and_excluded() {
        let entries = vec![
            ReportEntry::new("UNKNOWN_PROGRAM", "X", None, None).with_values(99, 99),
            ReportEntry::new("JOB_VACANCIES", "SPES", None, None).with_values(0, 5),
        ];
        let set = sequence_rows(builtin(), &create_test_report(entries));
        assert_eq!(set.orphan_count(), 1);
        assert_eq!(set.orphaned[0].program, "UNKNOWN_PROGRAM");

        // The orphan's 99s appear in no total anywhere.
        assert!(set.rows.iter().all(|row| row.current_total != 99));
        let total = row(&set, "Total Job Vacancies Solicited");
        assert_eq!(total.current_total, 5);
    }

    #[test]
    fn test_sequencing_is_idempotent() {
        let entries = vec![
            ReportEntry::new(
                "APPLICANTS_REFERRED",
                "REGULAR_PROGRAM",
                Some("TRAINING"),
                None,
            )
            .with_values(11, 22),
            ReportEntry::new("APPLICANTS_REFERRED", "SPES", Some("FEMALE"), None)
                .with_values(1, 2),
        ];
        let report = create_test_report(entries);
        let first = sequence_rows(builtin(), &report);
        let second = sequence_rows(builtin(), &report);
        assert_eq!(first, second);
    }

    #[test]
    fn test_female_at_indicator_level() {
        // SPES stores its female split directly under the indicator.
        let entries = vec![
            ReportEntry::new("APPLICANTS_REFERRED", "SPES", None, None).with_values(0, 40),
            ReportEntry::new("APPLICANTS_REFERRED", "SPES", Some("FEMALE"), None)
                .with_values(0, 15),
        ];
        let set = sequence_rows(builtin(), &create_test_report(entries));
        let spes = row(&set, "3.2 Special Program for Employment of Students (SPES)");
        assert_eq!(spes.current_total, 40);
        assert_eq!(spes.current_female, Some(15));
    }
}
