//! FILENAME: report-engine/src/aggregate.rs
//! Aggregator - point and subtree queries over an entry index.
//!
//! Every query returns 0 for paths with no matching entries; absence of
//! data is the normal state of a freshly created report, never an
//! error. Entries sharing a path are summed, never overwritten: the
//! repository layer decides whether a resubmission supersedes or adds.

use taxonomy::{NodeId, TaxonomyPath};

use crate::index::EntryIndex;
use crate::model::{Dimension, Period};

/// Read-only aggregation queries for one report.
pub struct Aggregator<'a> {
    index: &'a EntryIndex<'a>,
}

impl<'a> Aggregator<'a> {
    pub fn new(index: &'a EntryIndex<'a>) -> Self {
        Aggregator { index }
    }

    /// The aggregated value stored at one node.
    ///
    /// - `Total`: sum of entries at exactly this node, excluding any
    ///   entry that resolves to a gender-breakdown node. The female
    ///   figure lives at a deeper path and is reported in parallel; it
    ///   is never subtracted from or folded into the total.
    /// - `FemaleOnly`: the gender-breakdown child's entries if the node
    ///   has one, the node's own entries if the node IS a breakdown,
    ///   otherwise 0.
    pub fn value_at(&self, node: NodeId, period: Period, dimension: Dimension) -> u64 {
        let registry = self.index.registry();
        match dimension {
            Dimension::Total => {
                if registry.node(node).is_gender_breakdown {
                    return 0;
                }
                self.sum_entries(node, period)
            }
            Dimension::FemaleOnly => {
                if let Some(child) = registry.gender_child(node) {
                    self.sum_entries(child, period)
                } else if registry.node(node).is_gender_breakdown {
                    self.sum_entries(node, period)
                } else {
                    0
                }
            }
        }
    }

    /// Path-addressed variant of `value_at`. An unresolvable path
    /// contributes zero, never an error: older reports may reference
    /// taxonomy versions that have since evolved.
    pub fn value_at_path(&self, path: &TaxonomyPath, period: Period, dimension: Dimension) -> u64 {
        match self.index.registry().resolve(path) {
            Some(node) => self.value_at(node, period, dimension),
            None => 0,
        }
    }

    /// Sum of `value_at` over a node and every descendant, counting
    /// each stored entry exactly once. Used for the synthetic
    /// category-total rows.
    pub fn subtree_sum(&self, node: NodeId, period: Period, dimension: Dimension) -> u64 {
        let registry = self.index.registry();
        registry
            .subtree(node)
            .map(|id| match dimension {
                // Each gender bucket is counted at its own node, not
                // again at the parent that exposes it.
                Dimension::Total => {
                    if registry.node(id).is_gender_breakdown {
                        0
                    } else {
                        self.sum_entries(id, period)
                    }
                }
                Dimension::FemaleOnly => {
                    if registry.node(id).is_gender_breakdown {
                        self.sum_entries(id, period)
                    } else {
                        0
                    }
                }
            })
            .sum()
    }

    fn sum_entries(&self, node: NodeId, period: Period) -> u64 {
        self.index
            .entries_at(node)
            .iter()
            .map(|entry| entry.value(period))
            .sum()
    }
}
