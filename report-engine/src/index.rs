//! FILENAME: report-engine/src/index.rs
//! Entry Index - aggregation-ready lookup over one report's entries.
//!
//! Built fresh per aggregation call, privately owned by it, and never
//! mutated after construction. Buckets are keyed by the resolved
//! taxonomy node: resolution consumes the explicit-sentinel path, so
//! the index cannot inherit the legacy null/''/undefined ambiguity.
//!
//! Entries whose path does not resolve in the current taxonomy version
//! go to a separate orphan bucket: excluded from every aggregate but
//! retrievable for diagnostics, never silently dropped.

use rustc_hash::FxHashMap;
use taxonomy::{NodeId, TaxonomyRegistry};

use crate::model::ReportEntry;

/// Per-report lookup structure feeding the aggregator.
pub struct EntryIndex<'a> {
    registry: &'a TaxonomyRegistry,
    buckets: FxHashMap<NodeId, Vec<&'a ReportEntry>>,
    orphans: Vec<&'a ReportEntry>,
}

impl<'a> EntryIndex<'a> {
    /// Indexes a flat entry collection against a taxonomy version.
    ///
    /// Multiple entries may legitimately share a path (a resubmission
    /// corrects by addition); every one of them is preserved here.
    /// Deduplication policy is the aggregator's concern, not the
    /// index's.
    pub fn build(registry: &'a TaxonomyRegistry, entries: &'a [ReportEntry]) -> Self {
        let mut buckets: FxHashMap<NodeId, Vec<&'a ReportEntry>> = FxHashMap::default();
        let mut orphans = Vec::new();
        for entry in entries {
            match registry.resolve(&entry.path()) {
                Some(node) => buckets.entry(node).or_default().push(entry),
                None => orphans.push(entry),
            }
        }
        EntryIndex {
            registry,
            buckets,
            orphans,
        }
    }

    pub fn registry(&self) -> &'a TaxonomyRegistry {
        self.registry
    }

    /// All entries stored at exactly this node. Empty for nodes with no
    /// data, which is a normal state for a fresh report.
    pub fn entries_at(&self, node: NodeId) -> &[&'a ReportEntry] {
        self.buckets.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries whose path did not resolve in this taxonomy version.
    pub fn orphans(&self) -> &[&'a ReportEntry] {
        &self.orphans
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }

    /// Number of entries that resolved into buckets.
    pub fn indexed_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
