//! FILENAME: report-engine/src/lib.rs
//! Report aggregation engine.
//!
//! Takes one report's flat stored entries and the shared taxonomy and
//! produces the ordered display rows every export surface renders.
//! Data flows one direction:
//!
//!   entries -> EntryIndex -> Aggregator -> RowSequencer -> renderers
//!
//! Layers:
//! - `model`: the stored observation types (what a report IS)
//! - `index`: aggregation-ready per-report lookup (HOW entries are found)
//! - `aggregate`: point and subtree queries (HOW values are computed)
//! - `sequence`: canonical display-row derivation (WHAT every renderer shows)
//!
//! Everything here is a pure, synchronous computation over an in-memory
//! snapshot; nothing blocks and nothing is shared mutably.

pub mod aggregate;
pub mod index;
pub mod model;
pub mod sequence;

pub use aggregate::Aggregator;
pub use index::EntryIndex;
pub use model::{Dimension, Period, Report, ReportEntry, ReportMeta};
pub use sequence::{sequence_rows, DisplayRow, RowKind, RowSet};
