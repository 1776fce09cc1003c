//! FILENAME: taxonomy/src/lib.rs
//! Indicator taxonomy for the employment-statistics reporting engine.
//!
//! This crate owns the fixed four-level classification of reportable
//! program indicators (Program -> Indicator -> Sub-Indicator ->
//! Sub-Sub-Indicator, the last almost always a "Female" breakdown) and
//! everything derivable from it:
//!
//! Layers:
//! - `node`: the immutable arena tree and the registry lookup contract
//! - `path`: explicit-sentinel classification paths and the dotted
//!   numbering codec ("1.1.1.1" <-> code path)
//! - `registry`: the built-in, versioned taxonomy definition
//!
//! The registry is pure structure: it performs no aggregation and is
//! built once per process, then shared read-only.

pub mod node;
pub mod path;
pub mod registry;

pub use node::{
    CanonicalOrder, NodeId, TaxonomyBuilder, TaxonomyError, TaxonomyNode, TaxonomyRegistry,
};
pub use path::{PathCodec, PathSegment, TaxonomyPath};
pub use registry::{builtin, BUILTIN_VERSION};
