//! FILENAME: taxonomy/src/node.rs
//! Taxonomy tree - the immutable arena of classification nodes.
//!
//! Nodes live in a flat `Vec` arena addressed by stable `NodeId`
//! indices; parent/child links are ids, never references. The whole
//! tree is constructed once through `TaxonomyBuilder` and never mutated
//! afterwards, so a `TaxonomyRegistry` can be shared freely across
//! concurrent renders.
//!
//! Level and gender-breakdown derivation both happen HERE, at
//! construction time, and nowhere else. Renderers and aggregators read
//! the stored `level` / `is_gender_breakdown` fields; they never parse
//! label text themselves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::{PathSegment, TaxonomyPath};

/// Number of classification levels: Program, Indicator, Sub-Indicator,
/// Sub-Sub-Indicator.
pub const LEVEL_COUNT: u8 = 4;

// ============================================================================
// NODE IDENTITY
// ============================================================================

/// Stable index of a node within its registry's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// NODE
// ============================================================================

/// One classification level in the taxonomy tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Stable identifier, unique among this node's siblings.
    pub code: String,

    /// Canonical display text, including the dotted numbering prefix
    /// (e.g. "1.1.1 Local employment").
    pub label: String,

    /// The leading dotted numbering parsed out of `label` ("1.1.1").
    pub numbering: String,

    /// Nesting depth 0-3, derived from the numbering prefix's segment
    /// count at construction time.
    pub level: u8,

    /// True iff this node denotes the "Female" split of its parent's
    /// figure. Always a leaf; always a subset of the parent's total,
    /// never an independent category.
    pub is_gender_breakdown: bool,

    /// Caption for the synthetic per-program total row (program nodes
    /// only, e.g. "Total Applicants Referred").
    pub total_label: Option<String>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl TaxonomyNode {
    /// The label text after the numbering prefix ("Local employment").
    pub fn title(&self) -> &str {
        self.label[self.numbering.len()..].trim_start()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// CONSTRUCTION ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("label has no leading dotted numbering: {0:?}")]
    MissingNumbering(String),

    #[error("numbering of {label:?} implies level {derived} but the node nests at level {actual}")]
    LevelMismatch {
        label: String,
        derived: u8,
        actual: u8,
    },

    #[error("taxonomy deeper than {LEVEL_COUNT} levels at {0:?}")]
    TooDeep(String),

    #[error("duplicate sibling code {code:?} under {parent:?}")]
    DuplicateCode { code: String, parent: String },

    #[error("gender breakdown node {0:?} has children")]
    GenderNodeWithChildren(String),
}

// ============================================================================
// REGISTRY
// ============================================================================

/// The immutable classification tree plus lookup operations.
///
/// Pure structure: no aggregation, no mutation after construction.
/// Lookups that miss return `None` rather than failing, because the
/// taxonomy has historically been extended and reports stored against
/// older versions must still resolve whatever they can.
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    version: String,
    nodes: Vec<TaxonomyNode>,
    roots: Vec<NodeId>,
}

impl TaxonomyRegistry {
    /// The taxonomy version this registry describes.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn node(&self, id: NodeId) -> &TaxonomyNode {
        &self.nodes[id.index()]
    }

    /// Program (level 0) nodes in canonical display order.
    pub fn programs(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children in canonical display order (insertion order; never
    /// re-sorted).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves a classification path to its node, or `None` when any
    /// level does not exist in this taxonomy version.
    pub fn resolve(&self, path: &TaxonomyPath) -> Option<NodeId> {
        if !path.is_well_formed() {
            return None;
        }
        let mut codes = path.codes();
        let first = codes.next()?;
        let mut current = self.child_by_code(None, first)?;
        for code in codes {
            current = self.child_by_code(Some(current), code)?;
        }
        Some(current)
    }

    /// Convenience resolver taking the four path levels as the stored
    /// entry fields carry them.
    pub fn resolve_codes(
        &self,
        program: &str,
        indicator: Option<&str>,
        sub_indicator: Option<&str>,
        sub_sub_indicator: Option<&str>,
    ) -> Option<NodeId> {
        self.resolve(&TaxonomyPath::new(
            program,
            indicator,
            sub_indicator,
            sub_sub_indicator,
        ))
    }

    /// The full code path of a node, reconstructed from parent links.
    pub fn path_of(&self, id: NodeId) -> TaxonomyPath {
        let mut codes: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            codes.push(&node.code);
            current = node.parent;
        }
        codes.reverse();
        let mut segments: [PathSegment; LEVEL_COUNT as usize] = [
            PathSegment::Unspecified,
            PathSegment::Unspecified,
            PathSegment::Unspecified,
            PathSegment::Unspecified,
        ];
        for (slot, code) in segments.iter_mut().zip(codes) {
            *slot = PathSegment::Code(code.to_string());
        }
        TaxonomyPath::from_segments(segments)
    }

    /// Lazy pre-order traversal of the entire tree in canonical display
    /// order.
    pub fn canonical_order(&self) -> CanonicalOrder<'_> {
        let mut stack: Vec<NodeId> = self.roots.clone();
        stack.reverse();
        CanonicalOrder {
            registry: self,
            stack,
        }
    }

    /// Lazy pre-order traversal of one node's subtree (the node itself
    /// first).
    pub fn subtree(&self, id: NodeId) -> CanonicalOrder<'_> {
        CanonicalOrder {
            registry: self,
            stack: vec![id],
        }
    }

    /// The gender-breakdown child of a node, if it has one.
    pub fn gender_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_gender_breakdown)
    }

    fn child_by_code(&self, parent: Option<NodeId>, code: &str) -> Option<NodeId> {
        let siblings = match parent {
            Some(id) => self.children(id),
            None => &self.roots,
        };
        siblings
            .iter()
            .copied()
            .find(|&id| self.node(id).code == code)
    }
}

// ============================================================================
// PRE-ORDER ITERATOR
// ============================================================================

/// Iterator over node ids in canonical pre-order.
pub struct CanonicalOrder<'a> {
    registry: &'a TaxonomyRegistry,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for CanonicalOrder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.registry.children(id);
        self.stack.extend(children.iter().rev().copied());
        Some(id)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Incremental constructor for a `TaxonomyRegistry`.
///
/// Insertion order of children is the canonical display order. Level is
/// derived from each label's numbering prefix and checked against the
/// actual nesting depth, so a definition whose numbering disagrees with
/// its shape fails to build instead of rendering misindented.
pub struct TaxonomyBuilder {
    version: String,
    nodes: Vec<TaxonomyNode>,
    roots: Vec<NodeId>,
}

impl TaxonomyBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        TaxonomyBuilder {
            version: version.into(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Adds a program (level 0) node with its total-row caption.
    pub fn add_program(
        &mut self,
        code: &str,
        label: &str,
        total_label: &str,
    ) -> Result<NodeId, TaxonomyError> {
        let id = self.add_node(None, code, label)?;
        self.nodes[id.index()].total_label = Some(total_label.to_string());
        Ok(id)
    }

    /// Adds a child under an existing node.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        code: &str,
        label: &str,
    ) -> Result<NodeId, TaxonomyError> {
        self.add_node(Some(parent), code, label)
    }

    /// Finalizes the tree: derives gender-breakdown roles and freezes
    /// the arena.
    pub fn finish(mut self) -> Result<TaxonomyRegistry, TaxonomyError> {
        for index in 0..self.nodes.len() {
            let female_titled = self.nodes[index].title().eq_ignore_ascii_case("female");
            if female_titled && !self.nodes[index].children.is_empty() {
                return Err(TaxonomyError::GenderNodeWithChildren(
                    self.nodes[index].label.clone(),
                ));
            }
            self.nodes[index].is_gender_breakdown = female_titled;
        }
        Ok(TaxonomyRegistry {
            version: self.version,
            nodes: self.nodes,
            roots: self.roots,
        })
    }

    fn add_node(
        &mut self,
        parent: Option<NodeId>,
        code: &str,
        label: &str,
    ) -> Result<NodeId, TaxonomyError> {
        let (numbering, _title) = split_numbering(label)
            .ok_or_else(|| TaxonomyError::MissingNumbering(label.to_string()))?;
        let derived = (numbering.split('.').count() - 1) as u8;
        let actual = match parent {
            Some(id) => self.nodes[id.index()].level + 1,
            None => 0,
        };
        if actual >= LEVEL_COUNT {
            return Err(TaxonomyError::TooDeep(label.to_string()));
        }
        if derived != actual {
            return Err(TaxonomyError::LevelMismatch {
                label: label.to_string(),
                derived,
                actual,
            });
        }

        let siblings = match parent {
            Some(id) => &self.nodes[id.index()].children,
            None => &self.roots,
        };
        if siblings
            .iter()
            .any(|&sibling| self.nodes[sibling.index()].code == code)
        {
            return Err(TaxonomyError::DuplicateCode {
                code: code.to_string(),
                parent: parent
                    .map(|id| self.nodes[id.index()].label.clone())
                    .unwrap_or_else(|| "<root>".to_string()),
            });
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TaxonomyNode {
            code: code.to_string(),
            label: label.to_string(),
            numbering: numbering.to_string(),
            level: actual,
            is_gender_breakdown: false,
            total_label: None,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.nodes[parent_id.index()].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }
}

/// Splits a label into its leading dotted numbering and the title text.
/// "1.1.1 Local employment" -> ("1.1.1", "Local employment").
fn split_numbering(label: &str) -> Option<(&str, &str)> {
    let space = label.find(char::is_whitespace)?;
    let (prefix, rest) = label.split_at(space);
    let valid = !prefix.is_empty()
        && prefix
            .split('.')
            .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()));
    if !valid {
        return None;
    }
    let title = rest.trim_start();
    if title.is_empty() {
        return None;
    }
    Some((prefix, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_registry() -> TaxonomyRegistry {
        let mut builder = TaxonomyBuilder::new("test");
        let program = builder
            .add_program("VACANCIES", "1 Job vacancies solicited", "Total Vacancies")
            .unwrap();
        let regular = builder
            .add_child(program, "REGULAR", "1.1 Regular program")
            .unwrap();
        let local = builder
            .add_child(regular, "LOCAL", "1.1.1 Local employment")
            .unwrap();
        builder.add_child(local, "FEMALE", "1.1.1.1 Female").unwrap();
        builder
            .add_child(regular, "OVERSEAS", "1.1.2 Overseas employment")
            .unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn test_split_numbering() {
        assert_eq!(
            split_numbering("1.1.1 Local employment"),
            Some(("1.1.1", "Local employment"))
        );
        assert_eq!(split_numbering("2 Applicants registered").map(|p| p.0), Some("2"));
        assert_eq!(split_numbering("Local employment"), None);
        assert_eq!(split_numbering("1.1"), None);
        assert_eq!(split_numbering("1..1 Broken"), None);
    }

    #[test]
    fn test_level_derivation() {
        let registry = create_test_registry();
        let levels: Vec<u8> = registry
            .canonical_order()
            .map(|id| registry.node(id).level)
            .collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 2]);
    }

    #[test]
    fn test_level_mismatch_rejected() {
        let mut builder = TaxonomyBuilder::new("test");
        let program = builder
            .add_program("VACANCIES", "1 Job vacancies solicited", "Total")
            .unwrap();
        let err = builder
            .add_child(program, "REGULAR", "1.1.1 Regular program")
            .unwrap_err();
        assert!(matches!(err, TaxonomyError::LevelMismatch { .. }));
    }

    #[test]
    fn test_gender_derivation() {
        let registry = create_test_registry();
        let female = registry
            .resolve_codes("VACANCIES", Some("REGULAR"), Some("LOCAL"), Some("FEMALE"))
            .unwrap();
        assert!(registry.node(female).is_gender_breakdown);
        let local = registry
            .resolve_codes("VACANCIES", Some("REGULAR"), Some("LOCAL"), None)
            .unwrap();
        assert!(!registry.node(local).is_gender_breakdown);
        assert_eq!(registry.gender_child(local), Some(female));
    }

    #[test]
    fn test_gender_node_with_children_rejected() {
        let mut builder = TaxonomyBuilder::new("test");
        let program = builder.add_program("P", "1 Program", "Total").unwrap();
        let female = builder.add_child(program, "FEMALE", "1.1 Female").unwrap();
        builder.add_child(female, "X", "1.1.1 Under female").unwrap();
        let err = builder.finish().unwrap_err();
        assert!(matches!(err, TaxonomyError::GenderNodeWithChildren(_)));
    }

    #[test]
    fn test_duplicate_sibling_code_rejected() {
        let mut builder = TaxonomyBuilder::new("test");
        let program = builder.add_program("P", "1 Program", "Total").unwrap();
        builder.add_child(program, "A", "1.1 First").unwrap();
        let err = builder.add_child(program, "A", "1.2 Second").unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateCode { .. }));
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        let registry = create_test_registry();
        assert!(registry.resolve_codes("NOPE", None, None, None).is_none());
        assert!(registry
            .resolve_codes("VACANCIES", Some("NOPE"), None, None)
            .is_none());
    }

    #[test]
    fn test_canonical_order_is_preorder() {
        let registry = create_test_registry();
        let labels: Vec<&str> = registry
            .canonical_order()
            .map(|id| registry.node(id).label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "1 Job vacancies solicited",
                "1.1 Regular program",
                "1.1.1 Local employment",
                "1.1.1.1 Female",
                "1.1.2 Overseas employment",
            ]
        );
    }

    #[test]
    fn test_path_of_roundtrip() {
        let registry = create_test_registry();
        for id in registry.canonical_order() {
            let path = registry.path_of(id);
            assert_eq!(registry.resolve(&path), Some(id));
        }
    }

    #[test]
    fn test_title_strips_numbering() {
        let registry = create_test_registry();
        let program = registry.programs()[0];
        assert_eq!(registry.node(program).title(), "Job vacancies solicited");
    }
}
