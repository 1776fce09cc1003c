//! FILENAME: taxonomy/src/path.rs
//! Classification paths and the dotted-numbering codec.
//!
//! A path locates one taxonomy node as a fixed 4-tuple of levels.
//! "No further specification" is the explicit `Unspecified` sentinel,
//! one per level; it is never conflated with an empty code string, so
//! the legacy three-way null/''/undefined ambiguity cannot reappear.

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, TaxonomyRegistry, LEVEL_COUNT};

// ============================================================================
// PATH SEGMENTS
// ============================================================================

/// One level of a classification path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// A stable taxonomy code at this level.
    Code(String),
    /// Explicit sentinel: the path stops above this level.
    Unspecified,
}

impl PathSegment {
    pub fn code(&self) -> Option<&str> {
        match self {
            PathSegment::Code(code) => Some(code),
            PathSegment::Unspecified => None,
        }
    }

    fn from_option(code: Option<&str>) -> Self {
        match code {
            Some(code) => PathSegment::Code(code.to_string()),
            None => PathSegment::Unspecified,
        }
    }
}

// ============================================================================
// PATH
// ============================================================================

/// A (program, indicator, sub-indicator, sub-sub-indicator) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonomyPath {
    segments: [PathSegment; LEVEL_COUNT as usize],
}

impl TaxonomyPath {
    pub fn new(
        program: &str,
        indicator: Option<&str>,
        sub_indicator: Option<&str>,
        sub_sub_indicator: Option<&str>,
    ) -> Self {
        TaxonomyPath {
            segments: [
                PathSegment::Code(program.to_string()),
                PathSegment::from_option(indicator),
                PathSegment::from_option(sub_indicator),
                PathSegment::from_option(sub_sub_indicator),
            ],
        }
    }

    /// A path addressing just a program.
    pub fn program(code: &str) -> Self {
        TaxonomyPath::new(code, None, None, None)
    }

    pub fn from_segments(segments: [PathSegment; LEVEL_COUNT as usize]) -> Self {
        TaxonomyPath { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of specified levels before the first sentinel.
    pub fn depth(&self) -> u8 {
        self.segments
            .iter()
            .take_while(|segment| matches!(segment, PathSegment::Code(_)))
            .count() as u8
    }

    /// True iff no specified level follows an `Unspecified` one.
    pub fn is_well_formed(&self) -> bool {
        let depth = self.depth() as usize;
        self.segments[depth..]
            .iter()
            .all(|segment| matches!(segment, PathSegment::Unspecified))
    }

    /// The specified codes, outermost first.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(PathSegment::code)
    }

    /// The path one level up, or `None` for a program-level path.
    pub fn parent(&self) -> Option<TaxonomyPath> {
        let depth = self.depth();
        if depth <= 1 {
            return None;
        }
        let mut segments = self.segments.clone();
        segments[depth as usize - 1] = PathSegment::Unspecified;
        Some(TaxonomyPath { segments })
    }

    /// The path extended one level down, or `None` when already fully
    /// specified.
    pub fn child(&self, code: &str) -> Option<TaxonomyPath> {
        let depth = self.depth();
        if depth >= LEVEL_COUNT || !self.is_well_formed() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments[depth as usize] = PathSegment::Code(code.to_string());
        Some(TaxonomyPath { segments })
    }
}

impl std::fmt::Display for TaxonomyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for code in self.codes() {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{}", code)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// CODEC
// ============================================================================

/// Converts between classification paths and the dotted numbering
/// strings the paper form displays ("1.1.1.1"), and answers semantic
/// role questions for a path.
///
/// All role answers delegate to the fields derived once at tree
/// construction; nothing here re-parses label text.
pub struct PathCodec<'a> {
    registry: &'a TaxonomyRegistry,
}

impl<'a> PathCodec<'a> {
    pub fn new(registry: &'a TaxonomyRegistry) -> Self {
        PathCodec { registry }
    }

    /// The dotted numbering of the node a path resolves to.
    pub fn encode(&self, path: &TaxonomyPath) -> Option<String> {
        let id = self.registry.resolve(path)?;
        Some(self.registry.node(id).numbering.clone())
    }

    /// Walks a dotted numbering string back to the code path it
    /// addresses in this taxonomy version.
    pub fn decode(&self, numbering: &str) -> Option<TaxonomyPath> {
        let mut current: Option<NodeId> = None;
        let mut accumulated = String::new();
        for segment in numbering.split('.') {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            if !accumulated.is_empty() {
                accumulated.push('.');
            }
            accumulated.push_str(segment);
            let siblings = match current {
                Some(id) => self.registry.children(id),
                None => self.registry.programs(),
            };
            current = siblings
                .iter()
                .copied()
                .find(|&id| self.registry.node(id).numbering == accumulated);
            current?;
        }
        current.map(|id| self.registry.path_of(id))
    }

    /// Nesting level of a resolvable path.
    pub fn level(&self, path: &TaxonomyPath) -> Option<u8> {
        let id = self.registry.resolve(path)?;
        Some(self.registry.node(id).level)
    }

    /// True iff the path resolves to a "Female" breakdown leaf.
    pub fn is_gender_breakdown(&self, path: &TaxonomyPath) -> bool {
        self.registry
            .resolve(path)
            .map(|id| self.registry.node(id).is_gender_breakdown)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TaxonomyBuilder;

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
        let registered = builder
            .add_program("REGISTERED", "2 Applicants registered", "Total Registered")
            .unwrap();
        builder.add_child(registered, "SPES", "2.1 SPES").unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn test_depth_and_well_formed() {
        let full = TaxonomyPath::new("A", Some("B"), Some("C"), Some("D"));
        assert_eq!(full.depth(), 4);
        assert!(full.is_well_formed());

        let short = TaxonomyPath::new("A", Some("B"), None, None);
        assert_eq!(short.depth(), 2);
        assert!(short.is_well_formed());

        // A specified level below a sentinel is malformed.
        let gap = TaxonomyPath::new("A", None, Some("C"), None);
        assert_eq!(gap.depth(), 1);
        assert!(!gap.is_well_formed());
    }

    #[test]
    fn test_gap_path_never_resolves() {
        let registry = create_test_registry();
        let gap = TaxonomyPath::new("VACANCIES", None, Some("LOCAL"), None);
        assert_eq!(registry.resolve(&gap), None);
    }

    #[test]
    fn test_parent_and_child() {
        let path = TaxonomyPath::new("A", Some("B"), None, None);
        assert_eq!(path.parent(), Some(TaxonomyPath::program("A")));
        assert_eq!(TaxonomyPath::program("A").parent(), None);
        assert_eq!(
            path.child("C"),
            Some(TaxonomyPath::new("A", Some("B"), Some("C"), None))
        );
        let full = TaxonomyPath::new("A", Some("B"), Some("C"), Some("D"));
        assert_eq!(full.child("E"), None);
    }

    #[test]
    fn test_encode() {
        let registry = create_test_registry();
        let codec = PathCodec::new(&registry);
        let path = TaxonomyPath::new("VACANCIES", Some("REGULAR"), Some("LOCAL"), Some("FEMALE"));
        assert_eq!(codec.encode(&path).as_deref(), Some("1.1.1.1"));
        assert_eq!(
            codec.encode(&TaxonomyPath::program("REGISTERED")).as_deref(),
            Some("2")
        );
        assert_eq!(codec.encode(&TaxonomyPath::program("NOPE")), None);
    }

    #[test]
    fn test_decode() {
        let registry = create_test_registry();
        let codec = PathCodec::new(&registry);
        assert_eq!(
            codec.decode("1.1.1"),
            Some(TaxonomyPath::new(
                "VACANCIES",
                Some("REGULAR"),
                Some("LOCAL"),
                None
            ))
        );
        assert_eq!(codec.decode("3"), None);
        assert_eq!(codec.decode("1.9"), None);
        assert_eq!(codec.decode("1..1"), None);
        assert_eq!(codec.decode("abc"), None);
    }

    #[test]
    fn test_roundtrip_every_registry_path() {
        let registry = create_test_registry();
        let codec = PathCodec::new(&registry);
        for id in registry.canonical_order() {
            let path = registry.path_of(id);
            let encoded = codec.encode(&path).expect("registry path encodes");
            let decoded = codec.decode(&encoded).expect("numbering decodes");
            assert_eq!(decoded, path, "roundtrip failed for {}", encoded);
        }
    }

    #[test]
    fn test_role_lookups() {
        let registry = create_test_registry();
        let codec = PathCodec::new(&registry);
        let female = TaxonomyPath::new("VACANCIES", Some("REGULAR"), Some("LOCAL"), Some("FEMALE"));
        assert!(codec.is_gender_breakdown(&female));
        assert_eq!(codec.level(&female), Some(3));
        let local = female.parent().unwrap();
        assert!(!codec.is_gender_breakdown(&local));
        assert_eq!(codec.level(&local), Some(2));
        assert!(!codec.is_gender_breakdown(&TaxonomyPath::program("NOPE")));
    }

    #[test]
    fn test_display() {
        let path = TaxonomyPath::new("A", Some("B"), None, None);
        assert_eq!(path.to_string(), "A/B");
    }
}
