//! FILENAME: taxonomy/src/registry.rs
//! The built-in, versioned indicator taxonomy.
//!
//! This is the canonical paper-form classification: four reporting
//! programs, each broken into regular/special-program indicators, with
//! "Female" breakdown leaves where the form collects a gender split.
//! The definition is a literal table fed through `TaxonomyBuilder`
//! exactly once per process; nothing else in the system constructs or
//! mutates taxonomy shape, so every call site sees the same tree.
//!
//! The taxonomy is versioned, not user-editable. Appending programs or
//! indicators in a later version is expected; removing or re-sorting is
//! not (stored reports reference codes positionally rendered in
//! insertion order).

use once_cell::sync::Lazy;

use crate::node::{NodeId, TaxonomyBuilder, TaxonomyError, TaxonomyRegistry};

/// Version tag of the built-in taxonomy.
pub const BUILTIN_VERSION: &str = "2024.1";

// ============================================================================
// DEFINITION TABLES
// ============================================================================

struct NodeDef {
    code: &'static str,
    label: &'static str,
    children: &'static [NodeDef],
}

struct ProgramDef {
    code: &'static str,
    label: &'static str,
    total_label: &'static str,
    children: &'static [NodeDef],
}

const fn leaf(code: &'static str, label: &'static str) -> NodeDef {
    NodeDef {
        code,
        label,
        children: &[],
    }
}

const PROGRAMS: &[ProgramDef] = &[
    ProgramDef {
        code: "JOB_VACANCIES",
        label: "1 Job vacancies solicited",
        total_label: "Total Job Vacancies Solicited",
        children: &[
            NodeDef {
                code: "REGULAR_PROGRAM",
                label: "1.1 Regular program",
                children: &[
                    NodeDef {
                        code: "LOCAL_EMPLOYMENT",
                        label: "1.1.1 Local employment",
                        children: &[leaf("FEMALE", "1.1.1.1 Female")],
                    },
                    NodeDef {
                        code: "OVERSEAS_EMPLOYMENT",
                        label: "1.1.2 Overseas employment",
                        children: &[leaf("FEMALE", "1.1.2.1 Female")],
                    },
                ],
            },
            NodeDef {
                code: "SPES",
                label: "1.2 Special Program for Employment of Students (SPES)",
                children: &[leaf("FEMALE", "1.2.1 Female")],
            },
            NodeDef {
                code: "WAP",
                label: "1.3 Work Appreciation Program (WAP)",
                children: &[leaf("FEMALE", "1.3.1 Female")],
            },
        ],
    },
    ProgramDef {
        code: "APPLICANTS_REGISTERED",
        label: "2 Applicants registered",
        total_label: "Total Applicants Registered",
        children: &[
            NodeDef {
                code: "REGULAR_PROGRAM",
                label: "2.1 Regular program",
                children: &[
                    NodeDef {
                        code: "LOCAL_EMPLOYMENT",
                        label: "2.1.1 Local employment",
                        children: &[leaf("FEMALE", "2.1.1.1 Female")],
                    },
                    NodeDef {
                        code: "OVERSEAS_EMPLOYMENT",
                        label: "2.1.2 Overseas employment",
                        children: &[leaf("FEMALE", "2.1.2.1 Female")],
                    },
                    NodeDef {
                        code: "SELF_EMPLOYMENT",
                        label: "2.1.3 Self-employment",
                        children: &[leaf("FEMALE", "2.1.3.1 Female")],
                    },
                    NodeDef {
                        code: "TRAINING",
                        label: "2.1.4 Training",
                        children: &[leaf("FEMALE", "2.1.4.1 Female")],
                    },
                ],
            },
            NodeDef {
                code: "SPES",
                label: "2.2 Special Program for Employment of Students (SPES)",
                children: &[leaf("FEMALE", "2.2.1 Female")],
            },
            NodeDef {
                code: "WAP",
                label: "2.3 Work Appreciation Program (WAP)",
                children: &[leaf("FEMALE", "2.3.1 Female")],
            },
            NodeDef {
                code: "TULAY_2000",
                label: "2.4 TULAY 2000",
                children: &[leaf("FEMALE", "2.4.1 Female")],
            },
        ],
    },
    ProgramDef {
        code: "APPLICANTS_REFERRED",
        label: "3 Applicants referred",
        total_label: "Total Applicants Referred",
        children: &[
            NodeDef {
                code: "REGULAR_PROGRAM",
                label: "3.1 Regular program",
                children: &[
                    NodeDef {
                        code: "LOCAL_EMPLOYMENT",
                        label: "3.1.1 Local employment",
                        children: &[leaf("FEMALE", "3.1.1.1 Female")],
                    },
                    NodeDef {
                        code: "OVERSEAS_EMPLOYMENT",
                        label: "3.1.2 Overseas employment",
                        children: &[leaf("FEMALE", "3.1.2.1 Female")],
                    },
                    NodeDef {
                        code: "SELF_EMPLOYMENT",
                        label: "3.1.3 Self-employment",
                        children: &[leaf("FEMALE", "3.1.3.1 Female")],
                    },
                    NodeDef {
                        code: "TRAINING",
                        label: "3.1.4 Training",
                        children: &[leaf("FEMALE", "3.1.4.1 Female")],
                    },
                ],
            },
            NodeDef {
                code: "SPES",
                label: "3.2 Special Program for Employment of Students (SPES)",
                children: &[leaf("FEMALE", "3.2.1 Female")],
            },
        ],
    },
    ProgramDef {
        code: "APPLICANTS_PLACED",
        label: "4 Applicants placed",
        total_label: "Total Applicants Placed",
        children: &[
            NodeDef {
                code: "REGULAR_PROGRAM",
                label: "4.1 Regular program",
                children: &[
                    NodeDef {
                        code: "LOCAL_EMPLOYMENT",
                        label: "4.1.1 Local employment",
                        children: &[leaf("FEMALE", "4.1.1.1 Female")],
                    },
                    NodeDef {
                        code: "OVERSEAS_EMPLOYMENT",
                        label: "4.1.2 Overseas employment",
                        children: &[leaf("FEMALE", "4.1.2.1 Female")],
                    },
                    NodeDef {
                        code: "SELF_EMPLOYMENT",
                        label: "4.1.3 Self-employment",
                        children: &[leaf("FEMALE", "4.1.3.1 Female")],
                    },
                    NodeDef {
                        code: "TRAINING",
                        label: "4.1.4 Training",
                        children: &[leaf("FEMALE", "4.1.4.1 Female")],
                    },
                ],
            },
            NodeDef {
                code: "SPES",
                label: "4.2 Special Program for Employment of Students (SPES)",
                children: &[leaf("FEMALE", "4.2.1 Female")],
            },
        ],
    },
];

// ============================================================================
// CONSTRUCTION
// ============================================================================

fn add_subtree(
    builder: &mut TaxonomyBuilder,
    parent: NodeId,
    def: &NodeDef,
) -> Result<(), TaxonomyError> {
    let id = builder.add_child(parent, def.code, def.label)?;
    for child in def.children {
        add_subtree(builder, id, child)?;
    }
    Ok(())
}

fn build_builtin() -> Result<TaxonomyRegistry, TaxonomyError> {
    let mut builder = TaxonomyBuilder::new(BUILTIN_VERSION);
    for program in PROGRAMS {
        let id = builder.add_program(program.code, program.label, program.total_label)?;
        for child in program.children {
            add_subtree(&mut builder, id, child)?;
        }
    }
    builder.finish()
}

static BUILTIN: Lazy<TaxonomyRegistry> =
    Lazy::new(|| build_builtin().expect("built-in taxonomy definition is well-formed"));

/// The process-wide built-in taxonomy. Built on first use, immutable
/// and shareable afterwards.
pub fn builtin() -> &'static TaxonomyRegistry {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathCodec, TaxonomyPath};

    #[test]
    fn test_builtin_builds() {
        let registry = builtin();
        assert_eq!(registry.version(), BUILTIN_VERSION);
        assert_eq!(registry.programs().len(), 4);
    }

    #[test]
    fn test_every_program_has_total_label() {
        let registry = builtin();
        for &program in registry.programs() {
            assert!(registry.node(program).total_label.is_some());
        }
    }

    #[test]
    fn test_gender_leaves_are_leaves() {
        let registry = builtin();
        for id in registry.canonical_order() {
            let node = registry.node(id);
            if node.is_gender_breakdown {
                assert!(node.is_leaf(), "{} is not a leaf", node.label);
                assert!(node.level >= 1, "{} has no parent figure", node.label);
            }
        }
    }

    #[test]
    fn test_known_paths_resolve() {
        let registry = builtin();
        let local = registry
            .resolve_codes(
                "JOB_VACANCIES",
                Some("REGULAR_PROGRAM"),
                Some("LOCAL_EMPLOYMENT"),
                None,
            )
            .expect("local employment resolves");
        assert_eq!(registry.node(local).label, "1.1.1 Local employment");
        assert!(registry.gender_child(local).is_some());

        assert!(registry
            .resolve_codes("APPLICANTS_PLACED", Some("SPES"), Some("FEMALE"), None)
            .is_some());
    }

    #[test]
    fn test_builtin_codec_roundtrip() {
        let registry = builtin();
        let codec = PathCodec::new(registry);
        for id in registry.canonical_order() {
            let path = registry.path_of(id);
            let numbering = codec.encode(&path).expect("encodes");
            assert_eq!(codec.decode(&numbering), Some(path));
        }
    }

    #[test]
    fn test_placed_local_employment_numbering() {
        let registry = builtin();
        let codec = PathCodec::new(registry);
        let path = TaxonomyPath::new(
            "APPLICANTS_PLACED",
            Some("REGULAR_PROGRAM"),
            Some("LOCAL_EMPLOYMENT"),
            None,
        );
        assert_eq!(codec.encode(&path).as_deref(), Some("4.1.1"));
    }
}
