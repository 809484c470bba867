//! Ortholog family construction and core-genome selection.
//!
//! ## Algorithm
//!
//! 1. **Reciprocal best hits**: genes `g` in A and `h` in B are orthologs when
//!    each is the other's best hit ([`is_reciprocal`])
//! 2. **Families**: for every organism R and gene `g` in R, the family rooted at
//!    `(g, R)` holds `g` plus its reciprocal partner in each other organism
//!    ([`OrthologFamilyBuilder`], [`FamilyIndex`])
//! 3. **Core selection**: `g` is a core gene of R when its family has one member
//!    per organism ([`is_complete`]) and every member sees the very same family
//!    from its own point of view ([`is_mutually_consistent`])
//!
//! Families of every organism are built before any core check runs, because a
//! check reads families rooted in other organisms.
//!
//! ## Known Limitation
//!
//! Gene duplications are not resolved. When several genes of one organism
//! compete for the same reciprocal partner, at most one of them can be
//! reciprocal and the member families disagree, so the whole cluster is left
//! out of the core genome.
//!
//! ## Example
//!
//! ```rust
//! use core_genome::orthology::{CoreConsistencyChecker, FamilyIndex};
//! use core_genome::HomologMatrix;
//!
//! let json = r#"{
//!     "A": {"B": {"a1": "b1"}},
//!     "B": {"A": {"b1": "a1"}}
//! }"#;
//! let matrix: HomologMatrix = serde_json::from_str(json).unwrap();
//!
//! let index = FamilyIndex::build(&matrix);
//! let checker = CoreConsistencyChecker::new(&matrix, &index);
//! let core = checker.core_genome(Some("A")).unwrap();
//! assert_eq!(core.get("A").unwrap(), ["a1"]);
//! ```

pub mod consistency;
pub mod families;

pub use consistency::{
    is_complete, is_mutually_consistent, CoreConsistencyChecker, CoreError, ReferenceSummary,
};
pub use families::{is_reciprocal, FamilyIndex, OrthologFamilyBuilder};
