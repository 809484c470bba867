//! Core data types for ortholog and core-genome detection.
//!
//! - [`BestHit`]: the best-hit verdict for one gene against one target organism
//! - [`Member`]: a gene qualified by the organism that owns it
//! - [`OrthologFamily`]: reciprocal-best-hit partners of a representative gene
//! - [`CoreGenome`]: reference organism -> sorted list of core gene identifiers
//! - [`HomologMatrix`]: every (reference, target) pair -> gene -> [`BestHit`]
//!
//! ## Matrix Layout
//!
//! The matrix is a nested mapping and serializes to JSON as
//! `organism -> organism -> gene -> subject-or-null`:
//!
//! ```json
//! {
//!   "Sco": { "Sco": { "Sco_1": "Sco_1" }, "Sgr": { "Sco_1": "Sgr_7" } },
//!   "Sgr": { "Sco": { "Sgr_7": "Sco_1" }, "Sgr": { "Sgr_7": "Sgr_7" } }
//! }
//! ```
//!
//! Self-pairs are never read from alignment data: a gene is always its own
//! best hit within its own organism.

pub mod matrix;
pub mod types;

pub use matrix::{GeneHits, HomologMatrix};
pub use types::{BestHit, CoreGenome, Member, OrthologFamily};
