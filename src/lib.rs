//! # core-genome
//!
//! A library for detecting orthologs and the core genome of a collection of
//! organisms from all-vs-all BLAST results.
//!
//! Comparative genomics studies often start from the genes that every member of
//! a species or genus shares. `core-genome` derives them from pairwise protein
//! or nucleotide searches: a gene is part of the core genome of a reference
//! organism when it has exactly one reciprocal-best-hit ortholog in every other
//! organism, and every one of those orthologs agrees on the same family.
//!
//! ## Pipeline
//!
//! - **Homolog phase**: parse every `<ref>-vs-<tar>.bl` file into the best hit
//!   of each gene, applying identity, coverage, e-value and length thresholds
//! - **Family phase**: pair up reciprocal best hits into one family per gene
//! - **Core phase**: keep the genes whose family is complete and consistent
//!
//! Paralogs are not resolved: a family that is duplicated in any organism is
//! left out of the core genome.
//!
//! ## Example
//!
//! ```rust,no_run
//! use core_genome::{CoreConsistencyChecker, FamilyIndex, HitThresholds, HomologMatrixBuilder};
//! use std::path::Path;
//!
//! let builder = HomologMatrixBuilder::new(HitThresholds::default()).unwrap();
//! let report = builder.build_from_dir(Path::new("blast_results")).unwrap();
//!
//! let index = FamilyIndex::build(&report.matrix);
//! let checker = CoreConsistencyChecker::new(&report.matrix, &index);
//! let core = checker.core_genome(None).unwrap();
//!
//! for (organism, genes) in core.iter() {
//!     println!("{organism}: {} core genes", genes.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Best hits, families, the homolog matrix and the core genome
//! - [`parsing`]: BLAST tabular output and result file naming
//! - [`homology`]: Homolog matrix construction
//! - [`orthology`]: Ortholog families and the core-genome consistency check
//! - [`store`]: JSON persistence of run artifacts
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod homology;
pub mod orthology;
pub mod parsing;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::matrix::HomologMatrix;
pub use crate::core::types::*;
pub use homology::builder::{BuildError, HomologMatrixBuilder, HomologReport};
pub use orthology::{CoreConsistencyChecker, CoreError, FamilyIndex, OrthologFamilyBuilder};
pub use parsing::blast::{HitRecordParser, HitThresholds, ParseError};
