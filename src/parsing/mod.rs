//! Parsers for pairwise alignment results.
//!
//! - **blast**: tabular BLAST output (`-outfmt 7`, comment lines included), one
//!   best-hit verdict per query gene
//! - **pair**: the `<ref>-vs-<tar>.bl` naming convention that ties a result file
//!   to an ordered organism pair
//!
//! ## Expected Columns
//!
//! The search must be run with
//! `-outfmt '7 qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore qlen slen gaps'`.
//! Only these columns are read:
//!
//! | Index | Column | Use |
//! |-------|--------|-----|
//! | 0  | qseqid | Query gene |
//! | 1  | sseqid | Subject gene |
//! | 2  | pident | Identity threshold |
//! | 3  | length | Coverage threshold |
//! | 10 | evalue | E-value threshold |
//! | 12 | qlen   | Coverage and length variation |
//! | 13 | slen   | Coverage and length variation |
//!
//! ## Example
//!
//! ```rust
//! use core_genome::parsing::blast::{HitRecordParser, HitThresholds};
//!
//! let text = "# Query: a1\n\
//!             a1\tb1\t85.0\t290\t0\t0\t1\t300\t1\t300\t1e-50\t500\t300\t310\t0\n";
//! let hits = HitRecordParser::new(HitThresholds::default()).parse_text(text).unwrap();
//! assert_eq!(hits["a1"].gene(), Some("b1"));
//! ```

pub mod blast;
pub mod pair;
