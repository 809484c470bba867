//! Construction of the homolog matrix from a directory of alignment results.
//!
//! [`HomologMatrixBuilder`] discovers every `<ref>-vs-<tar>.bl` file, parses the
//! files in parallel, and assembles a complete [`HomologMatrix`](crate::HomologMatrix):
//!
//! 1. **Discovery**: eligible file names define the organism collection
//! 2. **Parsing**: one [`HitRecordParser`](crate::parsing::blast::HitRecordParser)
//!    run per ordered pair; each worker owns its pair's slot
//! 3. **Assembly**: slots are merged once, self-pairs are synthesized, and
//!    missing genes are padded with `NoHit`
//!
//! A file that fails to parse does not abort the build. Its pair is reported
//! as a [`DegradedPair`] and contributes no hits.

pub mod builder;

pub use builder::{BuildError, DegradedPair, HomologMatrixBuilder, HomologReport};
