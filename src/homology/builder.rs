use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::matrix::{GeneHits, HomologMatrix};
use crate::parsing::blast::{HitRecordParser, HitThresholds, ParseError};
use crate::parsing::pair::PairFile;
use crate::utils::validation::{validate_thresholds, ValidationError};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No eligible alignment result files ('<ref>-vs-<tar>.bl') found in {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    InvalidThresholds(#[from] ValidationError),
}

/// An organism pair whose alignment results could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedPair {
    pub reference: String,
    pub target: String,
    /// Where the results came from (file path, or a label for in-memory input)
    pub source: String,
    pub reason: String,
}

/// Output of the homolog phase
#[derive(Debug, Clone)]
pub struct HomologReport {
    pub matrix: HomologMatrix,
    /// Pairs that failed to parse; their slots hold only `NoHit`
    pub degraded: Vec<DegradedPair>,
    /// Number of result files that were parsed (degraded ones included)
    pub parsed: usize,
}

/// One unit of parsing work
struct PairInput<'a> {
    reference: String,
    target: String,
    source: String,
    content: PairContent<'a>,
}

enum PairContent<'a> {
    File(&'a PairFile),
    Text(&'a str),
}

/// Builds the complete best-hit matrix for an organism collection
#[derive(Debug, Clone, Copy)]
pub struct HomologMatrixBuilder {
    parser: HitRecordParser,
}

impl HomologMatrixBuilder {
    /// # Errors
    ///
    /// Returns `BuildError::InvalidThresholds` if a threshold is negative or not finite.
    pub fn new(thresholds: HitThresholds) -> Result<Self, BuildError> {
        validate_thresholds(&thresholds)?;
        Ok(Self {
            parser: HitRecordParser::new(thresholds),
        })
    }

    /// Find the eligible result files in `dir`, sorted by path.
    ///
    /// Files that do not follow the `<ref>-vs-<tar>.bl` convention are skipped.
    /// When the same pair appears twice (e.g. `.bl` and `.bl.gz`), the first
    /// path in sort order wins.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Io` if the directory cannot be listed.
    pub fn discover(dir: &Path) -> Result<Vec<PairFile>, BuildError> {
        let io_err = |source| BuildError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() {
                continue;
            }
            match PairFile::from_path(&path) {
                Some(pair) => files.push(pair),
                None => debug!("Ignoring {}", path.display()),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut seen = BTreeSet::new();
        files.retain(|pair| {
            let first = seen.insert((pair.reference.clone(), pair.target.clone()));
            if !first {
                warn!(
                    "Duplicate results for {} vs {}, ignoring {}",
                    pair.reference,
                    pair.target,
                    pair.path.display()
                );
            }
            first
        });

        Ok(files)
    }

    /// Build the matrix from every eligible file in `dir`
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Io` if the directory cannot be listed, or
    /// `BuildError::MissingInput` if it holds no eligible file.
    pub fn build_from_dir(&self, dir: &Path) -> Result<HomologReport, BuildError> {
        let files = Self::discover(dir)?;
        if files.is_empty() {
            return Err(BuildError::MissingInput(dir.to_path_buf()));
        }
        info!("Found {} alignment result files in {}", files.len(), dir.display());
        Ok(self.build_from_files(&files))
    }

    /// Build the matrix from already discovered files.
    ///
    /// Self-pair files only register their organism; their content is never read.
    pub fn build_from_files(&self, files: &[PairFile]) -> HomologReport {
        let inputs = files
            .iter()
            .map(|pair| PairInput {
                reference: pair.reference.clone(),
                target: pair.target.clone(),
                source: pair.path.display().to_string(),
                content: PairContent::File(pair),
            })
            .collect();
        self.build(inputs)
    }

    /// Build the matrix from in-memory result blocks given as `(reference, target, text)`
    pub fn build_from_texts<'a>(
        &self,
        blocks: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> HomologReport {
        let inputs = blocks
            .into_iter()
            .map(|(reference, target, text)| PairInput {
                reference: reference.to_string(),
                target: target.to_string(),
                source: format!("{reference}-vs-{target}"),
                content: PairContent::Text(text),
            })
            .collect();
        self.build(inputs)
    }

    fn build(&self, inputs: Vec<PairInput<'_>>) -> HomologReport {
        let organisms: BTreeSet<String> = inputs
            .iter()
            .flat_map(|input| [input.reference.clone(), input.target.clone()])
            .collect();

        let (self_pairs, inputs): (Vec<_>, Vec<_>) = inputs
            .into_iter()
            .partition(|input| input.reference == input.target);
        for input in &self_pairs {
            debug!("Skipping self comparison {}", input.source);
        }

        info!(
            "Determining homologs for {} organisms from {} result blocks",
            organisms.len(),
            inputs.len()
        );

        // Each worker owns its (reference, target) slot; results are merged below
        let results: Vec<(PairInput<'_>, Result<GeneHits, ParseError>)> = inputs
            .into_par_iter()
            .map(|input| {
                let result = self.parse_input(&input);
                (input, result)
            })
            .collect();

        let mut slots = Vec::with_capacity(results.len());
        let mut degraded = Vec::new();
        let parsed = results.len();

        for (input, result) in results {
            match result {
                Ok(hits) => {
                    debug!(
                        "{} vs {}: {} queries from {}",
                        input.reference,
                        input.target,
                        hits.len(),
                        input.source
                    );
                    slots.push(((input.reference, input.target), hits));
                }
                Err(e) => {
                    warn!(
                        "Skipping {} vs {} ({}): {e}",
                        input.reference, input.target, input.source
                    );
                    degraded.push(DegradedPair {
                        reference: input.reference,
                        target: input.target,
                        source: input.source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let matrix = HomologMatrix::assemble(organisms, slots);
        for organism in matrix.organisms() {
            info!("{organism}: {} genes", matrix.gene_count(organism));
        }

        HomologReport {
            matrix,
            degraded,
            parsed,
        }
    }

    fn parse_input(&self, input: &PairInput<'_>) -> Result<GeneHits, ParseError> {
        match input.content {
            PairContent::File(pair) => self.parser.parse_reader(pair.open()?),
            PairContent::Text(text) => self.parser.parse_text(text),
        }
    }
}
