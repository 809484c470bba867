use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::matrix::HomologMatrix;
use crate::core::types::{CoreGenome, Member, OrthologFamily};
use crate::orthology::families::FamilyIndex;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid reference organism '{0}': not present in the homolog data")]
    InvalidReference(String),
}

/// A family is complete when it has exactly one member per organism
pub fn is_complete(family: &OrthologFamily, organism_count: usize) -> bool {
    family.len() == organism_count
}

/// Every member of `family` agrees on it.
///
/// For each member `(h, T)`:
/// - the family rooted at `(h, T)` is complete and contains the root of `family`
/// - for every organism E, the best hit of `h` in E is a member of `family`,
///   and the family rooted at that best hit lies within `family`
///
/// A spurious family built by best-hit selection (an ambiguous many-to-one
/// match) fails one of these from some member's point of view.
pub fn is_mutually_consistent(
    family: &OrthologFamily,
    index: &FamilyIndex,
    matrix: &HomologMatrix,
) -> bool {
    family.members().all(|member| {
        member_agrees(family, member, index) && best_hits_closed(family, member, index, matrix)
    })
}

/// The family rooted at `member` is complete and includes the root of `family`
fn member_agrees(family: &OrthologFamily, member: &Member, index: &FamilyIndex) -> bool {
    index
        .family(&member.organism, &member.gene)
        .is_some_and(|view| {
            is_complete(view, index.organism_count()) && view.contains(family.root())
        })
}

/// Best hits of `member` land inside `family`, as do the families rooted there
fn best_hits_closed(
    family: &OrthologFamily,
    member: &Member,
    index: &FamilyIndex,
    matrix: &HomologMatrix,
) -> bool {
    matrix.organisms().all(|organism| {
        let Some(hit) = matrix.best_hit(&member.organism, organism, &member.gene) else {
            return false;
        };
        family.contains_gene(organism, hit)
            && index
                .family(organism, hit)
                .is_some_and(|view| view.is_subset_of(family))
    })
}

/// Per-reference statistics of a core-genome computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub reference: String,
    pub genes: usize,
    /// Families with at least one reciprocal partner
    pub candidate_families: usize,
    /// Families with one member per organism
    pub complete_families: usize,
    pub core_genes: usize,
}

/// Selects the core genome of one or every reference organism
pub struct CoreConsistencyChecker<'a> {
    matrix: &'a HomologMatrix,
    index: &'a FamilyIndex,
}

impl<'a> CoreConsistencyChecker<'a> {
    /// `index` must have been built from `matrix`
    pub fn new(matrix: &'a HomologMatrix, index: &'a FamilyIndex) -> Self {
        Self { matrix, index }
    }

    /// Whether the family rooted at `(gene, reference)` belongs to the core genome
    pub fn accepts(&self, family: &OrthologFamily) -> bool {
        is_complete(family, self.index.organism_count())
            && is_mutually_consistent(family, self.index, self.matrix)
    }

    /// Core genes of `reference`, sorted by identifier.
    ///
    /// Candidates are checked independently and in parallel; the decision for
    /// one never depends on another.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidReference` if `reference` is not in the matrix.
    pub fn core_for(&self, reference: &str) -> Result<Vec<String>, CoreError> {
        if !self.matrix.contains_organism(reference) {
            return Err(CoreError::InvalidReference(reference.to_string()));
        }

        let Some(families) = self.index.families_of(reference) else {
            return Ok(Vec::new());
        };

        let mut core: Vec<String> = families
            .par_iter()
            .filter(|(_, family)| self.accepts(family))
            .map(|(gene, _)| gene.clone())
            .collect();
        core.sort();

        info!(
            "{reference}: {} core genes out of {} genes",
            core.len(),
            self.matrix.gene_count(reference)
        );
        Ok(core)
    }

    /// Core genome of `reference`, or of every organism when `None`
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidReference` if `reference` is not in the matrix.
    pub fn core_genome(&self, reference: Option<&str>) -> Result<CoreGenome, CoreError> {
        let references: Vec<&str> = match reference {
            Some(reference) => vec![reference],
            None => self.matrix.organisms().collect(),
        };

        let mut core = CoreGenome::new();
        for reference in references {
            core.insert(reference, self.core_for(reference)?);
        }
        Ok(core)
    }

    /// Statistics for every reference present in `core`
    pub fn summarize(&self, core: &CoreGenome) -> Vec<ReferenceSummary> {
        core.iter()
            .map(|(reference, genes)| ReferenceSummary {
                reference: reference.to_string(),
                genes: self.matrix.gene_count(reference),
                candidate_families: self.index.candidate_count(reference),
                complete_families: self.index.complete_count(reference),
                core_genes: genes.len(),
            })
            .collect()
    }
}
