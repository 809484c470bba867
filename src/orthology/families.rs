use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use crate::core::matrix::HomologMatrix;
use crate::core::types::{Member, OrthologFamily};

/// Families rooted at the genes of one organism, keyed by root gene
pub type OrganismFamilies = BTreeMap<String, OrthologFamily>;

/// True when `gene_a` (in `organism_a`) and `gene_b` (in `organism_b`) are
/// each other's best hit.
///
/// Symmetric by construction: swapping the two sides gives the same answer.
pub fn is_reciprocal(
    matrix: &HomologMatrix,
    organism_a: &str,
    gene_a: &str,
    organism_b: &str,
    gene_b: &str,
) -> bool {
    matrix.best_hit(organism_a, organism_b, gene_a) == Some(gene_b)
        && matrix.best_hit(organism_b, organism_a, gene_b) == Some(gene_a)
}

/// Derives reciprocal-best-hit families from a finished homolog matrix
pub struct OrthologFamilyBuilder<'a> {
    matrix: &'a HomologMatrix,
}

impl<'a> OrthologFamilyBuilder<'a> {
    pub fn new(matrix: &'a HomologMatrix) -> Self {
        Self { matrix }
    }

    /// Family rooted at `(gene, reference)`: the root plus its reciprocal
    /// partner in every other organism that has one
    pub fn family(&self, reference: &str, gene: &str) -> OrthologFamily {
        let mut family = OrthologFamily::new(Member::new(reference, gene));

        for target in self.matrix.organisms().filter(|t| *t != reference) {
            if let Some(partner) = self.matrix.best_hit(reference, target, gene) {
                if is_reciprocal(self.matrix, reference, gene, target, partner) {
                    family.insert(Member::new(target, partner));
                }
            }
        }

        family
    }

    /// Families rooted at every gene of `reference`, one per gene.
    ///
    /// Genes are processed in parallel; each family only reads the matrix.
    pub fn families_for(&self, reference: &str) -> OrganismFamilies {
        let genes: Vec<&str> = self.matrix.genes(reference).collect();
        genes
            .par_iter()
            .map(|gene| ((*gene).to_string(), self.family(reference, gene)))
            .collect()
    }
}

/// Families rooted in every organism of a matrix.
///
/// Built completely before any consistency check runs, and never modified
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct FamilyIndex {
    organism_count: usize,
    families: BTreeMap<String, OrganismFamilies>,
}

impl FamilyIndex {
    pub fn build(matrix: &HomologMatrix) -> Self {
        let builder = OrthologFamilyBuilder::new(matrix);
        let families: BTreeMap<String, OrganismFamilies> = matrix
            .organisms()
            .map(|organism| {
                let families = builder.families_for(organism);
                debug!(
                    "{organism}: {} families with at least one reciprocal partner",
                    families.values().filter(|f| f.len() > 1).count()
                );
                (organism.to_string(), families)
            })
            .collect();

        Self {
            organism_count: matrix.organism_count(),
            families,
        }
    }

    /// Number of organisms in the collection; a complete family has this many members
    pub fn organism_count(&self) -> usize {
        self.organism_count
    }

    pub fn family(&self, organism: &str, gene: &str) -> Option<&OrthologFamily> {
        self.families.get(organism).and_then(|f| f.get(gene))
    }

    pub fn families_of(&self, organism: &str) -> Option<&OrganismFamilies> {
        self.families.get(organism)
    }

    /// Families of `organism` with at least one reciprocal partner
    pub fn candidate_count(&self, organism: &str) -> usize {
        self.families
            .get(organism)
            .map_or(0, |f| f.values().filter(|family| family.len() > 1).count())
    }

    /// Families of `organism` with one member per organism
    pub fn complete_count(&self, organism: &str) -> usize {
        self.families.get(organism).map_or(0, |f| {
            f.values()
                .filter(|family| family.len() == self.organism_count)
                .count()
        })
    }
}
