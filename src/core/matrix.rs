use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::BestHit;

/// Best hit of every gene of a reference organism against one target organism
pub type GeneHits = BTreeMap<String, BestHit>;

/// Best hits for every ordered pair of organisms, self-pairs included.
///
/// A matrix is always complete: every organism appears as a reference and as a
/// target of every other organism, and every gene of a reference is a key in
/// each of its slots. The gene set of an organism is the key set of its
/// self-pair slot, where every gene maps to itself.
///
/// Deserialization re-establishes these guarantees, so a matrix loaded from disk
/// behaves exactly like the one that was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HomologMatrix {
    pairs: BTreeMap<String, BTreeMap<String, GeneHits>>,
}

impl HomologMatrix {
    /// Assemble a complete matrix from parsed (reference, target) slots.
    ///
    /// `organisms` lists every organism in the collection, including those that
    /// only ever appear as a target. Slots that are missing from `slots` are
    /// treated as if every lookup produced [`BestHit::NoHit`]. A self-pair slot
    /// in `slots` only contributes its genes; its hits are replaced by identity.
    pub fn assemble(
        organisms: impl IntoIterator<Item = String>,
        slots: impl IntoIterator<Item = ((String, String), GeneHits)>,
    ) -> Self {
        let mut pairs: BTreeMap<String, BTreeMap<String, GeneHits>> = organisms
            .into_iter()
            .map(|organism| (organism, BTreeMap::new()))
            .collect();

        for ((reference, target), hits) in slots {
            pairs.entry(target.clone()).or_default();
            pairs.entry(reference).or_default().insert(target, hits);
        }

        Self { pairs }.completed()
    }

    /// Pad every slot and rebuild self-pairs from the union of known genes
    fn completed(mut self) -> Self {
        let mut organisms: BTreeSet<String> = BTreeSet::new();
        for (reference, targets) in &self.pairs {
            organisms.insert(reference.clone());
            organisms.extend(targets.keys().cloned());
        }

        for organism in &organisms {
            let targets = self.pairs.entry(organism.clone()).or_default();

            let genes: BTreeSet<String> = targets
                .values()
                .flat_map(|hits| hits.keys().cloned())
                .collect();

            for target in &organisms {
                let slot = targets.entry(target.clone()).or_default();
                if target == organism {
                    *slot = genes
                        .iter()
                        .map(|gene| (gene.clone(), BestHit::Gene(gene.clone())))
                        .collect();
                } else {
                    for gene in &genes {
                        slot.entry(gene.clone()).or_insert(BestHit::NoHit);
                    }
                }
            }
        }

        self
    }

    /// Organisms of the collection, sorted by name
    pub fn organisms(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    pub fn organism_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn contains_organism(&self, organism: &str) -> bool {
        self.pairs.contains_key(organism)
    }

    /// Genes of `organism`, sorted by identifier. Empty for unknown organisms.
    pub fn genes<'a>(&'a self, organism: &str) -> impl Iterator<Item = &'a str> {
        self.hits(organism, organism)
            .into_iter()
            .flat_map(|hits| hits.keys().map(String::as_str))
    }

    pub fn gene_count(&self, organism: &str) -> usize {
        self.hits(organism, organism).map_or(0, BTreeMap::len)
    }

    /// The slot for an ordered organism pair
    pub fn hits(&self, reference: &str, target: &str) -> Option<&GeneHits> {
        self.pairs.get(reference).and_then(|targets| targets.get(target))
    }

    /// Best hit of `gene` (in `reference`) among the genes of `target`.
    ///
    /// Returns `None` both for [`BestHit::NoHit`] and for lookups that fall
    /// outside the matrix; callers never need to tell the two apart.
    pub fn best_hit(&self, reference: &str, target: &str, gene: &str) -> Option<&str> {
        self.hits(reference, target)
            .and_then(|hits| hits.get(gene))
            .and_then(BestHit::gene)
    }

    /// Number of genes of `reference` with a qualifying hit in `target`
    pub fn hit_count(&self, reference: &str, target: &str) -> usize {
        self.hits(reference, target)
            .map_or(0, |hits| hits.values().filter(|hit| hit.is_hit()).count())
    }
}

impl<'de> Deserialize<'de> for HomologMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = BTreeMap::<String, BTreeMap<String, GeneHits>>::deserialize(deserializer)?;
        Ok(Self { pairs }.completed())
    }
}
