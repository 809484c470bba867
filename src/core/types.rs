use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Best hit of a query gene against the genes of a target organism
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum BestHit {
    /// Subject gene in the target organism that passed every threshold
    Gene(String),
    /// No hit reported, or the first hit failed a threshold
    NoHit,
}

impl BestHit {
    pub fn gene(&self) -> Option<&str> {
        match self {
            Self::Gene(gene) => Some(gene),
            Self::NoHit => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Gene(_))
    }
}

impl From<Option<String>> for BestHit {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NoHit, Self::Gene)
    }
}

impl From<BestHit> for Option<String> {
    fn from(value: BestHit) -> Self {
        match value {
            BestHit::Gene(gene) => Some(gene),
            BestHit::NoHit => None,
        }
    }
}

/// A gene qualified by its owning organism.
///
/// Ordering is by organism first so that a family iterates one organism at a time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Member {
    pub organism: String,
    pub gene: String,
}

impl Member {
    pub fn new(organism: impl Into<String>, gene: impl Into<String>) -> Self {
        Self {
            organism: organism.into(),
            gene: gene.into(),
        }
    }
}

/// Reciprocal-best-hit partners of a representative gene, at most one per organism.
///
/// The representative (root) is always a member. Families are built once by
/// the family builder and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrthologFamily {
    root: Member,
    members: BTreeSet<Member>,
}

impl OrthologFamily {
    pub fn new(root: Member) -> Self {
        let members = BTreeSet::from([root.clone()]);
        Self { root, members }
    }

    pub(crate) fn insert(&mut self, member: Member) {
        self.members.insert(member);
    }

    pub fn root(&self) -> &Member {
        &self.root
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Number of members, the root included
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains(member)
    }

    /// Check membership without allocating a [`Member`]
    pub fn contains_gene(&self, organism: &str, gene: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.organism == organism && m.gene == gene)
    }

    /// The member contributed by `organism`, if any
    pub fn member_in(&self, organism: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.organism == organism)
            .map(|m| m.gene.as_str())
    }

    pub fn is_subset_of(&self, other: &OrthologFamily) -> bool {
        self.members.is_subset(&other.members)
    }
}

/// Core genome per reference organism.
///
/// Gene lists are sorted by identifier so the artifact does not depend on
/// the order candidates were evaluated in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreGenome {
    by_reference: BTreeMap<String, Vec<String>>,
}

impl CoreGenome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, mut genes: Vec<String>) {
        genes.sort();
        genes.dedup();
        self.by_reference.insert(reference.into(), genes);
    }

    pub fn get(&self, reference: &str) -> Option<&[String]> {
        self.by_reference.get(reference).map(Vec::as_slice)
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.by_reference.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_reference
            .iter()
            .map(|(reference, genes)| (reference.as_str(), genes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_reference.is_empty()
    }
}
