//! Core data structures for k-mer based assembly.
//!
//! Counts are kept in a `BTreeMap` so every traversal visits k-mers in sorted
//! order. Vertex numbering and cycle discovery both follow from that order,
//! which makes assembly output reproducible for equal inputs.

use crate::core::error::{AssemblyError, AssemblyResult};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// K-mer multiplicities, all keys sharing one length `k`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, usize>", into = "BTreeMap<String, usize>")]
pub struct KmerCounts {
    counts: BTreeMap<String, usize>,
    k: usize,
}

impl KmerCounts {
    /// Smallest k for which (k-1)-mer vertices are non-empty
    pub const MIN_K: usize = 2;

    /// Build a validated count table. Repeated keys have their counts summed.
    pub fn new<I, S>(entries: I) -> AssemblyResult<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (kmer, count) in entries {
            let kmer = kmer.into();
            let total = counts.get(&kmer).copied().unwrap_or(0);
            let Some(total) = total.checked_add(count) else {
                return Err(AssemblyError::MultiplicityOverflow { kmer });
            };
            counts.insert(kmer, total);
        }
        Self::from_map(counts)
    }

    fn from_map(counts: BTreeMap<String, usize>) -> AssemblyResult<Self> {
        let mut k = None;
        // Edge total must fit in usize as well
        let mut total: usize = 0;
        for (kmer, &count) in &counts {
            let len = kmer.chars().count();
            if len < Self::MIN_K {
                return Err(AssemblyError::KmerTooShort {
                    kmer: kmer.clone(),
                    min_k: Self::MIN_K,
                });
            }
            match k {
                None => k = Some(len),
                Some(expected) if expected != len => {
                    return Err(AssemblyError::InconsistentKmerLength {
                        kmer: kmer.clone(),
                        expected,
                        found: len,
                    });
                }
                Some(_) => {}
            }
            if count == 0 {
                return Err(AssemblyError::ZeroMultiplicity { kmer: kmer.clone() });
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| AssemblyError::MultiplicityOverflow { kmer: kmer.clone() })?;
        }

        let k = k.ok_or(AssemblyError::EmptyInput)?;
        Ok(Self { counts, k })
    }

    /// K-mer spectrum of a single sequence: every length-`k` substring with
    /// the number of times it occurs.
    pub fn from_sequence(sequence: &str, k: usize) -> AssemblyResult<Self> {
        if k < Self::MIN_K {
            return Err(AssemblyError::KmerTooShort {
                kmer: sequence.chars().take(k).collect(),
                min_k: Self::MIN_K,
            });
        }

        let symbols: Vec<char> = sequence.chars().collect();
        if symbols.len() < k {
            return Err(AssemblyError::SequenceTooShort {
                len: symbols.len(),
                k,
            });
        }

        Self::new(
            symbols
                .windows(k)
                .map(|window| (window.iter().collect::<String>(), 1)),
        )
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of distinct k-mers
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all multiplicities, i.e. the number of edges in the De Bruijn graph
    pub fn total_multiplicity(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn get(&self, kmer: &str) -> Option<usize> {
        self.counts.get(kmer).copied()
    }

    /// Iterate `(k-mer, multiplicity)` pairs in sorted k-mer order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(kmer, &count)| (kmer.as_str(), count))
    }
}

impl TryFrom<BTreeMap<String, usize>> for KmerCounts {
    type Error = AssemblyError;

    fn try_from(counts: BTreeMap<String, usize>) -> AssemblyResult<Self> {
        Self::from_map(counts)
    }
}

impl From<KmerCounts> for BTreeMap<String, usize> {
    fn from(counts: KmerCounts) -> Self {
        counts.counts
    }
}

/// Split a k-mer into its (k-1)-mer prefix and suffix
pub fn prefix_suffix(kmer: &str) -> (&str, &str) {
    let prefix_end = kmer.char_indices().last().map(|(i, _)| i).unwrap_or(0);
    let suffix_start = kmer
        .chars()
        .next()
        .map(|c| c.len_utf8())
        .unwrap_or(0);
    (&kmer[..prefix_end], &kmer[suffix_start..])
}

/// Ordered set of distinct (k-1)-mers; a vertex id is a position in this index
#[derive(Debug, Clone, Default)]
pub struct KmerIndex {
    labels: Vec<String>,
    lookup: AHashMap<String, usize>,
}

impl KmerIndex {
    /// Collect every prefix and suffix in first-encounter order, walking the
    /// k-mers in sorted order and taking each prefix before its suffix.
    pub fn from_counts(counts: &KmerCounts) -> Self {
        let mut index = Self::default();
        for (kmer, _) in counts.iter() {
            let (prefix, suffix) = prefix_suffix(kmer);
            index.insert(prefix);
            index.insert(suffix);
        }
        index
    }

    /// Return the vertex id for `label`, adding it if unseen
    pub fn insert(&mut self, label: &str) -> usize {
        if let Some(&vertex) = self.lookup.get(label) {
            return vertex;
        }
        let vertex = self.labels.len();
        self.labels.push(label.to_string());
        self.lookup.insert(label.to_string(), vertex);
        vertex
    }

    pub fn vertex_of(&self, label: &str) -> Option<usize> {
        self.lookup.get(label).copied()
    }

    pub fn label(&self, vertex: usize) -> Option<&str> {
        self.labels.get(vertex).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Spell a walk: the first label in full, then the last symbol of each
    /// following label. Returns `None` if the walk is empty or names an
    /// unknown vertex.
    pub fn spell(&self, walk: &[usize]) -> Option<String> {
        let (&first, rest) = walk.split_first()?;
        let mut sequence = self.label(first)?.to_string();
        sequence.reserve(rest.len());
        for &vertex in rest {
            sequence.push(self.label(vertex)?.chars().last()?);
        }
        Some(sequence)
    }
}

/// Edge inserted to close a near-Eulerian graph into an Eulerian one.
///
/// `source` is the vertex short one outgoing edge, `target` the vertex short
/// one incoming edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyntheticEdge {
    pub source: usize,
    pub target: usize,
}

impl fmt::Display for SyntheticEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {})", self.source, self.target)
    }
}

/// Outcome of a successful assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    /// Assembled superstring
    pub sequence: String,
    pub k: usize,
    /// Distinct (k-1)-mers
    pub num_vertices: usize,
    /// Input k-mer occurrences (synthetic edge excluded)
    pub num_edges: usize,
    /// Edge-disjoint cycles found before joining
    pub num_cycles: usize,
    pub synthetic_edge: Option<SyntheticEdge>,
    /// True when the k-mers already formed a closed circuit
    pub circular: bool,
}
