//! De Bruijn Graph Assembler
//! =========================
//!
//! Reconstructs a superstring from k-mer counts:
//! - every distinct (k-1)-mer becomes a vertex
//! - every k-mer occurrence becomes an edge from its prefix to its suffix
//! - a near-Eulerian graph is closed with one synthetic edge
//! - the Eulerian circuit is opened again at the synthetic edge and spelled
//!
//! Inputs that do not describe a single connected, (near-)Eulerian graph are
//! rejected; no partial assembly is ever returned.

use crate::assembly::balance::create_fake_edge;
use crate::assembly::eulerian::{decompose_into_cycles, join_cycles};
use crate::assembly::multigraph::Multigraph;
use crate::core::data_structures::{prefix_suffix, Assembly, KmerCounts, KmerIndex, SyntheticEdge};
use crate::core::error::{AssemblyError, AssemblyResult};
use crate::utils::configuration::AssemblySettings;
use tracing::{debug, info};

/// Assembler driven by [`AssemblySettings`]
#[derive(Debug, Clone, Default)]
pub struct DeBruijnAssembler {
    settings: AssemblySettings,
}

impl DeBruijnAssembler {
    pub fn new(settings: AssemblySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AssemblySettings {
        &self.settings
    }

    /// Assemble `counts` into a superstring containing every k-mer exactly as
    /// many times as its multiplicity.
    pub fn assemble(&self, counts: &KmerCounts) -> AssemblyResult<Assembly> {
        self.validate(counts)?;

        let index = KmerIndex::from_counts(counts);
        let mut graph = build_graph(counts, &index);
        let num_edges = graph.num_edges();
        info!(
            "🧬 De Bruijn graph: k={}, {} vertices, {} edges",
            counts.k(),
            index.len(),
            num_edges
        );

        let components = graph.weakly_connected_components();
        if components > 1 {
            return Err(AssemblyError::DisconnectedGraph { components });
        }

        let synthetic_edge = create_fake_edge(&mut graph)?;

        let cycles = decompose_into_cycles(&mut graph, 0)?;
        let num_cycles = cycles.len();
        debug!("decomposed graph into {} cycle(s)", num_cycles);

        let mut walk = join_cycles(cycles)?;
        if let Some(edge) = synthetic_edge {
            walk = open_at_synthetic_edge(walk, edge);
        }

        // A non-empty count table always yields a non-empty walk
        let sequence = index.spell(&walk).ok_or(AssemblyError::EmptyInput)?;
        debug_assert_eq!(
            sequence.chars().count(),
            counts.k() - 1 + counts.total_multiplicity()
        );

        info!(
            "✅ Assembled {} bp from {} k-mer occurrence(s) in {} cycle(s)",
            sequence.chars().count(),
            num_edges,
            num_cycles
        );

        Ok(Assembly {
            sequence,
            k: counts.k(),
            num_vertices: index.len(),
            num_edges,
            num_cycles,
            synthetic_edge,
            circular: synthetic_edge.is_none(),
        })
    }

    fn validate(&self, counts: &KmerCounts) -> AssemblyResult<()> {
        if counts.k() < self.settings.min_k {
            let kmer = counts
                .iter()
                .next()
                .map(|(kmer, _)| kmer.to_string())
                .unwrap_or_default();
            return Err(AssemblyError::KmerTooShort {
                kmer,
                min_k: self.settings.min_k,
            });
        }

        if let Some(alphabet) = &self.settings.alphabet {
            for (kmer, _) in counts.iter() {
                if let Some(symbol) = kmer.chars().find(|c| !alphabet.contains(*c)) {
                    return Err(AssemblyError::InvalidSymbol {
                        kmer: kmer.to_string(),
                        symbol,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Add one edge per k-mer occurrence, from its prefix vertex to its suffix
/// vertex, in sorted k-mer order
pub fn build_graph(counts: &KmerCounts, index: &KmerIndex) -> Multigraph {
    let mut graph = Multigraph::new(index.len());
    for (kmer, multiplicity) in counts.iter() {
        let (prefix, suffix) = prefix_suffix(kmer);
        if let (Some(from), Some(to)) = (index.vertex_of(prefix), index.vertex_of(suffix)) {
            for _ in 0..multiplicity {
                graph.add_edge(from, to);
            }
        }
    }
    graph
}

/// Turn the closed walk over real and synthetic edges into an open walk over
/// real edges only: drop the closing vertex, then rotate so the walk starts
/// right after the first `source -> target` step.
///
/// If that step only exists across the wrap-around (last vertex back to the
/// first) the open walk already starts after it.
pub fn open_at_synthetic_edge(mut walk: Vec<usize>, edge: SyntheticEdge) -> Vec<usize> {
    walk.pop();
    let split = walk
        .windows(2)
        .position(|pair| pair[0] == edge.source && pair[1] == edge.target)
        .map_or(0, |position| position + 1);
    walk.rotate_left(split);
    walk
}

/// Assemble with default settings and return only the superstring
pub fn assemble(counts: &KmerCounts) -> AssemblyResult<String> {
    DeBruijnAssembler::default()
        .assemble(counts)
        .map(|assembly| assembly.sequence)
}

/// Assemble `(k-mer, multiplicity)` pairs with default settings
pub fn assemble_kmers<I, S>(kmers: I) -> AssemblyResult<String>
where
    I: IntoIterator<Item = (S, usize)>,
    S: Into<String>,
{
    assemble(&KmerCounts::new(kmers)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> KmerCounts {
        KmerCounts::new(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_build_graph_parallel_edges() {
        let counts = counts(&[("ACG", 2), ("CGT", 1)]);
        let index = KmerIndex::from_counts(&counts);
        let graph = build_graph(&counts, &index);

        assert_eq!(graph.num_vertices(), 3);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 1), (1, 2)]);
    }

    #[test]
    fn test_linear_assembly_is_deterministic() {
        let counts = counts(&[("AAT", 1), ("ATG", 1), ("TGA", 1), ("GAA", 1), ("GAT", 1)]);
        let assembly = DeBruijnAssembler::default().assemble(&counts).unwrap();

        assert_eq!(assembly.sequence, "GATGAAT");
        assert_eq!(assembly.num_vertices, 4);
        assert_eq!(assembly.num_edges, 5);
        assert_eq!(assembly.num_cycles, 2);
        assert_eq!(
            assembly.synthetic_edge,
            Some(SyntheticEdge { source: 1, target: 3 })
        );
        assert!(!assembly.circular);
    }

    #[test]
    fn test_self_loops() {
        assert_eq!(assemble(&counts(&[("AAAA", 3)])).unwrap(), "AAAAAA");
    }

    #[test]
    fn test_circular_input() {
        // ACGT read around a circle: ACG CGT GTA TAC
        let counts = counts(&[("ACG", 1), ("CGT", 1), ("GTA", 1), ("TAC", 1)]);
        let assembly = DeBruijnAssembler::default().assemble(&counts).unwrap();

        assert!(assembly.circular);
        assert_eq!(assembly.synthetic_edge, None);
        assert_eq!(assembly.sequence, "ACGTAC");
    }

    #[test]
    fn test_open_at_synthetic_edge() {
        let edge = SyntheticEdge { source: 1, target: 3 };
        assert_eq!(
            open_at_synthetic_edge(vec![0, 1, 3, 1, 2, 3, 0], edge),
            vec![3, 1, 2, 3, 0, 1]
        );
        // Synthetic step closes the circuit
        assert_eq!(
            open_at_synthetic_edge(vec![3, 0, 1, 3], edge),
            vec![3, 0, 1]
        );
    }

    #[test]
    fn test_multi_digit_vertex_ids() {
        // 1 -> 12 must not be confused with 11 -> 2
        let edge = SyntheticEdge { source: 1, target: 12 };
        let walk = vec![11, 2, 1, 12, 11];
        assert_eq!(open_at_synthetic_edge(walk, edge), vec![12, 11, 2, 1]);
    }

    #[test]
    fn test_min_k_setting() {
        let assembler = DeBruijnAssembler::new(AssemblySettings {
            min_k: 4,
            ..AssemblySettings::default()
        });
        assert!(matches!(
            assembler.assemble(&counts(&[("ACG", 1)])),
            Err(AssemblyError::KmerTooShort { min_k: 4, .. })
        ));
    }

    #[test]
    fn test_alphabet_setting() {
        let assembler = DeBruijnAssembler::new(AssemblySettings {
            alphabet: Some("ACGT".to_string()),
            ..AssemblySettings::default()
        });
        assert_eq!(
            assembler.assemble(&counts(&[("ACN", 1)])),
            Err(AssemblyError::InvalidSymbol {
                kmer: "ACN".to_string(),
                symbol: 'N',
            })
        );
    }

    #[test]
    fn test_disconnected_input_rejected() {
        // Two separate circles: AAA and CCC
        let result = assemble(&counts(&[("AAA", 1), ("CCC", 1)]));
        assert_eq!(result, Err(AssemblyError::DisconnectedGraph { components: 2 }));
    }

    #[test]
    fn test_multiple_imbalance_rejected() {
        // AC branches into CG and CT: two dead ends, two open starts
        let result = assemble(&counts(&[("ACG", 1), ("ACT", 1), ("CAC", 1)]));
        assert!(matches!(
            result,
            Err(AssemblyError::MultipleImbalanceVertices { .. })
        ));
    }
}
