use thiserror::Error;

/// Failures raised while building or traversing the De Bruijn multigraph.
///
/// Every variant is a hard failure: an assembly either yields a complete
/// superstring or one of these, never a partial result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("edge ({from}, {to}) does not exist in the current graph")]
    InvalidEdgeRemoval { from: usize, to: usize },

    #[error("walk from vertex {start} got stuck at vertex {vertex} before closing a cycle")]
    StuckWalk { start: usize, vertex: usize },

    #[error("graph is not connected ({components} weakly connected components)")]
    DisconnectedGraph { components: usize },

    #[error("{remaining} cycle(s) share no vertex with the joined circuit")]
    UnjoinableCycles { remaining: usize },

    #[error("vertex {vertex} cannot be balanced with one extra edge (indegree {indegree}, outdegree {outdegree})")]
    UnbalancedVertex {
        vertex: usize,
        indegree: usize,
        outdegree: usize,
    },

    #[error("expected at most one deficit and one excess vertex, found deficit {deficit:?} and excess {excess:?}")]
    MultipleImbalanceVertices {
        deficit: Vec<usize>,
        excess: Vec<usize>,
    },

    #[error("no k-mers to assemble")]
    EmptyInput,

    #[error("k-mer '{kmer}' is shorter than the minimum k of {min_k}")]
    KmerTooShort { kmer: String, min_k: usize },

    #[error("k-mer '{kmer}' has length {found}, expected {expected}")]
    InconsistentKmerLength {
        kmer: String,
        expected: usize,
        found: usize,
    },

    #[error("k-mer '{kmer}' has multiplicity 0")]
    ZeroMultiplicity { kmer: String },

    #[error("multiplicity of k-mer '{kmer}' overflows when added to the table")]
    MultiplicityOverflow { kmer: String },

    #[error("k-mer '{kmer}' contains symbol '{symbol}' outside the configured alphabet")]
    InvalidSymbol { kmer: String, symbol: char },

    #[error("sequence of length {len} is shorter than k = {k}")]
    SequenceTooShort { len: usize, k: usize },
}

impl AssemblyError {
    /// True for failures caused by an input that does not describe a single
    /// connected, (near-)Eulerian graph.
    pub fn is_non_eulerian(&self) -> bool {
        matches!(
            self,
            AssemblyError::StuckWalk { .. }
                | AssemblyError::DisconnectedGraph { .. }
                | AssemblyError::UnjoinableCycles { .. }
                | AssemblyError::UnbalancedVertex { .. }
                | AssemblyError::MultipleImbalanceVertices { .. }
        )
    }
}

pub type AssemblyResult<T> = std::result::Result<T, AssemblyError>;
