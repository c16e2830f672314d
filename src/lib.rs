//! # dbg-euler - De Bruijn graph assembly from k-mer counts
//!
//! Reconstructs a sequence from a multiset of k-mers with multiplicities.
//! The k-mers form a directed multigraph over (k-1)-mers; a near-Eulerian
//! graph is balanced with one synthetic edge, decomposed into edge-disjoint
//! cycles, and the cycles are spliced into a single Eulerian circuit that
//! spells the assembled superstring.

pub mod assembly;
pub mod cli;
pub mod core;
pub mod utils;

// Re-export commonly used types at crate level
pub use crate::assembly::{assemble, assemble_kmers, DeBruijnAssembler, Multigraph};
pub use crate::core::{Assembly, AssemblyError, KmerCounts, KmerIndex, SyntheticEdge};
pub use crate::utils::configuration::{AssemblyConfiguration, AssemblySettings, ConfigurationManager};

/// Result type used by the command-line and file-handling layers
pub type Result<T> = anyhow::Result<T>;

/// Error type used by the command-line and file-handling layers
pub type Error = anyhow::Error;
