//! Assembly modules
//!
//! `multigraph` holds the edge bookkeeping, `balance` and `eulerian` the graph
//! algorithms, and `assembler` drives them from k-mer counts to a sequence.

pub mod assembler;
pub mod balance;
pub mod eulerian;
pub mod multigraph;

// Re-export production components
pub use assembler::{assemble, assemble_kmers, DeBruijnAssembler};
pub use balance::create_fake_edge;
pub use eulerian::{decompose_into_cycles, eulerian_circuit, find_cycle, join_cycles, Cycle};
pub use multigraph::Multigraph;
