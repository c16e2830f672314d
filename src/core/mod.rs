pub mod data_structures;
pub mod error;

// Re-export key types for assembly integration
pub use data_structures::{prefix_suffix, Assembly, KmerCounts, KmerIndex, SyntheticEdge};
pub use error::{AssemblyError, AssemblyResult};
