pub mod configuration;
pub mod kmer_io;

pub use configuration::{
    AssemblyConfiguration, AssemblySettings, ConfigError, ConfigurationManager, LoggingConfig,
};
pub use kmer_io::{parse_kmer_table, read_kmer_counts, write_kmer_counts};
