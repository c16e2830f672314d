//! Command-line interface
//! ======================
//!
//! Thin wrapper around the assembler: load a k-mer count table, assemble
//! it, and print the superstring. The `spectrum` command produces count
//! tables from a known sequence.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::assembly::assembler::DeBruijnAssembler;
use crate::core::data_structures::KmerCounts;
use crate::utils::configuration::ConfigurationManager;
use crate::utils::kmer_io::{read_kmer_counts, write_kmer_counts, write_kmer_counts_to_path};

#[derive(Parser)]
#[command(name = "dbg-euler")]
#[command(about = "Assemble a sequence from k-mer counts using Eulerian circuits")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble a k-mer count table into a superstring
    Assemble {
        /// K-mer table: `<kmer> <count>` lines, or a JSON object with a .json extension
        counts: PathBuf,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the full assembly report as JSON instead of the bare sequence
        #[arg(long)]
        json: bool,
    },

    /// Write the k-mer count table of a sequence
    Spectrum {
        /// Sequence to decompose into k-mers
        #[arg(short, long)]
        sequence: String,

        /// K-mer length
        #[arg(short)]
        k: usize,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Load configuration, initialize logging and run the command
    pub fn execute(self) -> Result<()> {
        let Cli {
            command,
            config,
            verbose,
        } = self;

        let mut manager = match &config {
            Some(path) => ConfigurationManager::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => ConfigurationManager::new()?,
        };
        if verbose {
            manager.config_mut().logging.level = "debug".to_string();
        }
        manager.setup_logging()?;

        match command {
            Commands::Assemble {
                counts,
                output,
                json,
            } => run_assemble(&manager, &counts, output.as_deref(), json),
            Commands::Spectrum {
                sequence,
                k,
                output,
            } => run_spectrum(&sequence, k, output.as_deref()),
        }
    }
}

fn run_assemble(
    manager: &ConfigurationManager,
    counts_path: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    info!("📂 Reading k-mer counts from {}", counts_path.display());
    let counts = read_kmer_counts(counts_path)?;

    let assembler = DeBruijnAssembler::new(manager.config().assembly.clone());
    let assembly = assembler
        .assemble(&counts)
        .with_context(|| format!("Failed to assemble {}", counts_path.display()))?;

    let mut report = if json {
        serde_json::to_string_pretty(&assembly)?
    } else {
        assembly.sequence
    };
    report.push('\n');

    match output {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 Assembly written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run_spectrum(sequence: &str, k: usize, output: Option<&Path>) -> Result<()> {
    let counts = KmerCounts::from_sequence(sequence, k)?;
    info!(
        "🔬 {} distinct {}-mers, {} in total",
        counts.len(),
        k,
        counts.total_multiplicity()
    );

    match output {
        Some(path) => write_kmer_counts_to_path(path, &counts),
        None => write_kmer_counts(std::io::stdout().lock(), &counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assemble() {
        let cli = Cli::try_parse_from(["dbg-euler", "assemble", "counts.tsv", "--json", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Assemble { counts, output, json } => {
                assert_eq!(counts, PathBuf::from("counts.tsv"));
                assert!(output.is_none());
                assert!(json);
            }
            _ => panic!("expected assemble command"),
        }
    }

    #[test]
    fn test_parse_spectrum() {
        let cli = Cli::try_parse_from(["dbg-euler", "spectrum", "-s", "GATTACA", "-k", "3"]).unwrap();
        match cli.command {
            Commands::Spectrum { sequence, k, .. } => {
                assert_eq!(sequence, "GATTACA");
                assert_eq!(k, 3);
            }
            _ => panic!("expected spectrum command"),
        }
    }

    #[test]
    fn test_spectrum_then_assemble_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let counts_path = temp_dir.path().join("counts.tsv");
        let output_path = temp_dir.path().join("assembly.txt");

        run_spectrum("GATTACA", 4, Some(&counts_path)).unwrap();

        let manager = ConfigurationManager::new_with_defaults().unwrap();
        run_assemble(&manager, &counts_path, Some(&output_path), false).unwrap();

        let assembled = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(assembled.trim_end(), "GATTACA");
    }
}
