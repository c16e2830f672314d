use anyhow::Result;
use clap::Parser;
use dbg_euler::cli::Cli;

fn main() -> Result<()> {
    Cli::parse().execute()
}
