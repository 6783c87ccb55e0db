//! CLI module for PMP LLM Dispatch
//!
//! Provides subcommands:
//! - `run`: send one request through a model's fallback chain
//! - `chain`: show the invoker order planned for a model

pub mod chain;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PMP LLM Dispatch - fallback-chain dispatch across LLM providers
#[derive(Parser)]
#[command(name = "pmp-llm-dispatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file, layered over `config/default` and `config/local`
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a request against a model
    Run(run::RunArgs),

    /// Show the fallback order for a model
    Chain(chain::ChainArgs),
}
