use clap::Parser;
use pmp_llm_dispatch::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Run(args) => cli::run::run(config_path, args).await,
        Command::Chain(args) => cli::chain::run(config_path, args).await,
    }
}
