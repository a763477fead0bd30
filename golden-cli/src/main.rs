use clap::Parser;
use tracing_subscriber::EnvFilter;

use golden_cli::cli::{Cli, Commands};
use golden_cli::commands;
use golden_cli::error::CliError;
use golden_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries reports and workload logs, diagnostics go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.format);
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &writer),
        Commands::Replay(args) => commands::replay::execute(args, &writer).await,
        Commands::Scenario(args) => commands::scenario::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
