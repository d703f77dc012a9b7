use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use rag_eval::config::RunConfig;
use rag_eval::manual::{self, ConsoleRatings};
use rag_eval::oracle::HttpOracle;
use rag_eval::output::{self, OutputFormat};
use rag_eval::runner::Runner;

/// RAG Evaluation CLI - score generated answers and retrieval quality against a labeled dataset
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the batch evaluation and write the consolidated report
    Evaluate(EvaluateArgs),
    /// Rate answers interactively on a 1-5 scale
    Rate(RateArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Path to the TOML run configuration
    run_file: PathBuf,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,

    /// Verbose output - show each evaluation step
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct RateArgs {
    /// Path to the TOML run configuration
    run_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate(args) => {
            let config = RunConfig::from_file(&args.run_file)?;
            let oracle = Arc::new(HttpOracle::new(&config.oracle)?);
            let runner = Runner::new(config, oracle, args.verbose);

            let report = runner.run().await?;
            output::print_report(&report, args.output);
        }
        Command::Rate(args) => {
            let config = RunConfig::from_file(&args.run_file)?;
            let oracle = HttpOracle::new(&config.oracle)?;

            manual::run_session(&oracle, &config.manual_questions, &mut ConsoleRatings).await?;
        }
    }

    Ok(())
}
