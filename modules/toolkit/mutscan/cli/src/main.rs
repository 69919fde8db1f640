use clap::{Parser, Subcommand};
use env_logger::Env;
use eyre::Result;

mod analyze;
mod plot;

#[derive(Parser)]
#[command(name = "mutscan")]
#[command(about = "Per-position mutation frequencies and enrichment from aligned reads", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count mutations in two SAM/BAM files and compute their enrichment
    Analyze(analyze::Analyze),

    /// Render bar charts for frequency and enrichment tables
    Plot(plot::Plot),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => args.run(),
        Commands::Plot(args) => args.run(),
    }
}
