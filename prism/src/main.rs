// prism/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug prism build ... to see expansion details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            project_dir,
            select,
            check,
        } => commands::build::execute(project_dir, select, check).await,
        Commands::Views { name, project_dir } => commands::views::execute(project_dir, name),
        Commands::Explain {
            name,
            view,
            project_dir,
        } => commands::explain::execute(project_dir, name, view),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}
