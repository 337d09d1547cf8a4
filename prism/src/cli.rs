// prism/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prism")]
#[command(about = "Resolves multi-dimensional chart collections against a data catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Resolves every collection and writes target/collections/*.json
    Build {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Build only one collection (ex: "covid")
        #[arg(long, short)]
        select: Option<String>,

        /// Write nothing, fail if any output is stale
        #[arg(long)]
        check: bool,
    },

    /// 📋 Lists the resolved views of a collection
    Views {
        /// Collection name (file stem without `.mdim.yml`)
        name: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔎 Shows where each config key of a view comes from
    Explain {
        /// Collection name
        name: String,

        /// View selector, ex: "period=weekly,metric=absolute"
        #[arg(long)]
        view: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_build_defaults() -> Result<()> {
        let args = Cli::parse_from(["prism", "build"]);
        match args.command {
            Commands::Build {
                project_dir,
                select,
                check,
            } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(select, None);
                assert!(!check);
                Ok(())
            }
            _ => bail!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parse_build_select_check() -> Result<()> {
        let args = Cli::parse_from([
            "prism",
            "build",
            "--select",
            "covid",
            "--project-dir",
            "/tmp",
            "--check",
        ]);
        match args.command {
            Commands::Build {
                project_dir,
                select,
                check,
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert_eq!(select, Some("covid".to_string()));
                assert!(check);
                Ok(())
            }
            _ => bail!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parse_explain() -> Result<()> {
        let args = Cli::parse_from(["prism", "explain", "covid", "--view", "metric=absolute"]);
        match args.command {
            Commands::Explain { name, view, .. } => {
                assert_eq!(name, "covid");
                assert_eq!(view, "metric=absolute");
                Ok(())
            }
            _ => bail!("Expected Explain command"),
        }
    }

    #[test]
    fn test_cli_explain_requires_view() {
        assert!(Cli::try_parse_from(["prism", "explain", "covid"]).is_err());
    }
}
