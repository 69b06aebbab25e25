//! BigFun CLI
//!
//! Deploy and document BigQuery bigfunctions.

use anyhow::Result;
use bigfun_core::catalog::DEFAULT_FOLDER;
use bigfun_core::docs::DEFAULT_OUTPUT;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod bigquery;
mod commands;
mod prompt;

/// BigFun - deploy and document bigfunctions
#[derive(Parser)]
#[command(name = "bigfun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Folder holding one yaml definition per bigfunction
    #[arg(short, long, default_value = DEFAULT_FOLDER)]
    folder: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy BIGFUNCTION
    ///
    /// BIGFUNCTION is one of:
    ///
    /// - `project.dataset.name`: deploy `name` in `dataset` of `project`
    ///
    /// - `dataset.name`: deploy `name` in `dataset` of the default project
    ///
    /// - `name`: deploy `name` in every default dataset of the default project
    ///
    /// - `*`: deploy every bigfunction in every default dataset of the default
    ///   project
    ///
    /// Defaults missing from the configuration file are prompted for and saved.
    Deploy {
        /// Bigfunction identifier
        bigfunction: String,

        /// Print the DDL instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Test BIGFUNCTION
    ///
    /// Currently deploys BIGFUNCTION as given, which must be
    /// `project.dataset.name`.
    Test {
        /// Fully qualified bigfunction identifier
        bigfunction: String,

        /// Print the DDL instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate and serve documentation
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },
}

#[derive(Subcommand)]
enum DocsCommands {
    /// Generate markdown files from the yaml definitions
    Generate {
        /// Folder markdown pages are written to
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: String,
    },

    /// Serve docs locally on http://localhost:8000, regenerating on change
    Serve {
        /// Folder markdown pages are written to
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so `--dry-run` output can be piped
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Deploy {
            bigfunction,
            dry_run,
        } => {
            commands::deploy::run(&cli.config, &cli.folder, &bigfunction, dry_run).await?;
        }
        Commands::Test {
            bigfunction,
            dry_run,
        } => {
            commands::test::run(&cli.folder, &bigfunction, dry_run).await?;
        }
        Commands::Docs { command } => match command {
            DocsCommands::Generate { output } => {
                commands::docs::generate(&cli.folder, &output).await?;
            }
            DocsCommands::Serve { output } => {
                commands::docs::serve(&cli.folder, &output).await?;
            }
        },
    }

    Ok(())
}
