use anyhow::Result;
use clap::{Parser, Subcommand};

mod report;
mod runner;

#[derive(Parser)]
#[command(name = "aixblock-suite")]
#[command(about = "Smoke tests for the aixblock program")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call `initialize` on a live cluster and report the signature
    Smoke {
        /// Anchor project root (defaults to current directory)
        #[arg(short, long)]
        project_dir: Option<String>,
        /// Cluster RPC endpoint (overrides ANCHOR_PROVIDER_URL)
        #[arg(long)]
        url: Option<String>,
        /// Path to the payer keypair JSON (overrides ANCHOR_WALLET)
        #[arg(long)]
        wallet: Option<String>,
        /// processed, confirmed or finalized
        #[arg(long)]
        commitment: Option<String>,
    },
    /// Call `initialize` against an in-process LiteSVM loaded with target/deploy/aixblock.so
    Local {
        /// Anchor project root (defaults to current directory)
        #[arg(short, long)]
        project_dir: Option<String>,
    },
    /// List the methods a program descriptor exposes
    Methods {
        /// Anchor project root (defaults to current directory)
        #[arg(short, long)]
        project_dir: Option<String>,
        /// Workspace program name
        #[arg(long, default_value = aixblock_harness::smoke::PROGRAM_NAME)]
        program: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Smoke {
            project_dir,
            url,
            wallet,
            commitment,
        } => {
            let dir = project_dir.unwrap_or_else(|| ".".to_string());
            let settings = runner::ClusterSettings {
                url,
                wallet,
                commitment,
            };
            runner::run_cluster_smoke(&dir, &settings).await?;
        }
        Commands::Local { project_dir } => {
            let dir = project_dir.unwrap_or_else(|| ".".to_string());
            runner::run_local_smoke(&dir).await?;
        }
        Commands::Methods {
            project_dir,
            program,
        } => {
            let dir = project_dir.unwrap_or_else(|| ".".to_string());
            runner::list_methods(&dir, &program)?;
        }
    }
    Ok(())
}
