//! CIE CLI - Command-line interface
//!
//! Usage:
//!   cie extract --concept dragon --file passage.txt
//!   cie extract --concept city --text "..." --json
//!   cie queries --concept potion
//!   cie eval --concept dragon --file passage.txt --gold gold.txt

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cie_core::AppConfig;
use cie_extractor::{Evaluator, InstanceExtractor, QuerySynthesizer};
use cie_reader::create_reader;

#[derive(Parser)]
#[command(name = "cie")]
#[command(about = "Concept Instance Extraction CLI")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract instances of a concept from a passage
    Extract {
        /// Abstract concept to extract instances of
        #[arg(long)]
        concept: String,

        /// Read the passage from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Pass the passage inline
        #[arg(long)]
        text: Option<String>,

        /// Emit JSON instead of a plain listing
        #[arg(long)]
        json: bool,
    },
    /// Print the synthesized queries for a concept
    Queries {
        /// Abstract concept
        #[arg(long)]
        concept: String,
    },
    /// Evaluate extraction against a gold list of instance names
    Eval {
        /// Abstract concept
        #[arg(long)]
        concept: String,

        /// Passage file
        #[arg(long)]
        file: PathBuf,

        /// Gold file, one instance name per line
        #[arg(long)]
        gold: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn read_passage(file: Option<&PathBuf>, text: Option<String>) -> anyhow::Result<String> {
    match (file, text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read passage file {}", path.display())),
        (None, Some(text)) => Ok(text),
        (None, None) => bail!("either --file or --text is required"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    match cli.command {
        Commands::Extract {
            concept,
            file,
            text,
            json,
        } => {
            let passage = read_passage(file.as_ref(), text)?;
            let reader = Arc::from(create_reader(&config.reader)?);
            let extractor = InstanceExtractor::from_config(reader, &config.extractor);

            let instances = extractor.extract(&passage, &concept).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&instances)?);
            } else if instances.is_empty() {
                println!("No instances found.");
            } else {
                for instance in &instances {
                    println!("- {:?} (score: {:.4})", instance.text, instance.score);
                }
            }
        }
        Commands::Queries { concept } => {
            for query in QuerySynthesizer::new().generate(&concept) {
                println!("{query}");
            }
        }
        Commands::Eval {
            concept,
            file,
            gold,
        } => {
            let passage = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read passage file {}", file.display()))?;
            let gold_list: Vec<String> = std::fs::read_to_string(&gold)
                .with_context(|| format!("Failed to read gold file {}", gold.display()))?
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();

            let reader = Arc::from(create_reader(&config.reader)?);
            let extractor = InstanceExtractor::from_config(reader, &config.extractor);

            let instances = extractor.extract(&passage, &concept).await?;
            let metrics = Evaluator::new().evaluate(&instances, &gold_list);

            print!("{}", metrics.report());
        }
    }

    Ok(())
}
