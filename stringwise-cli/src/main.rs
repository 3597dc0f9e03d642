use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use stringwise_cli::{Project, run};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stringwise")]
#[command(about = "Size PV strings and DCDB layouts from a TOML project file", long_about = None)]
struct Cli {
    /// Path to the project file
    #[arg(short, long)]
    project: PathBuf,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Respects RUST_LOG; logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stringwise=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.project)
        .with_context(|| format!("Failed to read {}", cli.project.display()))?;
    let project = Project::from_toml_str(&text)
        .with_context(|| format!("Failed to parse {}", cli.project.display()))?;
    let job = project.job().context("Invalid project")?;

    let report = run(job).inspect_err(|err| error!(kind = ?err.kind(), "{err}"))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
