mod render;
mod settings;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{AnalysisOrchestrator, ExportOutcome, HttpBackend};
use shell::ScriptedShell;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "nat2-desktop",
    version,
    about = "Classify NAT2 acetylator status for a FASTA or CSV file"
)]
struct Args {
    /// Sequence file to analyze (.fasta or .csv)
    file: PathBuf,
    /// Deliver the file as a drag-and-drop instead of answering the open dialog
    #[arg(long)]
    drop: bool,
    /// Save batch results as CSV to this file or directory
    #[arg(long)]
    export: Option<PathBuf>,
    /// Classification backend base URL (overrides settings and environment)
    #[arg(long)]
    backend_url: Option<String>,
    /// Settings file; ./nat2.toml is read when present
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = settings::load_settings(args.config.as_deref())?;
    if let Some(url) = &args.backend_url {
        settings.backend_url = url.clone();
    }
    let backend = HttpBackend::new(&settings.backend_url).context("invalid backend url")?;
    info!(backend = %backend.base_url(), "starting nat2 desktop session");
    let shell = ScriptedShell::new(args.file.clone(), args.export.clone());
    let orchestrator = AnalysisOrchestrator::new(
        Arc::new(backend),
        Arc::new(shell),
        settings.presentation_policy(),
    )
    .with_export_file_name(settings.export_file_name.clone());

    let printer = tokio::spawn(render::print_events(orchestrator.subscribe_events()));
    let outcome = run_session(&orchestrator, &args).await;

    // Dropping the orchestrator closes the event channel so the printer drains and exits.
    drop(orchestrator);
    if let Err(err) = printer.await {
        warn!(%err, "event printer task failed");
    }
    outcome
}

async fn run_session(orchestrator: &AnalysisOrchestrator, args: &Args) -> Result<()> {
    if !orchestrator.initialize().await {
        bail!("host shell failed to initialize");
    }

    let selection = if args.drop {
        let name = args
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = args.file.to_string_lossy();
        Some(orchestrator.drop_file(&name, Some(path.as_ref())).await?)
    } else {
        orchestrator.open_file().await?
    };
    if selection.is_none() {
        bail!("no file selected");
    }

    let result = orchestrator.start_analysis().await?;

    if args.export.is_some() {
        if !result.is_batch() {
            warn!("single-label result has no CSV export; ignoring --export");
            return Ok(());
        }
        match orchestrator.export_batch().await? {
            ExportOutcome::Saved(path) => info!(path = %path.display(), "export saved"),
            ExportOutcome::Cancelled => info!("export cancelled"),
        }
    }
    Ok(())
}
