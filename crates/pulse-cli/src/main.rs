use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pulse_pipeline::{
    build_services, run_weekly_pulse, PipelineOutcome, ProgressStep, Services, WeeklyOutcome,
};

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "Weekly app-review pulse from the command line")]
struct Cli {
    /// App profile YAML; overrides `PULSE_PROFILE_PATH`.
    #[arg(long, global = true, value_name = "PATH")]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once and print the Markdown report.
    Run {
        /// Skip writing reviews.csv and pulse.md.
        #[arg(long)]
        no_export: bool,

        /// Also email the report to this address.
        #[arg(long, value_name = "ADDR")]
        email: Option<String>,
    },
    /// Run the pipeline and print each progress event as an SSE frame.
    Stream,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = pulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = cli.profile {
        config.profile_path = path;
    }
    if let Commands::Run {
        no_export: true, ..
    } = cli.command
    {
        config.export_enabled = false;
    }

    let profile = pulse_core::load_profile(&config.profile_path)
        .with_context(|| format!("loading profile {}", config.profile_path.display()))?;
    let services = build_services(&config, &profile)?;

    match cli.command {
        Commands::Run { email, .. } => run(&services, email.as_deref()).await,
        Commands::Stream => stream(&services).await,
    }
}

async fn run(services: &Services, email: Option<&str>) -> anyhow::Result<()> {
    let report = if let Some(email) = email {
        match run_weekly_pulse(&services.pipeline, services.mailer.as_ref(), Some(email)).await? {
            WeeklyOutcome::NoReviews => None,
            WeeklyOutcome::Sent { report, receipt } => {
                tracing::info!(to = email, id = ?receipt.id, "report emailed");
                Some(*report)
            }
        }
    } else {
        match services.pipeline.run_blocking().await? {
            PipelineOutcome::NoReviews => None,
            PipelineOutcome::Completed(run) => Some(run.report),
        }
    };

    let Some(report) = report else {
        println!("No reviews found");
        return Ok(());
    };
    println!("{}", report.markdown_report);
    Ok(())
}

async fn stream(services: &Services) -> anyhow::Result<()> {
    let mut rx = Arc::clone(&services.pipeline).stream();
    let mut stdout = std::io::stdout().lock();
    let mut last = None;

    while let Some(event) = rx.recv().await {
        stdout.write_all(event.to_sse_frame()?.as_bytes())?;
        stdout.flush()?;
        last = Some(event.step);
    }

    match last {
        Some(ProgressStep::Complete) => Ok(()),
        Some(ProgressStep::Error) => bail!("pulse run ended with an error event"),
        _ => bail!("progress stream closed before the run finished"),
    }
}

#[cfg(test)]
mod tests;
