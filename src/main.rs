use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use auto_tag::cli::{orchestration, Args};
use auto_tag::{config, ui};

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level());

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    // Preconditions are checked before any host call
    let run = args.run_config().validate()?;
    ui::display_status(&format!(
        "Computing next tag for {} ({} host)",
        run.repository.as_deref().unwrap_or("local repository"),
        run.host
    ));

    let result = orchestration::run_workflow(&run, &config).await?;
    ui::display_release_summary(&result.outcome, &result.manifests);

    if !result.outputs_written {
        result.outputs.write_to(std::io::stdout().lock())?;
    }

    Ok(())
}
