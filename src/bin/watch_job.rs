use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use lexbase::config;
use lexbase::dispatch::HttpDispatcher;
use lexbase::models::JobState;
use lexbase::orchestration::{JobDescriptor, ReportOrchestrator};
use lexbase::reports::ExportArtifact;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = CliArgs::parse()?;
    let cfg = config::load_or_default()?;

    let request_timeout = cfg.api.request_timeout();
    let dispatcher = Arc::new(HttpDispatcher::new(
        args.base_url.unwrap_or(cfg.api.base_url),
        request_timeout,
    ));
    let descriptor = JobDescriptor {
        job_id: args.job_id,
        primary_name: args.primary_name,
        comparison_sources: args.sources,
    };

    let mut orchestrator = ReportOrchestrator::new(dispatcher, descriptor)
        .with_poll_interval(cfg.polling.interval());

    println!("Watching job until every comparison settles...");
    let final_state = orchestrator.run_until_terminal().await;

    match final_state {
        JobState::Failed => {
            let message = orchestrator
                .job_error()
                .unwrap_or("the job failed without a message");
            anyhow::bail!("Job failed: {message}");
        }
        JobState::Pending => {
            anyhow::bail!("Polling stopped before the job produced any results.");
        }
        JobState::Partial | JobState::Complete => {}
    }

    let out_dir = args.out_dir;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    write_artifact(&out_dir, orchestrator.export_json()?)?;
    write_artifact(&out_dir, orchestrator.export_document()?)?;

    println!(
        "Report finished with {} entries ({:?}).",
        orchestrator.report().len(),
        final_state
    );
    Ok(())
}

fn write_artifact(out_dir: &std::path::Path, artifact: ExportArtifact) -> Result<()> {
    let path = out_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
    Ok(())
}

struct CliArgs {
    job_id: String,
    primary_name: String,
    sources: Vec<String>,
    base_url: Option<String>,
    out_dir: PathBuf,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut job_id = None;
        let mut primary_name = None;
        let mut sources = Vec::new();
        let mut base_url = None;
        let mut out_dir = PathBuf::from(".");
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--job" => {
                    job_id = Some(args.next().context("Expected a job id after --job")?);
                }
                "--base-document" => {
                    primary_name = Some(
                        args.next()
                            .context("Expected a document name after --base-document")?,
                    );
                }
                "--source" => {
                    sources.push(args.next().context("Expected a source name after --source")?);
                }
                "--api" => {
                    base_url = Some(args.next().context("Expected a URL after --api")?);
                }
                "--out" => {
                    out_dir = PathBuf::from(args.next().context("Expected a path after --out")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        let job_id = job_id.context("Missing required --job <id>")?;
        let primary_name = primary_name.context("Missing required --base-document <name>")?;
        if sources.is_empty() {
            return Err(anyhow!("At least one --source <name> is required."));
        }
        Ok(Self {
            job_id,
            primary_name,
            sources,
            base_url,
            out_dir,
        })
    }
}

fn print_usage() {
    println!("LexBase job watcher");
    println!("Polls a comparison job to completion and writes the exports.");
    println!("Usage: cargo run --bin watch_job -- [options]");
    println!("Options:");
    println!("  --job <id>              Comparison job id returned on submission (required)");
    println!("  --base-document <name>  Display name of the base document (required)");
    println!("  --source <name>         Comparison source name, repeatable (at least one)");
    println!("  --api <url>             Backend base URL (default from config.toml)");
    println!("  --out <dir>             Output directory for exports (default: current dir)");
}
