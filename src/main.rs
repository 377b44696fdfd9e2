use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use seo_crawler::{Pipeline, Settings};

#[derive(Parser)]
#[command(name = "seo_crawler", about = "Fetch pages, extract SEO metadata, classify topics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl one URL and print the result as JSON
    Crawl {
        url: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Crawl several URLs concurrently
    Batch {
        urls: Vec<String>,
        /// Read additional URLs from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Extract and classify a local HTML file without fetching
    Inspect {
        path: PathBuf,
        /// Source URL to report alongside the file
        #[arg(long, default_value = "file://local")]
        url: String,
        #[arg(long)]
        pretty: bool,
    },
    /// List topics and their keywords
    Topics,
    /// Show name and version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(settings = ?settings, "Starting {}", settings.app_name);

    let pipeline = Arc::new(Pipeline::new(&settings)?);

    match cli.command {
        Commands::Crawl { url, pretty } => {
            let response = pipeline.crawl(&url).await;
            print_json(&response, pretty)?;
        }
        Commands::Batch { mut urls, file, pretty } => {
            if let Some(path) = file {
                let list = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                urls.extend(
                    list.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty() && !l.starts_with('#'))
                        .map(str::to_string),
                );
            }
            if urls.is_empty() {
                println!("No URLs given.");
                return Ok(());
            }

            let t0 = Instant::now();
            let pb = ProgressBar::new(urls.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                    .progress_chars("=> "),
            );
            let report = pipeline
                .crawl_batch_with(urls, |r| {
                    pb.set_message(r.url.clone());
                    pb.inc(1);
                })
                .await?;
            pb.finish_and_clear();
            info!(
                "Done: {} crawled ({} ok, {} failed) in {:.1}s",
                report.total,
                report.succeeded,
                report.failed,
                t0.elapsed().as_secs_f64()
            );
            print_json(&report, pretty)?;
        }
        Commands::Inspect { path, url, pretty } => {
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let (metadata, classification) = pipeline.inspect(&html, &url);
            print_json(
                &serde_json::json!({
                    "url": url,
                    "metadata": metadata,
                    "classification": classification,
                }),
                pretty,
            )?;
        }
        Commands::Topics => {
            for topic in pipeline.classifier().dictionary().topics() {
                println!("{:<14} {}", topic.name(), topic.keywords().join(", "));
            }
        }
        Commands::Version => {
            println!("{} {}", settings.app_name, env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
