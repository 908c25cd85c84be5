use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forum_update_poster::bbcode::HtmlToBbcode;
use forum_update_poster::config::Config;
use forum_update_poster::db::Database;
use forum_update_poster::pipeline::{self, PipelineSettings, RunOutcome};
use forum_update_poster::watermark::{format_watermark, WatermarkFile};

/// Every failure is logged and the process still exits 0, so the scheduler
/// simply runs the job again later.
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Run aborted: {e:#}");
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    init_tracing()?;

    info!("Starting forum-update-poster");

    // Load and validate configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        poster_id = config.poster_id,
        poster = %config.poster_name,
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    let watermark = WatermarkFile::new(&config.watermark_path);
    let start = watermark.load().await.context("Failed to read watermark")?;
    info!(
        path = %watermark.path().display(),
        watermark = %format_watermark(start),
        "Watermark loaded"
    );

    let db = Database::connect(&config.database_url, &config.table_prefix)
        .await
        .context("Failed to initialize database")?;

    let settings = PipelineSettings::from_config(&config);
    let outcome = pipeline::run(&db, &watermark, start, &settings, &HtmlToBbcode).await?;

    match outcome {
        RunOutcome::Posted {
            content_id,
            url,
            watermark,
            ..
        } => info!(content_id, url = %url, watermark = %watermark, "Run finished: posted"),
        RunOutcome::DryRun { content_id, .. } => {
            info!(content_id, "Run finished: dry run");
        }
        RunOutcome::Idle { skipped } => info!(skipped, "Run finished: nothing to post"),
        RunOutcome::Exhausted { depth } => {
            warn!(depth, "Run finished: skip limit reached");
        }
        RunOutcome::WriteFailed { content_id, error } => {
            error!(content_id, error = %error, "Run finished: write failed");
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forum_update_poster=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
