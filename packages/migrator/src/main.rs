mod config;
mod database;
mod runner;

use anyhow::Context;
use common::UrlNormalizer;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = config::AppConfig::load().context("Failed to load config")?;
    info!(storage_base = %config.storage.base_url, "Starting image reference migration");

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    let normalizer = UrlNormalizer::new(config.storage.base_url);
    let summary = runner::run(&db, &normalizer).await;

    // Per-row failures are tolerated: they are summarized here and do not
    // affect the exit status.
    info!(
        tables = summary.tables,
        skipped_tables = summary.skipped_tables,
        rows = summary.rows,
        updated = summary.updated,
        failed = summary.failed,
        "Migration finished"
    );

    Ok(())
}
