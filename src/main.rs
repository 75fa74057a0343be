use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use feedsnap::config::{Args, Settings};
use feedsnap::feed::HttpTransport;
use feedsnap::{aggregate, logger, registry, render, snapshot};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::LogConfig::new(&args.log_level, args.log_file.clone()))?;

    let settings = Settings::from(&args);

    // Without sources there is nothing to do; abort before touching outputs.
    let sources = registry::load_sources(&settings.feeds_path)
        .with_context(|| format!("loading sources from {}", settings.feeds_path.display()))?;

    let transport = HttpTransport::new(settings.timeout, &settings.user_agent)
        .context("building HTTP client")?;

    let result = aggregate::aggregate(&transport, &sources, settings.limits).await;
    info!(
        "Aggregated {} items from {} sources",
        result.items.len(),
        sources.len()
    );
    if !result.failed_sources.is_empty() {
        warn!(
            "{} sources contributed nothing: {}",
            result.failed_sources.len(),
            result.failed_sources.join(", ")
        );
    }

    snapshot::write_snapshot(&result, &settings.snapshot_path).context("writing snapshot")?;
    render::write_pages(&result, &sources, &settings.output_dir).context("rendering pages")?;

    info!("Done");
    Ok(())
}
