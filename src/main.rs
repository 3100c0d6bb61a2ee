use anyhow::{Context, Result};
use gitpages::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let config = Config::parse();

    let default_level = if config.quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate().context("Invalid configuration")?;
    let options = config.site_options()?;

    let summary = gitpages::generate(&options).context("Failed to generate site")?;

    info!(
        pages = summary.pages_written,
        commits = summary.commits,
        branches = summary.branches,
        tags = summary.tags,
        files = summary.files,
        output = %options.output.display(),
        "site generated"
    );

    Ok(())
}
