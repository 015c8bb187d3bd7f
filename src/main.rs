use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use beatcanvas::display::{self, DisplayMode};
use beatcanvas::{Args, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("beatcanvas=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.init_config {
        let path = Config::init_default_config().context("Failed to write config template")?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // Explicit path must load; the default path is optional
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_from_default_path().unwrap_or_else(Config::builtin),
    };
    config.merge_args(&args).context("Invalid command-line arguments")?;

    info!("Starting BeatCanvas in {:?} mode", config.display.mode);

    match config.display.mode {
        DisplayMode::Terminal => {
            display::terminal::run(config).await?;
        }
        DisplayMode::Headless => {
            display::headless::run(config)?;
        }
    }

    Ok(())
}
