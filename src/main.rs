use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use latency_checker::app::LatencyCheckerApp;
use latency_checker::config::{AppConfig, ConfigManager};

/// Periodically measures round-trip latency against a target URL and keeps
/// a rolling average of the most recent checks.
#[derive(Parser, Debug)]
#[command(name = "latency-checker", version, about)]
struct Cli {
    /// Seconds between latency checks
    #[arg(short = 't', long = "interval")]
    interval: Option<u64>,

    /// Target URL to probe
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// Serve a JSON status report on the configured port
    #[arg(short = 'w', long = "web")]
    web: bool,

    /// Load configuration from a TOML file
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut manager = ConfigManager::new(path.clone());
            manager.load().await?;
            manager.into_config()
        }
        None => AppConfig::default(),
    };

    // CLI flags take precedence over file values
    if let Some(url) = cli.url {
        config.probe.target_url = url;
    }
    if let Some(interval) = cli.interval {
        config.probe.interval_secs = interval;
    }
    if cli.web {
        config.report.enabled = true;
    }

    let app = LatencyCheckerApp::with_config(config).await?;
    app.run().await?;
    Ok(())
}
