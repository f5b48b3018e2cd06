use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, ConfigManager};
use crate::errors::LatencyCheckerError;
use crate::persistence::{AverageSink, FileAverageSink};
use crate::prober::{HttpHeadProber, LatencyProber};
use crate::report::{ReportServer, ReportState};
use crate::scheduler::{ProbeScheduler, RunStats};

const DEFAULT_CONFIG_PATH: &str = "latency_checker.toml";

/// Application builder for dependency injection and initialization
pub struct AppBuilder {
    config_path: Option<PathBuf>,
    custom_config: Option<AppConfig>,
    custom_prober: Option<Arc<dyn LatencyProber>>,
    custom_sink: Option<Arc<dyn AverageSink>>,
    init_logging: bool,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config_path: None,
            custom_config: None,
            custom_prober: None,
            custom_sink: None,
            init_logging: true,
        }
    }

    /// Set configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set configuration directly, skipping the file load
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.custom_config = Some(config);
        self
    }

    /// Set custom prober implementation
    pub fn with_prober(mut self, prober: Arc<dyn LatencyProber>) -> Self {
        self.custom_prober = Some(prober);
        self
    }

    /// Set custom persistence sink implementation
    pub fn with_sink(mut self, sink: Arc<dyn AverageSink>) -> Self {
        self.custom_sink = Some(sink);
        self
    }

    /// Enable or disable installing the global tracing subscriber. Tests
    /// must disable it.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.init_logging = enable;
        self
    }

    /// Build the application
    pub async fn build(self) -> Result<LatencyCheckerApp, LatencyCheckerError> {
        let AppBuilder {
            config_path,
            custom_config,
            custom_prober,
            custom_sink,
            init_logging,
        } = self;

        let config = match custom_config {
            Some(config) => config,
            None => {
                let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
                let mut manager = ConfigManager::new(path);
                manager.load().await?;
                manager.into_config()
            }
        };
        config.validate()?;

        if init_logging {
            install_tracing(&config.logging.level);
        }
        info!("Initializing latency checker");

        let stats = Arc::new(RunStats::new());

        let prober: Arc<dyn LatencyProber> = match custom_prober {
            Some(prober) => prober,
            None => Arc::new(HttpHeadProber::new(
                &config.probe.target_url,
                config.probe_timeout(),
            )?),
        };

        let sink: Arc<dyn AverageSink> = match custom_sink {
            Some(sink) => sink,
            None => Arc::new(FileAverageSink::new(config.persistence.record_path.clone())),
        };

        let scheduler = ProbeScheduler::new(
            prober,
            sink.clone(),
            stats.clone(),
            config.interval(),
        );

        let report_server = if config.report.enabled {
            let addr = SocketAddr::from(([0, 0, 0, 0], config.report.port));
            let state = ReportState {
                target_url: config.probe.target_url.clone(),
                sink,
                stats,
            };
            Some(ReportServer::new(addr, state))
        } else {
            None
        };

        Ok(LatencyCheckerApp {
            config,
            scheduler,
            report_server,
        })
    }
}

fn install_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wires the measurement loop, the persistence sink, and the optional
/// status endpoint together.
pub struct LatencyCheckerApp {
    config: AppConfig,
    scheduler: ProbeScheduler,
    report_server: Option<ReportServer>,
}

impl LatencyCheckerApp {
    /// Create a new application with default configuration
    pub async fn new() -> Result<Self, LatencyCheckerError> {
        AppBuilder::new().build().await
    }

    /// Create a new application with custom configuration
    pub async fn with_config(config: AppConfig) -> Result<Self, LatencyCheckerError> {
        AppBuilder::new().with_config(config).build().await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs until ctrl-c or a fatal persistence failure. A status listener
    /// bind failure is fatal at startup; a later listener failure is
    /// logged but does not stop the measurement loop.
    pub async fn run(mut self) -> Result<(), LatencyCheckerError> {
        if let Some(server) = self.report_server.take() {
            let bound = server.bind().await?;
            tokio::spawn(async move {
                if let Err(e) = bound.serve().await {
                    error!(error = %e, "status report server failed");
                }
            });
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                let _ = stop_tx.send(true);
            }
        });

        self.scheduler.run(stop_rx).await?;
        info!("latency checker stopped");
        Ok(())
    }
}
