use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Target URL cannot be empty")]
    EmptyTargetUrl,

    #[error("Invalid target URL '{url}': {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("Probe interval must be at least 1 second")]
    InvalidInterval,

    #[error("Probe timeout must be at least 1 second")]
    InvalidProbeTimeout,

    #[error("Report port must be greater than 0")]
    InvalidReportPort,

    #[error("Failed to initialize HTTP prober: {reason}")]
    ProberInit { reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to write average record: {0}")]
    Write(#[source] io::Error),

    #[error("Failed to read average record: {0}")]
    Read(#[source] io::Error),

    #[error("Average record does not exist yet")]
    RecordMissing,

    #[error("Average record is empty")]
    EmptyRecord,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to bind status listener on {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("Status listener failed: {0}")]
    Serve(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum LatencyCheckerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Report server error: {0}")]
    Report(#[from] ReportError),
}
