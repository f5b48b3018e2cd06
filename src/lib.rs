pub mod app;
pub mod config;
#[cfg(test)]
mod config_test;
pub mod errors;
pub mod persistence;
#[cfg(test)]
mod persistence_test;
pub mod prober;
pub mod report;
pub mod scheduler;
pub mod window;

pub use config::AppConfig;
pub use errors::*;
pub use prober::{LatencyProber, ProbeSample};
pub use scheduler::{ProbeScheduler, RunStats};
pub use window::RollingWindow;
