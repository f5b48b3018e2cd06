use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::warn;

use crate::errors::ConfigError;

/// Outcome of a single probe. A failed probe still carries the elapsed
/// time up to the failure point, and that time is a valid latency sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSample {
    pub elapsed: Duration,
    pub ok: bool,
}

/// Issues one probe against the configured target and measures its
/// round-trip time.
#[async_trait]
pub trait LatencyProber: Send + Sync {
    async fn probe(&self) -> ProbeSample;

    /// The target this prober measures, for logs and reports.
    fn target(&self) -> &str;
}

/// Default prober: a HEAD request against the target URL. The client-level
/// timeout bounds every probe so a stalled target cannot wedge the tick
/// loop past one interval indefinitely.
#[derive(Debug)]
pub struct HttpHeadProber {
    client: reqwest::Client,
    target_url: String,
}

impl HttpHeadProber {
    pub fn new(target_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let parsed =
            reqwest::Url::parse(target_url).map_err(|e| ConfigError::InvalidTargetUrl {
                url: target_url.to_string(),
                reason: e.to_string(),
            })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidTargetUrl {
                url: target_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::ProberInit {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            target_url: target_url.to_string(),
        })
    }
}

#[async_trait]
impl LatencyProber for HttpHeadProber {
    async fn probe(&self) -> ProbeSample {
        let start = Instant::now();
        let result = self.client.head(&self.target_url).send().await;
        let elapsed = start.elapsed();

        // Any completed exchange counts as a successful probe, whatever the
        // status code; only transport-level failures flip the flag.
        match result {
            Ok(_) => ProbeSample { elapsed, ok: true },
            Err(e) => {
                warn!(url = %self.target_url, error = %e, "probe failed");
                ProbeSample { elapsed, ok: false }
            }
        }
    }

    fn target(&self) -> &str {
        &self.target_url
    }
}

/// Deterministic prober for tests: replays a scripted sequence of samples.
#[cfg(test)]
pub(crate) struct ScriptedProber {
    target_url: String,
    samples: std::sync::Mutex<std::collections::VecDeque<ProbeSample>>,
}

#[cfg(test)]
impl ScriptedProber {
    pub(crate) fn new(target_url: &str, samples: Vec<ProbeSample>) -> Self {
        Self {
            target_url: target_url.to_string(),
            samples: std::sync::Mutex::new(samples.into_iter().collect()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LatencyProber for ScriptedProber {
    async fn probe(&self) -> ProbeSample {
        self.samples
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ProbeSample {
                elapsed: Duration::from_millis(1),
                ok: true,
            })
    }

    fn target(&self) -> &str {
        &self.target_url
    }
}
