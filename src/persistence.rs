use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::PersistenceError;

/// Renders a duration the way it is persisted and reported, e.g. `20ms`.
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

/// Durable single-slot store for the latest computed average. One writer
/// (the measurement loop), arbitrarily many concurrent readers.
#[async_trait]
pub trait AverageSink: Send + Sync {
    /// Fully replaces the stored record with the textual form of `average`.
    async fn save(&self, average: Duration) -> Result<(), PersistenceError>;

    /// First line of the most recently saved record.
    async fn load(&self) -> Result<String, PersistenceError>;
}

/// File-backed sink. Writes go to a sibling temp file first and are
/// renamed into place, so a concurrent reader observes either the previous
/// or the current record, never a partial write.
pub struct FileAverageSink {
    path: PathBuf,
}

impl FileAverageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl AverageSink for FileAverageSink {
    async fn save(&self, average: Duration) -> Result<(), PersistenceError> {
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, format_duration(average))
            .await
            .map_err(PersistenceError::Write)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(PersistenceError::Write)
    }

    async fn load(&self) -> Result<String, PersistenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PersistenceError::RecordMissing)
            }
            Err(e) => return Err(PersistenceError::Read(e)),
        };

        content
            .lines()
            .next()
            .map(|line| line.to_string())
            .ok_or(PersistenceError::EmptyRecord)
    }
}

/// In-memory sink for tests.
#[cfg(test)]
pub(crate) struct MemoryAverageSink {
    record: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryAverageSink {
    pub(crate) fn new() -> Self {
        Self {
            record: std::sync::Mutex::new(None),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl AverageSink for MemoryAverageSink {
    async fn save(&self, average: Duration) -> Result<(), PersistenceError> {
        *self.record.lock().unwrap() = Some(format_duration(average));
        Ok(())
    }

    async fn load(&self) -> Result<String, PersistenceError> {
        self.record
            .lock()
            .unwrap()
            .clone()
            .ok_or(PersistenceError::RecordMissing)
    }
}
