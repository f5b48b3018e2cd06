use crate::errors::PersistenceError;
use crate::persistence::{format_duration, AverageSink, FileAverageSink};
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn sink_in(dir: &TempDir) -> FileAverageSink {
        FileAverageSink::new(dir.path().join("latency.log"))
    }

    #[test]
    fn test_format_duration_renders_compact_units() {
        assert_eq!(format_duration(Duration::from_millis(20)), "20ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2s");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let sink = sink_in(&dir);

        assert_ok!(sink.save(Duration::from_millis(20)).await);
        assert_eq!(sink.load().await.unwrap(), "20ms");
    }

    #[tokio::test]
    async fn test_save_fully_replaces_previous_record() {
        let dir = TempDir::new().unwrap();
        let sink = sink_in(&dir);

        sink.save(Duration::from_millis(5)).await.unwrap();
        sink.save(Duration::from_millis(12)).await.unwrap();

        assert_eq!(sink.load().await.unwrap(), "12ms");
        // the raw record holds only the latest value, never a concatenation
        let raw = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(raw, "12ms");
    }

    #[tokio::test]
    async fn test_load_returns_first_line_only() {
        let dir = TempDir::new().unwrap();
        let sink = sink_in(&dir);

        std::fs::write(sink.path(), "20ms\nstale second line").unwrap();
        assert_eq!(sink.load().await.unwrap(), "20ms");
    }

    #[tokio::test]
    async fn test_load_missing_record() {
        let dir = TempDir::new().unwrap();
        let sink = sink_in(&dir);

        let err = sink.load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::RecordMissing));
    }

    #[tokio::test]
    async fn test_load_empty_record() {
        let dir = TempDir::new().unwrap();
        let sink = sink_in(&dir);

        std::fs::write(sink.path(), "").unwrap();
        let err = sink.load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::EmptyRecord));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let sink = FileAverageSink::new("/nonexistent-latency-checker-dir/latency.log");

        let err = sink.save(Duration::from_millis(5)).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Write(_)));
    }
}
