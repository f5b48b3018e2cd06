use crate::config::{AppConfig, ConfigManager};
use crate::errors::ConfigError;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.probe.target_url = "http://target.test/".to_string();
        config
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();

        assert_eq!(config.probe.interval_secs, 10);
        assert_eq!(config.probe.timeout_secs, 5);
        assert!(config.probe.target_url.is_empty());
        assert!(!config.report.enabled);
        assert_eq!(config.report.port, 3000);
        assert_eq!(config.persistence.record_path, PathBuf::from("latency.log"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_accepts_minimal_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_target_url() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyTargetUrl)));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = valid_config();
        config.probe.interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidInterval)));
    }

    #[test]
    fn test_validate_rejects_zero_probe_timeout() {
        let mut config = valid_config();
        config.probe.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbeTimeout)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_report_port() {
        let mut config = valid_config();
        config.report.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidReportPort)
        ));
    }

    #[tokio::test]
    async fn test_load_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latency_checker.toml");
        std::fs::write(
            &path,
            r#"
[probe]
target_url = "http://target.test/"
interval_secs = 2

[report]
enabled = true
"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new(path);
        manager.load().await.unwrap();
        let config = manager.into_config();

        assert_eq!(config.probe.target_url, "http://target.test/");
        assert_eq!(config.probe.interval_secs, 2);
        assert!(config.report.enabled);
        // untouched fields keep their defaults
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.report.port, 3000);
    }

    #[tokio::test]
    async fn test_missing_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));

        manager.load().await.unwrap();
        assert_eq!(manager.get_config().probe.interval_secs, 10);
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latency_checker.toml");
        std::fs::write(&path, "probe = nonsense[").unwrap();

        let mut manager = ConfigManager::new(path);
        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
