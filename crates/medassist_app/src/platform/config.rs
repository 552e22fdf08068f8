use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use medassist_core::SessionConfig;
use medassist_engine::DEFAULT_BASE_URL;
use medassist_logging::{LogDestination, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "medassist.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

/// Bootstrap settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub base_url: String,
    pub settle_delay_ms: u64,
    pub download_dir: PathBuf,
    pub log_target: LogTarget,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            settle_delay_ms: medassist_core::DEFAULT_SETTLE_DELAY.as_millis() as u64,
            download_dir: PathBuf::from("."),
            log_target: LogTarget::File,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }

    pub(crate) fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }
}

/// A missing file means defaults; a file that exists must parse.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {path:?}"));
        }
    };
    ron::from_str(&content).with_context(|| format!("failed to parse config {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.settle_delay_ms, 3000);
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("medassist.ron");
        fs::write(
            &path,
            "(base_url: \"http://10.0.0.5:8000\", settle_delay_ms: 0, log_target: Both)",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.session_config().settle_delay, Duration::ZERO);
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert_eq!(
            config.log_destination(),
            LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn invalid_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("medassist.ron");
        fs::write(&path, "(settle_delay_ms: \"soon\")").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
