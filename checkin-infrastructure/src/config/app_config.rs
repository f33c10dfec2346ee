use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use checkin_domain::RuntimeConfig;

use crate::services::{ScannerConfig, ScannerMode};

pub const CONFIG_ENV: &str = "CHECKIN_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub roster_dir: String,
    pub decode_delay_ms: u64,
    pub scanner_mode: ScannerMode,
    pub session_idle_timeout_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            roster_dir: "./rosters".to_string(),
            decode_delay_ms: 1500,
            scanner_mode: ScannerMode::Simulated,
            session_idle_timeout_seconds: 300,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(file_path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.roster_dir = resolve_path(base, &self.roster_dir);
        self.log_dir = self.log_dir.as_deref().map(|dir| resolve_path(base, dir));
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.roster_dir.trim().is_empty() {
            return Err(anyhow!("roster_dir must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.session_idle_timeout_seconds == 0 {
            return Err(anyhow!("session_idle_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            session_idle_timeout_seconds: self.session_idle_timeout_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            mode: self.scanner_mode,
            decode_delay_ms: self.decode_delay_ms,
            queue_path: Path::new(&self.roster_dir)
                .join("scan_queue.txt")
                .to_string_lossy()
                .to_string(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("CHECKIN_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("CHECKIN_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("CHECKIN_ROSTER_DIR") {
            self.roster_dir = value;
        }
        if let Ok(value) = env::var("CHECKIN_DECODE_DELAY_MS") {
            self.decode_delay_ms = value.parse().unwrap_or(self.decode_delay_ms);
        }
        if let Ok(value) = env::var("CHECKIN_SCANNER_MODE") {
            match ScannerMode::parse(&value) {
                Some(mode) => self.scanner_mode = mode,
                None => warn!("ignoring unknown CHECKIN_SCANNER_MODE '{}'", value),
            }
        }
        if let Ok(value) = env::var("CHECKIN_SESSION_IDLE_TIMEOUT_SECONDS") {
            self.session_idle_timeout_seconds =
                value.parse().unwrap_or(self.session_idle_timeout_seconds);
        }
        if let Ok(value) = env::var("CHECKIN_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("CHECKIN_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("CHECKIN_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:8080"
api_token = "  "
scanner_mode = "denied"
decode_delay_ms = 10
"#,
        )
        .expect("parse");
        let mut config = config;
        config.normalize();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.api_token, None);
        assert_eq!(config.scanner_mode, ScannerMode::Denied);
        assert_eq!(config.roster_dir, "./rosters");
        assert_eq!(config.session_idle_timeout_seconds, 300);
        config.validate().expect("valid");
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = AppConfig {
            log_dir: Some("logs".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/checkin")));
        assert_eq!(config.roster_dir, "/etc/checkin/./rosters");
        assert_eq!(config.log_dir.as_deref(), Some("/etc/checkin/logs"));
        assert_eq!(
            config.to_scanner_config().queue_path,
            "/etc/checkin/./rosters/scan_queue.txt"
        );
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let config = AppConfig {
            bind_addr: "not-an-address".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
