//! Runtime configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use crate::rfo::render::RenderStrategy;
use crate::rfo::ticket::DEFAULT_TICKET_PREFIX;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub ticket_prefix: String,
    pub renderer: RenderStrategy,
    /// Directory holding the persisted "current logo". `None` keeps it in memory.
    pub logo_dir: Option<PathBuf>,
    pub typst_bin: String,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ticket_prefix: DEFAULT_TICKET_PREFIX.to_string(),
            renderer: RenderStrategy::Canvas,
            logo_dir: None,
            typst_bin: "typst".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let port = match env::var("RFO_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "RFO_PORT",
                value: raw,
            })?,
            Err(_) => defaults.port,
        };

        let renderer = match env::var("RFO_RENDERER") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "RFO_RENDERER",
                value: raw,
            })?,
            Err(_) => defaults.renderer,
        };

        let allowed_origins = env::var("RFO_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: non_empty_var("RFO_HOST").unwrap_or(defaults.host),
            port,
            ticket_prefix: non_empty_var("RFO_TICKET_PREFIX").unwrap_or(defaults.ticket_prefix),
            renderer,
            logo_dir: non_empty_var("RFO_LOGO_DIR").map(PathBuf::from),
            typst_bin: non_empty_var("TYPST_BIN").unwrap_or(defaults.typst_bin),
            allowed_origins,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.ticket_prefix, "TO/DIV/RE");
        assert_eq!(config.renderer, RenderStrategy::Canvas);
        assert!(config.logo_dir.is_none());
    }
}
