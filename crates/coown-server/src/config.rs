//! Server configuration, loaded from a TOML file.

use std::path::Path;

use coown_agreements::AgreementConfig;
use coown_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DbConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address for the JSON API.
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Largest accepted template body in bytes.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
    #[serde(default = "default_max_required_signatures")]
    pub max_required_signatures: u32,
    /// Insert the canonical templates when the store is empty.
    #[serde(default = "default_true")]
    pub seed_on_startup: bool,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_content_bytes() -> usize {
    AgreementConfig::default().max_content_bytes
}

fn default_max_required_signatures() -> u32 {
    AgreementConfig::default().max_required_signatures
}

fn default_true() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: default_max_content_bytes(),
            max_required_signatures: default_max_required_signatures(),
            seed_on_startup: true,
        }
    }
}

impl TemplatesConfig {
    pub fn agreement_config(&self) -> AgreementConfig {
        AgreementConfig {
            max_content_bytes: self.max_content_bytes,
            max_required_signatures: self.max_required_signatures,
        }
    }
}

impl ServerConfig {
    /// Parse `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [http]
            bind = "127.0.0.1:9000"

            [database]
            url = "db.internal:8000"

            [templates]
            seed_on_startup = false
            "#,
        )
        .unwrap();

        assert_eq!(config.http.bind, "127.0.0.1:9000");
        assert_eq!(config.database.url, "db.internal:8000");
        assert_eq!(config.database.namespace, "coown");
        assert!(!config.templates.seed_on_startup);
        assert_eq!(config.templates.max_content_bytes, 256 * 1024);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = ServerConfig::load(Path::new("/nonexistent/coown.toml")).unwrap();
        assert_eq!(config.http.bind, "0.0.0.0:8080");
        assert!(config.templates.seed_on_startup);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = toml::from_str::<ServerConfig>("[http]\nbind = 8080").unwrap_err();
        assert!(!ConfigError::from(err).to_string().is_empty());
    }
}
