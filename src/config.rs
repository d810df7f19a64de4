use crate::constants::*;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable settings shared by the pipeline and the query service.
///
/// Built once at startup and handed to each component; nothing reads the
/// environment after `Config::load` returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rent_index_path: PathBuf,
    pub geo_api_url: String,
    pub rating_site_url: String,
    pub database_url: String,
    pub resources_folder: PathBuf,
    pub http_timeout_secs: u64,
    pub enrich_concurrency: usize,
    pub host: String,
    pub port: u16,
    pub log_dir: PathBuf,
    /// Prometheus listener address; no exporter is installed when unset.
    pub metrics_addr: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rent_index_path: PathBuf::from(DEFAULT_RENT_INDEX_PATH),
            geo_api_url: DEFAULT_GEO_API_URL.to_string(),
            rating_site_url: DEFAULT_RATING_SITE_URL.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            resources_folder: PathBuf::from(DEFAULT_RESOURCES_FOLDER),
            http_timeout_secs: 30,
            enrich_concurrency: 4,
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_dir: PathBuf::from("logs"),
            metrics_addr: None,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml` when present, then `.env` and the process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let config_path = Path::new(DEFAULT_CONFIG_FILE);
        let file_content = if config_path.exists() {
            Some(fs::read_to_string(config_path).map_err(|e| {
                ScraperError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?)
        } else {
            None
        };

        Self::from_sources(file_content.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(toml_content: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = match toml_content {
            Some(content) => toml::from_str(content)?,
            None => Config::default(),
        };

        if let Some(v) = env(ENV_RENT_INDEX_PATH) {
            config.rent_index_path = PathBuf::from(v);
        }
        if let Some(v) = env(ENV_GEO_API_URL) {
            config.geo_api_url = v;
        }
        if let Some(v) = env(ENV_RATING_SITE_URL) {
            config.rating_site_url = v;
        }
        if let Some(v) = env(ENV_DATABASE_URL) {
            config.database_url = v;
        }
        if let Some(v) = env(ENV_RESOURCES_FOLDER) {
            config.resources_folder = PathBuf::from(v);
        }
        if let Some(v) = env(ENV_ENRICH_CONCURRENCY) {
            config.enrich_concurrency = parse_number(ENV_ENRICH_CONCURRENCY, &v)?;
        }
        if let Some(v) = env(ENV_HTTP_TIMEOUT_SECS) {
            config.http_timeout_secs = parse_number(ENV_HTTP_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = env(ENV_PORT) {
            config.port = parse_number(ENV_PORT, &v)?;
        }
        if let Some(v) = env(ENV_METRICS_ADDR) {
            config.metrics_addr = Some(v);
        }

        if config.enrich_concurrency == 0 {
            return Err(ScraperError::Config(
                "enrich_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resources_folder.join(DATASET_FILE_NAME)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScraperError::Config(format!("{key} must be a number, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_sources() {
        let config = Config::from_sources(None, env_from(&[])).unwrap();
        assert_eq!(config.geo_api_url, "https://geo.api.gouv.fr");
        assert_eq!(config.dataset_path(), PathBuf::from("./ressources/results.json"));
        assert_eq!(config.enrich_concurrency, 4);
        assert!(config.metrics_addr.is_none());
    }

    #[test]
    fn toml_then_env_overrides() {
        let toml = r#"
            geo_api_url = "http://geo.local"
            port = 9000
        "#;
        let config = Config::from_sources(
            Some(toml),
            env_from(&[("PORT", "9100"), ("RESSOURCES_FOLDER", "/data")]),
        )
        .unwrap();
        assert_eq!(config.geo_api_url, "http://geo.local");
        assert_eq!(config.port, 9100);
        assert_eq!(config.dataset_path(), PathBuf::from("/data/results.json"));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_sources(None, env_from(&[("ENRICH_CONCURRENCY", "many")]))
            .unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));

        let err = Config::from_sources(None, env_from(&[("ENRICH_CONCURRENCY", "0")]))
            .unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }
}
