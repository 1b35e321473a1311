//! Settings
//!
//! Loaded from YAML (`GEOQA_CONFIG`, default `config/geoqa.yaml`), then
//! overridden from the environment. A missing file means built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "GEOQA_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/geoqa.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub classifier: ServiceEndpoint,
    pub linker: ServiceEndpoint,
    pub sparql: SparqlSettings,
    pub templates: TemplateSettings,
    pub evaluation: EvaluationSettings,
}

/// Location of an HTTP collaborator, `scheme://host:port/endpoint`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoint {
    pub scheme: String,
    pub host: String,
    /// Falls back to the service's well-known port
    pub port: Option<u16>,
    /// Falls back to the service's well-known path
    pub endpoint: Option<String>,
    /// Full URL; wins over the individual parts when set
    pub url: Option<String>,
}

impl ServiceEndpoint {
    pub fn new(scheme: &str, host: &str, port: u16, endpoint: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port: Some(port),
            endpoint: Some(endpoint.to_string()),
            url: None,
        }
    }

    fn resolve(
        &self,
        service: &str,
        default_port: u16,
        default_endpoint: &str,
    ) -> Result<Url, ConfigError> {
        let raw = match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "{}://{}:{}/{}",
                self.scheme,
                self.host,
                self.port.unwrap_or(default_port),
                self.endpoint
                    .as_deref()
                    .unwrap_or(default_endpoint)
                    .trim_start_matches('/')
            ),
        };
        Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
            service: service.to_string(),
            source,
        })
    }
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: None,
            endpoint: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparqlSettings {
    pub endpoint: String,
    /// Per-query timeout; a timed out query is dropped like any failed one
    pub timeout_secs: u64,
    /// Candidate queries in flight at once
    pub max_concurrency: usize,
}

impl Default for SparqlSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3030/bremen_geo/sparql".to_string(),
            timeout_secs: 30,
            max_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Catalog file; the packaged catalog is used when unset
    pub path: Option<PathBuf>,
}

/// Evaluation-only switches. All off in production.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub ablation_classification: bool,
    pub ablation_linking: bool,
    pub oracle_ranking: bool,
    pub benchmark_path: Option<PathBuf>,
}

impl Settings {
    /// Geo-operator classifier URL (default port 9091, path `classify`)
    pub fn classifier_url(&self) -> Result<Url, ConfigError> {
        self.classifier.resolve("classifier", 9091, "classify")
    }

    /// Entity/class/relation linker URL (default port 9092, path `link`)
    pub fn linker_url(&self) -> Result<Url, ConfigError> {
        self.linker.resolve("linker", 9092, "link")
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading settings from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `GEOQA_CONFIG` (or the default path) and apply environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut settings = if Path::new(&path).exists() {
            Self::load(&path)?
        } else {
            info!("No settings file at {}, using defaults", path);
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply `GEOQA_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("GEOQA_SPARQL_ENDPOINT") {
            self.sparql.endpoint = endpoint;
        }
        if let Some(url) = lookup("GEOQA_CLASSIFIER_URL") {
            self.classifier.url = Some(url);
        }
        if let Some(url) = lookup("GEOQA_LINKER_URL") {
            self.linker.url = Some(url);
        }
        if let Some(path) = lookup("GEOQA_BENCHMARK_PATH") {
            self.evaluation.benchmark_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup("GEOQA_ORACLE_RANKING") {
            self.evaluation.oracle_ranking =
                matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
    }
}
