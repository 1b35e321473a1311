//! Error handling for the geographic question answering pipeline
//!
//! One enum per stage, collected under [`GeoQaError`]. None of these cross
//! the answering boundary: the orchestrator logs them and degrades to the
//! empty answer.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for geoqa
#[derive(Error, Debug)]
pub enum GeoQaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Template catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Query execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Benchmark error: {0}")]
    Benchmark(#[from] BenchmarkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Settings loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid URL for {service}: {source}")]
    InvalidUrl {
        service: String,
        source: url::ParseError,
    },
}

/// Template catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read template catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse template catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown geo-operator '{0}' in template catalog")]
    UnknownOperator(String),

    #[error("Template '{key}' could not be parsed: {message}")]
    Syntax { key: String, message: String },

    #[error("Template '{key}' contains unknown placeholder '{token}'")]
    UnknownPlaceholder { key: String, token: String },

    #[error("Template '{key}' declares invalid output variable '{variable}'")]
    InvalidVariable { key: String, variable: String },

    #[error("Placeholder {token} has no value")]
    UnboundPlaceholder { token: &'static str },
}

/// Classifier and linker service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to connect to {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("Undecodable response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Classification named no known geo-operator")]
    NoOperator,
}

/// Errors from running a single query against the SPARQL endpoint
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to reach {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Undecodable result from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

/// Benchmark dataset errors
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Failed to read benchmark {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse benchmark: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeoQaError>;
