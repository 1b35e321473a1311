//! GeoQA - Geographic Question Answering
//!
//! Translates natural-language geographic questions into GeoSPARQL queries,
//! runs the candidates against a SPARQL endpoint and returns the best
//! supported answer.
//!
//! ## Pipeline
//!
//! ```text
//! question ─► classifier ─► geo-operator ─┐
//!          └► linker ─► LinkingResult ────┴► QueryGenerator ─► QueryExecutor ─► Ranker
//! ```
//!
//! ## Modules
//!
//! - `catalog`: template catalog (`operator → pattern key → template`)
//! - `generator`: pattern keys, template filling and query assembly
//! - `execution`: structural pre-filter and SPARQL execution
//! - `ranking`: heuristic ranking and the evaluation oracle
//! - `services`: classifier and linker clients
//! - `orchestrator`: end-to-end answering
//! - `api`: HTTP front end (feature `server`)

pub mod benchmark;
pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod generator;
pub mod nlp;
pub mod orchestrator;
pub mod ranking;
pub mod services;

#[cfg(feature = "server")]
pub mod api;

// Re-export foundation types
pub use geoqa_types::{
    Category, FilledQuery, GeoOperator, GeometryKind, LinkedCandidate, LinkingResult,
    QueryAndResult, QueryForm, SparqlResults, TriplePatternKey,
};

pub use catalog::TemplateCatalog;
pub use config::Settings;
pub use error::{GeoQaError, Result};
pub use execution::{HttpSparqlEngine, QueryEngine, QueryExecutor};
pub use generator::QueryGenerator;
pub use orchestrator::{clean_question, Orchestrator, QuestionAnswer};
pub use ranking::{AnswerOracle, BenchmarkOracle, Ranker};
pub use services::{Classification, EntityLinker, GeoClassifier, ServiceConnector};
