//! End-to-end question answering
//!
//! classify → link → generate → execute → rank (→ oracle). Every failure on
//! the way degrades to [`SparqlResults::empty_answer`]; nothing propagates to
//! the caller of [`Orchestrator::answer_question`].

use std::sync::{Arc, LazyLock};

use geoqa_types::{
    FilledQuery, GeoOperator, LinkedCandidate, LinkingResult, QueryAndResult, SparqlResults,
};
use regex::Regex;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::benchmark::BenchmarkDataset;
use crate::catalog::TemplateCatalog;
use crate::config::Settings;
use crate::error::{GeoQaError, ServiceError};
use crate::execution::{HttpSparqlEngine, QueryEngine, QueryExecutor};
use crate::generator::QueryGenerator;
use crate::nlp::{LexiconParser, QuestionParser};
use crate::ranking::{AnswerOracle, BenchmarkOracle, Ranker};
use crate::services::{EntityLinker, GeoClassifier, ServiceConnector};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Trim and collapse internal whitespace runs
pub fn clean_question(question: &str) -> String {
    WHITESPACE_RE.replace_all(question.trim(), " ").into_owned()
}

/// Outcome of one question, with the ranked candidates kept for inspection
#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub lang: String,
    pub geo_operator: Option<GeoOperator>,
    pub ranked: Vec<QueryAndResult>,
}

impl QuestionAnswer {
    fn unanswered(question: String, lang: &str) -> Self {
        Self {
            question,
            lang: lang.to_string(),
            geo_operator: None,
            ranked: Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<&QueryAndResult> {
        self.ranked.first()
    }

    /// Result of the top candidate, or the empty answer
    pub fn result(&self) -> SparqlResults {
        self.selected()
            .map(|r| r.result.clone())
            .unwrap_or_else(SparqlResults::empty_answer)
    }

    pub fn is_answered(&self) -> bool {
        self.selected().is_some()
    }
}

pub struct Orchestrator {
    classifier: Arc<dyn GeoClassifier>,
    linker: Arc<dyn EntityLinker>,
    parser: Arc<dyn QuestionParser>,
    generator: QueryGenerator,
    executor: QueryExecutor,
    ranker: Ranker,
    oracle: Option<Arc<dyn AnswerOracle>>,
}

impl Orchestrator {
    pub fn new(
        classifier: Arc<dyn GeoClassifier>,
        linker: Arc<dyn EntityLinker>,
        engine: Arc<dyn QueryEngine>,
        catalog: Arc<TemplateCatalog>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            classifier,
            linker,
            parser: Arc::new(LexiconParser::new()),
            generator: QueryGenerator::new(catalog),
            executor: QueryExecutor::new(engine, max_concurrency),
            ranker: Ranker::new(),
            oracle: None,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn QuestionParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Evaluation only
    pub fn with_oracle(mut self, oracle: Arc<dyn AnswerOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// HTTP collaborators, catalog and (if enabled) the oracle, all from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, GeoQaError> {
        let connector = Arc::new(ServiceConnector::from_settings(settings)?);
        let engine = Arc::new(HttpSparqlEngine::new(&settings.sparql)?);
        let catalog = Arc::new(TemplateCatalog::from_settings(&settings.templates)?);

        let mut orchestrator = Self::new(
            connector.clone(),
            connector,
            engine,
            catalog,
            settings.sparql.max_concurrency,
        );

        if settings.evaluation.oracle_ranking {
            match &settings.evaluation.benchmark_path {
                Some(path) => {
                    let oracle = BenchmarkOracle::from_dataset(&BenchmarkDataset::load(path)?);
                    info!("Oracle ranking enabled with {} gold answers", oracle.len());
                    orchestrator = orchestrator.with_oracle(Arc::new(oracle));
                }
                None => warn!("Oracle ranking requested but no benchmark path configured"),
            }
        }

        Ok(orchestrator)
    }

    pub fn generator(&self) -> &QueryGenerator {
        &self.generator
    }

    /// Queries for an already classified and linked question, without executing them
    pub fn generate(
        &self,
        question: &str,
        operator: GeoOperator,
        linking: &LinkingResult,
    ) -> Vec<FilledQuery> {
        let parsed = self.parser.parse(&clean_question(question));
        self.generator.generate(operator, &parsed, linking)
    }

    /// Answer a question; the language tag is accepted but not used
    pub async fn answer(&self, question: &str, lang: &str) -> QuestionAnswer {
        let cleaned = clean_question(question);
        info!("Question: {}", cleaned);

        match self.run(&cleaned).await {
            Ok((operator, ranked)) => {
                if let Some(top) = ranked.first() {
                    info!("Selected query: {}", top.query.query);
                } else {
                    info!("No candidate survived for '{}'", cleaned);
                }
                QuestionAnswer {
                    question: cleaned,
                    lang: lang.to_string(),
                    geo_operator: Some(operator),
                    ranked,
                }
            }
            Err(e) => {
                error!("Failed to answer '{}': {}", cleaned, e);
                QuestionAnswer::unanswered(cleaned, lang)
            }
        }
    }

    /// SPARQL JSON answer, or the empty answer
    pub async fn answer_question(&self, question: &str, lang: &str) -> SparqlResults {
        self.answer(question, lang).await.result()
    }

    async fn run(&self, cleaned: &str) -> Result<(GeoOperator, Vec<QueryAndResult>), GeoQaError> {
        let classification = self.classifier.classify(cleaned).await?;
        info!("Classification: {:?}", classification.scores);
        let operator = classification
            .best_operator()
            .ok_or(ServiceError::NoOperator)?;
        info!("Geo-operator: {}", operator);

        let linking = self.linker.link(cleaned).await?;
        info!("Linked classes: {:?}", labels(linking.classes()));
        info!("Linked entities: {:?}", labels(linking.entities()));

        let parsed = self.parser.parse(cleaned);
        let queries = self.generator.generate(operator, &parsed, &linking);
        if queries.is_empty() {
            return Ok((operator, Vec::new()));
        }

        let executed = self.executor.execute_all(queries).await;
        let mut ranked = self.ranker.rank(executed);

        if let Some(oracle) = &self.oracle {
            if !ranked.is_empty() {
                ranked = oracle.rerank(cleaned, ranked);
            }
        }

        Ok((operator, ranked))
    }
}

fn labels(candidates: &[LinkedCandidate]) -> Vec<String> {
    candidates.iter().map(|c| c.to_string()).collect()
}
