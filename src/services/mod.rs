//! External collaborators: geo-operator classifier and linker
//!
//! Both are injected into the orchestrator as `Arc<dyn Trait>` so tests and
//! offline tools can swap the HTTP clients for stubs.

mod connector;

pub use connector::ServiceConnector;

use std::collections::BTreeMap;

use async_trait::async_trait;
use geoqa_types::{GeoOperator, LinkingResult};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Classifier output: score per geo-operator label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "result", default)]
    pub scores: BTreeMap<String, f64>,
}

impl Classification {
    pub fn new<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            scores: scores.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Highest-scoring recognised label; unknown labels are ignored
    pub fn best_operator(&self) -> Option<GeoOperator> {
        self.scores
            .iter()
            .filter_map(|(label, score)| label.parse::<GeoOperator>().ok().map(|op| (op, *score)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(op, _)| op)
    }
}

#[async_trait]
pub trait GeoClassifier: Send + Sync {
    async fn classify(&self, question: &str) -> Result<Classification, ServiceError>;
}

#[async_trait]
pub trait EntityLinker: Send + Sync {
    async fn link(&self, question: &str) -> Result<LinkingResult, ServiceError>;
}
