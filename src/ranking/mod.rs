//! Ranker
//!
//! Heuristic ordering of executed candidates, with an optional oracle
//! reranking step for benchmark evaluation.

mod oracle;

pub use oracle::{AnswerOracle, BenchmarkOracle};

use geoqa_types::QueryAndResult;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct Ranker;

impl Ranker {
    pub fn new() -> Self {
        Self
    }

    /// Σ multiplier + Σ chars(originalTerm) over the used candidates; ASK scores 0
    pub fn score(&self, candidate: &QueryAndResult) -> f64 {
        if candidate.query.is_ask() {
            return 0.0;
        }
        candidate
            .query
            .used
            .iter()
            .map(|c| c.multiplier() + c.original_term().chars().count() as f64)
            .sum()
    }

    /// Score every candidate and sort best-first. Ties keep input order.
    pub fn rank(&self, mut candidates: Vec<QueryAndResult>) -> Vec<QueryAndResult> {
        for candidate in &mut candidates {
            candidate.ranking_score = self.score(candidate);
            debug!("{:>6.1}  {}", candidate.ranking_score, candidate.query.query);
        }
        candidates.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));
        candidates
    }
}
