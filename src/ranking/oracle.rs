//! Oracle reranking (evaluation only)
//!
//! Looks up the question's gold answer and moves the first candidate whose
//! result agrees with it to the front. Fails open: with no gold entry or no
//! agreeing candidate the heuristic order is returned untouched.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use geoqa_types::QueryAndResult;
use tracing::info;

use crate::benchmark::{AnswerType, BenchmarkDataset, GoldAnswer};
use crate::error::BenchmarkError;

pub trait AnswerOracle: Send + Sync {
    /// Reorder ranked candidates for a (cleaned) question
    fn rerank(&self, question: &str, ranked: Vec<QueryAndResult>) -> Vec<QueryAndResult>;
}

/// Oracle backed by the gold answers of a benchmark dataset
#[derive(Debug, Clone, Default)]
pub struct BenchmarkOracle {
    gold: HashMap<String, GoldAnswer>,
}

impl BenchmarkOracle {
    pub fn new(gold: HashMap<String, GoldAnswer>) -> Self {
        Self { gold }
    }

    pub fn from_dataset(dataset: &BenchmarkDataset) -> Self {
        Self::new(dataset.gold_answers())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchmarkError> {
        Ok(Self::from_dataset(&BenchmarkDataset::load(path)?))
    }

    pub fn len(&self) -> usize {
        self.gold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gold.is_empty()
    }

    /// Index of the candidate agreeing with the gold answer
    pub fn best_match(gold: &GoldAnswer, candidates: &[QueryAndResult]) -> Option<usize> {
        match gold.answer_type {
            AnswerType::Boolean => {
                let expected = gold.boolean()?;
                candidates
                    .iter()
                    .position(|c| c.result.boolean == Some(expected))
            }
            AnswerType::Number => {
                let expected = gold.values().into_iter().next()?;
                candidates
                    .iter()
                    .position(|c| c.result.answer_strings().contains(&expected))
            }
            AnswerType::Resource => {
                let expected: HashSet<String> = gold.values().into_iter().collect();
                let mut best: Option<(usize, usize)> = None;
                for (i, c) in candidates.iter().enumerate() {
                    let common = c
                        .result
                        .answer_strings()
                        .into_iter()
                        .collect::<HashSet<_>>()
                        .intersection(&expected)
                        .count();
                    if common > best.map_or(0, |(_, n)| n) {
                        best = Some((i, common));
                    }
                }
                best.map(|(i, _)| i)
            }
            AnswerType::Other => None,
        }
    }
}

impl AnswerOracle for BenchmarkOracle {
    fn rerank(&self, question: &str, mut ranked: Vec<QueryAndResult>) -> Vec<QueryAndResult> {
        let Some(gold) = self.gold.get(question) else {
            info!("Oracle: no gold answer for '{}'", question);
            return ranked;
        };

        match Self::best_match(gold, &ranked) {
            Some(index) => {
                let chosen = ranked.remove(index);
                ranked.insert(0, chosen);
            }
            None => info!("Oracle: no candidate matches the gold answer for '{}'", question),
        }
        ranked
    }
}
