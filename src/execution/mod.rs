//! Execution & Pre-Filter
//!
//! FilledQuery → QueryAndResult. Structurally unsound candidates are dropped
//! before execution, failed and empty SELECT candidates after it.

mod engine;
mod prefilter;

pub use engine::{HttpSparqlEngine, QueryEngine};
pub use prefilter::passes_structural_filter;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use geoqa_types::{FilledQuery, QueryAndResult};
use tracing::{debug, error, info};

pub struct QueryExecutor {
    engine: Arc<dyn QueryEngine>,
    max_concurrency: usize,
}

impl QueryExecutor {
    pub fn new(engine: Arc<dyn QueryEngine>, max_concurrency: usize) -> Self {
        Self {
            engine,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Run every candidate that passes the pre-filter.
    ///
    /// Results keep generation order regardless of completion order.
    pub async fn execute_all(&self, queries: Vec<FilledQuery>) -> Vec<QueryAndResult> {
        let total = queries.len();
        let candidates: Vec<FilledQuery> = queries
            .into_iter()
            .filter(|q| {
                let keep = passes_structural_filter(q);
                if !keep {
                    debug!("Pre-filter discarded: {}", q.query);
                }
                keep
            })
            .collect();
        info!(
            "Executing {} of {} queries against {}",
            candidates.len(),
            total,
            self.engine.endpoint()
        );

        let engine = &self.engine;
        let executed: Vec<Option<QueryAndResult>> = stream::iter(candidates)
            .map(|query| async move {
                match engine.execute(&query.query).await {
                    Ok(result) => Some(QueryAndResult::new(query, result)),
                    Err(e) => {
                        error!("Query failed: {}\n{}", e, query.query);
                        None
                    }
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        executed
            .into_iter()
            .flatten()
            .filter(|qr| {
                let keep = qr.query.is_ask() || qr.result.binding_count() > 0;
                if !keep {
                    debug!("Empty result dropped: {}", qr.query.query);
                }
                keep
            })
            .collect()
    }
}
