//! Structural pre-filter
//!
//! Operator/geometry combinations that cannot hold are dropped before they
//! reach the endpoint.

use geoqa_types::{FilledQuery, GeoOperator};

/// Whether a query is worth executing, from its operator and used entities only.
///
/// - Borders / Crossing: no used entity may be a point
/// - Containment: some used entity must be a way or relation; queries with
///   no used entities (class-only) pass
/// - Proximity: always passes
pub fn passes_structural_filter(query: &FilledQuery) -> bool {
    let entities = &query.used.entities;
    match query.geo_operator {
        GeoOperator::Border | GeoOperator::Crossing => !entities.iter().any(|e| e.is_point()),
        GeoOperator::Containment => {
            entities.is_empty() || entities.iter().any(|e| e.is_non_point())
        }
        GeoOperator::Proximity => true,
    }
}
