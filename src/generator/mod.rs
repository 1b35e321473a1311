//! Query Generation
//!
//! Linking result + geo-operator + parsed question → executable queries.
//!
//! ```text
//! LinkingResult ─► triple_pattern_keys ─► catalog lookup ─► FilledPattern
//!                                                    (relation variants)
//!                                                             │
//!                                    QueryModifiers::assemble ◄┘ ─► FilledQuery
//! ```
//!
//! Pure apart from reading the shared, immutable [`TemplateCatalog`].

pub mod anatomy;
pub mod filler;
pub mod patterns;

pub use anatomy::{QueryModifiers, PREFIXES};
pub use filler::FilledPattern;
pub use patterns::triple_pattern_keys;

use std::collections::BTreeSet;
use std::sync::Arc;

use geoqa_types::{
    Category, FilledQuery, GeoOperator, LinkedCandidate, LinkingResult, PatternTemplate,
    TriplePatternKey,
};
use tracing::{debug, info, warn};

use crate::catalog::TemplateCatalog;
use crate::nlp::ParsedQuestion;

pub struct QueryGenerator {
    catalog: Arc<TemplateCatalog>,
}

impl QueryGenerator {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Every candidate query for the question, in generation order
    pub fn generate(
        &self,
        operator: GeoOperator,
        parsed: &ParsedQuestion,
        linking: &LinkingResult,
    ) -> Vec<FilledQuery> {
        let keys = triple_pattern_keys(linking);
        if keys.is_empty() {
            info!("No linkable anchors in '{}'", parsed.text());
            return Vec::new();
        }
        info!(
            "Triple patterns: {}",
            keys.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
        );

        let modifiers = QueryModifiers::from_question(parsed);
        let patterns = self.fill_patterns(operator, &keys, linking, &modifiers);

        let distance = (operator == GeoOperator::Proximity).then_some(modifiers.distance);
        let mut queries = Vec::new();
        for pattern in patterns {
            let where_clause = match pattern.render(distance) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping pattern: {}", e);
                    continue;
                }
            };
            let Some(query) =
                modifiers.assemble(&where_clause, pattern.variable(), pattern.value_variable())
            else {
                debug!("Skipping pattern without a projected variable");
                continue;
            };

            queries.push(FilledQuery {
                query,
                form: modifiers.form,
                question: parsed.text().to_string(),
                geo_operator: operator,
                used: pattern.into_used(),
            });
        }

        info!("Generated {} queries", queries.len());
        queries
    }

    /// Filled patterns for every key with a template.
    ///
    /// A bound pattern is replaced by its relation variants, one per linked
    /// relation. With a comparative in the question a variant needs a
    /// threshold, and relations without one are dropped. The relation-free
    /// pattern is kept only when no variant survives.
    pub fn fill_patterns(
        &self,
        operator: GeoOperator,
        keys: &BTreeSet<TriplePatternKey>,
        linking: &LinkingResult,
        modifiers: &QueryModifiers,
    ) -> Vec<FilledPattern> {
        let filter = match modifiers.comparison {
            Some(comparison) => match comparison.filter_clause() {
                Some(clause) => RelationFilter::Threshold(clause),
                None => RelationFilter::Unconstrained,
            },
            None => RelationFilter::None,
        };

        let mut filled = Vec::new();
        for key in keys {
            let Some(template) = self.catalog.lookup(operator, key) else {
                continue;
            };
            info!("Basic pattern: {}", key.lookup_key(operator.pattern_infix()));

            for base in bind_combinations(template, key, linking) {
                let variants: Vec<FilledPattern> = linking
                    .relations()
                    .iter()
                    .filter_map(|relation| match &filter {
                        RelationFilter::None => base.with_relation(relation, None),
                        RelationFilter::Threshold(clause) => {
                            base.with_relation(relation, Some(clause))
                        }
                        RelationFilter::Unconstrained => {
                            debug!("No threshold for relation {}", relation.uri());
                            None
                        }
                    })
                    .collect();

                if variants.is_empty() {
                    filled.push(base);
                } else {
                    filled.extend(variants);
                }
            }
        }
        filled
    }
}

/// What a comparative in the question asks of relation variants
enum RelationFilter {
    /// No comparative: relation values are bound without a filter
    None,
    Threshold(String),
    /// Comparative without a number to compare against
    Unconstrained,
}

/// Cartesian product of the key's candidate sets, self-pairs dropped
fn bind_combinations(
    template: &PatternTemplate,
    key: &TriplePatternKey,
    linking: &LinkingResult,
) -> Vec<FilledPattern> {
    let first = anchor_candidates(linking, key.first());

    let combinations: Vec<Vec<&LinkedCandidate>> = match key.second() {
        None => first.iter().map(|c| vec![c]).collect(),
        Some(second) => {
            let second = anchor_candidates(linking, second);
            first
                .iter()
                .flat_map(|a| second.iter().map(move |b| (a, b)))
                .filter(|(a, b)| !std::ptr::eq(*a, *b) && !a.shares_position_with(b))
                .map(|(a, b)| vec![a, b])
                .collect()
        }
    };

    combinations
        .into_iter()
        .filter_map(|combination| match FilledPattern::bind(template, &combination) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Cannot bind {}: {}", key, e);
                None
            }
        })
        .collect()
}

fn anchor_candidates(linking: &LinkingResult, category: Category) -> &[LinkedCandidate] {
    match category {
        Category::Class | Category::Entity => linking.candidates(category),
        Category::Relation => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LexiconParser, QuestionParser};
    use geoqa_types::{GeometryKind, QueryForm};

    fn generator() -> QueryGenerator {
        QueryGenerator::new(Arc::new(TemplateCatalog::builtin().unwrap()))
    }

    fn generate(op: GeoOperator, question: &str, linking: &LinkingResult) -> Vec<FilledQuery> {
        let parsed = LexiconParser::new().parse(question);
        generator().generate(op, &parsed, linking)
    }

    fn driving_schools(entity_kind: GeometryKind) -> LinkingResult {
        LinkingResult::from_candidates(
            "Are there any driving schools in Blumenthal?",
            [
                LinkedCandidate::new(
                    Category::Class,
                    "http://linkedgeodata.org/ontology/DrivingSchool",
                    "driving school",
                )
                .with_original_term("driving schools")
                .with_multiplier(2.0)
                .at_positions([3]),
                LinkedCandidate::new(
                    Category::Entity,
                    "http://linkedgeodata.org/triplify/way23794396",
                    "Blumenthal",
                )
                .with_original_term("Blumenthal")
                .with_multiplier(3.0)
                .with_geometry(entity_kind)
                .at_positions([6]),
            ],
        )
    }

    #[test]
    fn test_driving_schools_in_blumenthal() {
        let linking = driving_schools(GeometryKind::Way);
        let queries = generate(GeoOperator::Containment, linking.input_text(), &linking);

        assert_eq!(queries.len(), 1);
        let q = &queries[0];
        assert_eq!(q.form, QueryForm::Ask);
        assert!(q.query.contains("ASK  WHERE {"));
        assert!(q.query.contains("<http://linkedgeodata.org/ontology/DrivingSchool>"));
        assert!(q.query.contains("<http://linkedgeodata.org/triplify/way23794396>"));
        assert!(q.query.contains("geof:sfContains"));
        assert!(!q.query.contains("__"));
        assert_eq!(q.used.classes.len(), 1);
        assert_eq!(q.used.entities.len(), 1);
        assert_eq!(q.geo_operator, GeoOperator::Containment);
    }

    #[test]
    fn test_self_pairs_are_dropped() {
        let a = LinkedCandidate::new(Category::Entity, "http://lgd/A", "A").at_positions([1]);
        let b = LinkedCandidate::new(Category::Entity, "http://lgd/B", "B").at_positions([1, 4]);
        let c = LinkedCandidate::new(Category::Entity, "http://lgd/C", "C").at_positions([6]);
        let linking = LinkingResult::from_candidates("Does A border C?", [a, b, c]);

        let queries = generate(GeoOperator::Border, linking.input_text(), &linking);
        // (A,C) (B,C) (C,A) (C,B)
        assert_eq!(queries.len(), 4);
        for q in &queries {
            let (x, y) = (&q.used.entities[0], &q.used.entities[1]);
            assert!(!x.shares_position_with(y));
        }
    }

    #[test]
    fn test_how_many_within_kilometres() {
        let linking = LinkingResult::from_candidates(
            "How many castles are within 200 kilometers of the Bremen Cathedral?",
            [
                LinkedCandidate::new(Category::Class, "http://lgd/Castle", "castle").at_positions([2]),
                LinkedCandidate::new(Category::Entity, "http://lgd/node1", "Bremen Cathedral")
                    .with_geometry(GeometryKind::Point)
                    .at_positions([9]),
            ],
        );
        let queries = generate(GeoOperator::Proximity, linking.input_text(), &linking);

        assert_eq!(queries.len(), 1);
        let q = &queries[0].query;
        assert!(q.contains("SELECT (COUNT(DISTINCT ?target) AS ?count) WHERE"));
        assert!(q.contains("uom:metre) <= 200000"));
        assert!(!q.contains("ORDER BY"));
    }

    fn park_in_walle(question: &str, relations: &[&str]) -> LinkingResult {
        let mut linking = LinkingResult::from_candidates(
            question,
            [
                LinkedCandidate::new(Category::Class, "http://lgd/Park", "park").at_positions([1]),
                LinkedCandidate::new(Category::Entity, "http://lgd/Walle", "Walle")
                    .with_geometry(GeometryKind::Relation)
                    .at_positions([8]),
            ],
        );
        for uri in relations {
            linking.push(LinkedCandidate::new(Category::Relation, *uri, "area").at_positions([3]));
        }
        linking
    }

    #[test]
    fn test_superlative_without_number() {
        let linking = park_in_walle("Which is the largest park in Walle?", &["http://lgd/area"]);
        let queries = generate(GeoOperator::Containment, linking.input_text(), &linking);

        // the relation variant replaces the relation-free pattern
        assert_eq!(queries.len(), 1);
        let ordered = &queries[0];
        assert!(ordered.query.contains("<http://lgd/area> ?valueRaw"));
        assert!(ordered.query.ends_with("ORDER BY DESC(?value) LIMIT 1"));
        assert!(!ordered.query.contains("FILTER(?value"));
        assert_eq!(ordered.used.relations.len(), 1);
    }

    #[test]
    fn test_one_variant_per_relation() {
        let linking = park_in_walle(
            "Which parks are in Walle?",
            &["http://lgd/area", "http://lgd/population"],
        );
        let queries = generate(GeoOperator::Containment, linking.input_text(), &linking);

        assert_eq!(queries.len(), 2);
        assert!(queries[0].query.contains("<http://lgd/area> ?valueRaw"));
        assert!(queries[1].query.contains("<http://lgd/population> ?valueRaw"));
        assert!(queries.iter().all(|q| q.used.relations.len() == 1));
        assert!(queries.iter().all(|q| !q.query.contains("ORDER BY")));
    }

    #[test]
    fn test_comparative_with_number_only_filtered_variant() {
        let linking =
            park_in_walle("Which parks are larger than 5000 in Walle?", &["http://lgd/area"]);
        let queries = generate(GeoOperator::Containment, linking.input_text(), &linking);

        assert_eq!(queries.len(), 1);
        assert!(queries[0].query.contains("<http://lgd/area> ?valueRaw"));
        assert!(queries[0].query.contains("FILTER(?value > 5000)"));
    }

    #[test]
    fn test_comparative_without_number_drops_relation_variant() {
        let linking =
            park_in_walle("Which parks are larger than the Unisee in Walle?", &["http://lgd/area"]);
        let queries = generate(GeoOperator::Containment, linking.input_text(), &linking);

        // only the relation-free pattern is left
        assert_eq!(queries.len(), 1);
        assert!(queries[0].used.relations.is_empty());
        assert!(!queries[0].query.contains("?valueRaw"));
        assert!(!queries[0].query.contains("FILTER(?value"));
    }

    #[test]
    fn test_relations_ignored_by_templates_without_slot() {
        let linking = LinkingResult::from_candidates(
            "Does the Weser cross Bremen?",
            [
                LinkedCandidate::new(Category::Entity, "http://lgd/Weser", "Weser").at_positions([2]),
                LinkedCandidate::new(Category::Entity, "http://lgd/Bremen", "Bremen").at_positions([4]),
                LinkedCandidate::new(Category::Relation, "http://lgd/length", "length"),
            ],
        );
        let queries = generate(GeoOperator::Crossing, linking.input_text(), &linking);
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.used.relations.is_empty()));
    }

    #[test]
    fn test_unpositioned_entities_are_not_paired() {
        let linking = LinkingResult::from_candidates(
            "Does A border B?",
            [
                LinkedCandidate::new(Category::Entity, "http://lgd/A", "A").at_positions([1]),
                LinkedCandidate::new(Category::Entity, "http://lgd/B", "B").at_positions([3]),
                LinkedCandidate::new(Category::Entity, "http://lgd/U1", "U1"),
                LinkedCandidate::new(Category::Entity, "http://lgd/U2", "U2"),
            ],
        );
        let queries = generate(GeoOperator::Border, linking.input_text(), &linking);

        // 16 ordered pairs, less 4 identical ones, less (U1,U2) and (U2,U1)
        assert_eq!(queries.len(), 10);
        for q in &queries {
            let uris: Vec<&str> = q.used.entities.iter().map(|e| e.uri()).collect();
            assert!(!(uris.contains(&"http://lgd/U1") && uris.contains(&"http://lgd/U2")));
        }
    }

    #[test]
    fn test_class_only_question() {
        let linking = LinkingResult::from_candidates(
            "Which castles are there?",
            [LinkedCandidate::new(Category::Class, "http://lgd/Castle", "castle").at_positions([1])],
        );
        let queries = generate(GeoOperator::Containment, linking.input_text(), &linking);
        assert_eq!(queries.len(), 1);
        assert!(queries[0].query.contains("SELECT ?target WHERE { ?target a <http://lgd/Castle> . }"));
    }

    #[test]
    fn test_select_entity_pairs_without_variable_are_skipped() {
        let linking = LinkingResult::from_candidates(
            "Which streets cross Delmestraße and Pappelstraße?",
            [
                LinkedCandidate::new(Category::Entity, "http://lgd/a", "a").at_positions([3]),
                LinkedCandidate::new(Category::Entity, "http://lgd/b", "b").at_positions([5]),
            ],
        );
        assert!(generate(GeoOperator::Crossing, linking.input_text(), &linking).is_empty());
    }

    #[test]
    fn test_no_anchors_no_queries() {
        let linking = LinkingResult::new("Where is it?");
        assert!(generate(GeoOperator::Proximity, "Where is it?", &linking).is_empty());
    }
}
