//! Property tests for pattern generation, filtering and ranking

use std::sync::Arc;

use geoqa::execution::passes_structural_filter;
use geoqa::generator::triple_pattern_keys;
use geoqa::nlp::{LexiconParser, QuestionParser};
use geoqa::{
    Category, FilledQuery, GeoOperator, GeometryKind, LinkedCandidate, LinkingResult,
    QueryAndResult, QueryForm, QueryGenerator, Ranker, SparqlResults, TemplateCatalog,
};
use geoqa_types::UsedCandidates;
use proptest::prelude::*;

// -- Strategy helpers --

fn arb_operator() -> impl Strategy<Value = GeoOperator> {
    prop_oneof![
        Just(GeoOperator::Border),
        Just(GeoOperator::Containment),
        Just(GeoOperator::Crossing),
        Just(GeoOperator::Proximity),
    ]
}

fn arb_geometry() -> impl Strategy<Value = GeometryKind> {
    prop_oneof![
        Just(GeometryKind::Point),
        Just(GeometryKind::Way),
        Just(GeometryKind::Relation),
    ]
}

fn arb_candidate(categories: Vec<Category>) -> impl Strategy<Value = LinkedCandidate> {
    (
        prop::sample::select(categories),
        0u32..10_000,
        prop::collection::btree_set(0usize..8, 1..3),
        arb_geometry(),
        "[a-z]{1,12}( [a-z]{1,8})?",
        0.0f64..5.0,
    )
        .prop_map(|(category, id, positions, kind, term, multiplier)| {
            LinkedCandidate::new(category, format!("http://lgd/{}", id), term.clone())
                .with_original_term(term)
                .with_multiplier(multiplier)
                .with_geometry(kind)
                .at_positions(positions)
        })
}

fn arb_linking() -> impl Strategy<Value = LinkingResult> {
    prop::collection::vec(
        arb_candidate(vec![Category::Class, Category::Entity, Category::Relation]),
        0..6,
    )
    .prop_map(|candidates| LinkingResult::from_candidates("q", candidates))
}

fn arb_question() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Which parks are in Walle?",
        "Does the Weser cross Bremen?",
        "How many castles are within 2 km of the cathedral?",
        "Which is the largest park in Walle?",
        "Which lakes are larger than 5000 in Bremen?",
        "Is Walle next to Findorff?",
    ])
}

fn arb_filled_query() -> impl Strategy<Value = FilledQuery> {
    (
        arb_operator(),
        prop::collection::vec(arb_candidate(vec![Category::Class, Category::Entity]), 0..4),
        prop_oneof![Just(QueryForm::Select), Just(QueryForm::Ask)],
    )
        .prop_map(|(geo_operator, candidates, form)| {
            let mut used = UsedCandidates::default();
            for c in candidates {
                used.push(c);
            }
            FilledQuery {
                query: String::new(),
                form,
                question: "q".into(),
                geo_operator,
                used,
            }
        })
}

fn generator() -> QueryGenerator {
    QueryGenerator::new(Arc::new(TemplateCatalog::builtin().unwrap()))
}

proptest! {
    /// One anchor position without a class yields no keys
    #[test]
    fn single_entity_position_has_no_keys(
        position in 0usize..20,
        count in 1usize..4,
        relations in prop::collection::vec(arb_candidate(vec![Category::Relation]), 0..3),
    ) {
        let mut linking = LinkingResult::new("q");
        for i in 0..count {
            linking.push(
                LinkedCandidate::new(Category::Entity, format!("http://lgd/e{}", i), "e")
                    .at_positions([position]),
            );
        }
        for r in relations {
            linking.push(r);
        }
        prop_assert!(triple_pattern_keys(&linking).is_empty());
    }

    /// No generated query pairs two candidates that share a start position
    #[test]
    fn no_self_pairing(
        linking in arb_linking(),
        operator in arb_operator(),
        question in arb_question(),
    ) {
        let parsed = LexiconParser::new().parse(question);
        for query in generator().generate(operator, &parsed, &linking) {
            let anchors: Vec<&LinkedCandidate> =
                query.used.classes.iter().chain(query.used.entities.iter()).collect();
            prop_assert!(anchors.len() <= 2);
            if anchors.len() == 2 {
                prop_assert!(!anchors[0].shares_position_with(anchors[1]));
            }
            prop_assert!(query.used.classes.iter().all(|c| c.category() == Category::Class));
            prop_assert!(query.used.entities.iter().all(|c| c.category() == Category::Entity));
            prop_assert!(query.used.relations.iter().all(|c| c.category() == Category::Relation));
            prop_assert!(!query.query.contains("__"));
        }
    }

    /// Generation is deterministic
    #[test]
    fn generation_is_deterministic(
        linking in arb_linking(),
        operator in arb_operator(),
        question in arb_question(),
    ) {
        let parsed = LexiconParser::new().parse(question);
        let g = generator();
        prop_assert_eq!(
            g.generate(operator, &parsed, &linking),
            g.generate(operator, &parsed, &linking)
        );
    }

    /// The structural filter depends only on operator and used entities
    #[test]
    fn structural_filter_idempotent(query in arb_filled_query()) {
        let first = passes_structural_filter(&query);
        prop_assert_eq!(first, passes_structural_filter(&query));
        prop_assert_eq!(first, passes_structural_filter(&query.clone()));
    }

    /// SELECT scores are non-negative, ASK scores are zero
    #[test]
    fn scores_non_negative(query in arb_filled_query()) {
        let candidate = QueryAndResult::new(query, SparqlResults::empty_answer());
        let score = Ranker::new().score(&candidate);
        if candidate.query.is_ask() {
            prop_assert_eq!(score, 0.0);
        } else {
            prop_assert!(score >= 0.0);
        }
    }

    /// Ranking is sorted descending and stable on ties
    #[test]
    fn ranking_is_stable(queries in prop::collection::vec(arb_filled_query(), 0..12)) {
        let candidates: Vec<QueryAndResult> = queries
            .into_iter()
            .enumerate()
            .map(|(i, mut q)| {
                q.query = i.to_string();
                QueryAndResult::new(q, SparqlResults::empty_answer())
            })
            .collect();

        let ranked = Ranker::new().rank(candidates);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].ranking_score >= pair[1].ranking_score);
            if pair[0].ranking_score == pair[1].ranking_score {
                let a: usize = pair[0].query.query.parse().unwrap();
                let b: usize = pair[1].query.query.parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }
}
