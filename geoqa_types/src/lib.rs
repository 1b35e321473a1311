//! GeoQA Types - Level 1 Foundation Types
//!
//! Pure data structures that move between the stages of the geographic
//! question answering pipeline:
//!
//! ```text
//! LinkingResult ─► TriplePatternKey ─► PatternTemplate ─► FilledQuery ─► QueryAndResult
//! ```
//!
//! ## Critical Rules
//!
//! 1. **NO BUSINESS LOGIC** - Only data structures, constructors and accessors
//! 2. **NO WORKSPACE DEPENDENCIES** - This crate depends on nothing in geoqa
//! 3. **SERIALIZABLE** - Wire-facing types support serde
//! 4. **IMMUTABLE CANDIDATES** - A `LinkedCandidate` never changes category

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// CATEGORIES AND GEO-OPERATORS
// ============================================================================

/// Role a linked knowledge-base identifier plays in the question
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Class,
    Entity,
    Relation,
}

impl Category {
    /// Label used when building template lookup keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Class => "CLASS",
            Category::Entity => "ENTITY",
            Category::Relation => "RELATION",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLASS" => Ok(Category::Class),
            "ENTITY" => Ok(Category::Entity),
            "RELATION" => Ok(Category::Relation),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Spatial relationship a question expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeoOperator {
    #[serde(rename = "Borders")]
    Border,
    Containment,
    Crossing,
    Proximity,
}

impl GeoOperator {
    pub const ALL: [GeoOperator; 4] = [
        GeoOperator::Border,
        GeoOperator::Containment,
        GeoOperator::Crossing,
        GeoOperator::Proximity,
    ];

    /// Label used by the classifier and the template catalog
    pub fn label(&self) -> &'static str {
        match self {
            GeoOperator::Border => "Borders",
            GeoOperator::Containment => "Containment",
            GeoOperator::Crossing => "Crossing",
            GeoOperator::Proximity => "Proximity",
        }
    }

    /// Infix token joining category labels in template lookup keys
    pub fn pattern_infix(&self) -> &'static str {
        match self {
            GeoOperator::Border => "__BORDERS__",
            GeoOperator::Containment => "__CONTAINED_IN__",
            GeoOperator::Crossing => "__CROSSING__",
            GeoOperator::Proximity => "__DISTANCE__",
        }
    }
}

impl fmt::Display for GeoOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown geo-operator '{0}'")]
pub struct ParseOperatorError(pub String);

impl FromStr for GeoOperator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "borders" | "border" => Ok(GeoOperator::Border),
            "containment" => Ok(GeoOperator::Containment),
            "crossing" => Ok(GeoOperator::Crossing),
            "proximity" => Ok(GeoOperator::Proximity),
            _ => Err(ParseOperatorError(s.to_string())),
        }
    }
}

// ============================================================================
// GEOMETRY KINDS
// ============================================================================

pub const NODE_TYPE_URI: &str = "http://linkedgeodata.org/meta/Node";
pub const WAY_TYPE_URI: &str = "http://linkedgeodata.org/meta/Way";
pub const RELATION_TYPE_URI: &str = "http://linkedgeodata.org/meta/Relation";

/// OSM geometry kind, derived from a candidate's type URIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Way,
    Relation,
}

impl GeometryKind {
    pub fn type_uri(&self) -> &'static str {
        match self {
            GeometryKind::Point => NODE_TYPE_URI,
            GeometryKind::Way => WAY_TYPE_URI,
            GeometryKind::Relation => RELATION_TYPE_URI,
        }
    }

    pub fn from_type_uri(uri: &str) -> Option<Self> {
        match uri {
            NODE_TYPE_URI => Some(GeometryKind::Point),
            WAY_TYPE_URI => Some(GeometryKind::Way),
            RELATION_TYPE_URI => Some(GeometryKind::Relation),
            _ => None,
        }
    }
}

// ============================================================================
// LINKED CANDIDATES
// ============================================================================

/// A knowledge-base URI matched to a span of the question text.
///
/// Fields are read-only once built; the `with_*` constructors are the only
/// way to set them and there is no way to change the category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedCandidate {
    uri: String,
    label: String,
    search_term: String,
    original_term: String,
    score: f64,
    multiplier: f64,
    edit_distance: f64,
    types: BTreeSet<String>,
    start_positions: BTreeSet<usize>,
    end_positions: BTreeSet<usize>,
    category: Category,
}

impl LinkedCandidate {
    pub fn new(category: Category, uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
            search_term: String::new(),
            original_term: String::new(),
            score: 0.0,
            multiplier: 0.0,
            edit_distance: 0.0,
            types: BTreeSet::new(),
            start_positions: BTreeSet::new(),
            end_positions: BTreeSet::new(),
            category,
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_original_term(mut self, term: impl Into<String>) -> Self {
        self.original_term = term.into();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_edit_distance(mut self, distance: f64) -> Self {
        self.edit_distance = distance;
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_geometry(self, kind: GeometryKind) -> Self {
        self.with_types([kind.type_uri()])
    }

    pub fn at_positions<I: IntoIterator<Item = usize>>(mut self, starts: I) -> Self {
        self.start_positions = starts.into_iter().collect();
        self
    }

    pub fn with_end_positions<I: IntoIterator<Item = usize>>(mut self, ends: I) -> Self {
        self.end_positions = ends.into_iter().collect();
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn original_term(&self) -> &str {
        &self.original_term
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn edit_distance(&self) -> f64 {
        self.edit_distance
    }

    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn start_positions(&self) -> &BTreeSet<usize> {
        &self.start_positions
    }

    pub fn end_positions(&self) -> &BTreeSet<usize> {
        &self.end_positions
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Geometry kinds named in `types`
    pub fn geometry_kinds(&self) -> BTreeSet<GeometryKind> {
        self.types
            .iter()
            .filter_map(|t| GeometryKind::from_type_uri(t))
            .collect()
    }

    /// Entity whose geometry is an OSM node
    pub fn is_point(&self) -> bool {
        self.category == Category::Entity && self.types.contains(NODE_TYPE_URI)
    }

    /// Entity whose geometry is an OSM way or relation
    pub fn is_non_point(&self) -> bool {
        self.category == Category::Entity
            && (self.types.contains(WAY_TYPE_URI) || self.types.contains(RELATION_TYPE_URI))
    }

    /// True when both candidates were linked at a common start position.
    /// Two candidates without any position count as sharing one.
    pub fn shares_position_with(&self, other: &LinkedCandidate) -> bool {
        if self.start_positions.is_empty() && other.start_positions.is_empty() {
            return true;
        }
        !self.start_positions.is_disjoint(&other.start_positions)
    }
}

impl fmt::Display for LinkedCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: uri={}, label={})", self.category, self.uri, self.label)
    }
}

/// Candidates linked in one question, split by category.
///
/// Candidates can only enter through [`LinkingResult::push`], which routes
/// them to the collection matching their category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkingResult {
    input_text: String,
    linked_classes: Vec<LinkedCandidate>,
    linked_entities: Vec<LinkedCandidate>,
    linked_relations: Vec<LinkedCandidate>,
}

impl LinkingResult {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            ..Default::default()
        }
    }

    pub fn from_candidates<I>(input_text: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = LinkedCandidate>,
    {
        let mut result = Self::new(input_text);
        for candidate in candidates {
            result.push(candidate);
        }
        result
    }

    pub fn push(&mut self, candidate: LinkedCandidate) {
        match candidate.category() {
            Category::Class => self.linked_classes.push(candidate),
            Category::Entity => self.linked_entities.push(candidate),
            Category::Relation => self.linked_relations.push(candidate),
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn classes(&self) -> &[LinkedCandidate] {
        &self.linked_classes
    }

    pub fn entities(&self) -> &[LinkedCandidate] {
        &self.linked_entities
    }

    pub fn relations(&self) -> &[LinkedCandidate] {
        &self.linked_relations
    }

    pub fn candidates(&self, category: Category) -> &[LinkedCandidate] {
        match category {
            Category::Class => &self.linked_classes,
            Category::Entity => &self.linked_entities,
            Category::Relation => &self.linked_relations,
        }
    }

    /// Classes and entities, the candidates that can anchor a pattern
    pub fn anchors(&self) -> impl Iterator<Item = &LinkedCandidate> {
        self.linked_classes.iter().chain(self.linked_entities.iter())
    }

    pub fn all_links(&self) -> impl Iterator<Item = &LinkedCandidate> {
        self.linked_classes
            .iter()
            .chain(self.linked_relations.iter())
            .chain(self.linked_entities.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.linked_classes.is_empty()
            && self.linked_entities.is_empty()
            && self.linked_relations.is_empty()
    }
}

/// One candidate as the linker service sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub uri: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub original_term: String,
    #[serde(default)]
    pub es_score: f64,
    #[serde(default)]
    pub multiplier: f64,
    #[serde(default)]
    pub levenstein_distance: f64,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub start_index: Vec<usize>,
    #[serde(default)]
    pub end_index: Vec<usize>,
}

impl CandidateRecord {
    pub fn into_candidate(self, category: Category) -> LinkedCandidate {
        LinkedCandidate::new(category, self.uri, self.label)
            .with_search_term(self.search_term)
            .with_original_term(self.original_term)
            .with_score(self.es_score)
            .with_multiplier(self.multiplier)
            .with_edit_distance(self.levenstein_distance)
            .with_types(self.types)
            .at_positions(self.start_index)
            .with_end_positions(self.end_index)
    }
}

/// Linker service response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkingResponse {
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub linked_classes: Vec<CandidateRecord>,
    #[serde(default)]
    pub linked_relations: Vec<CandidateRecord>,
    #[serde(default)]
    pub linked_entities: Vec<CandidateRecord>,
}

impl From<LinkingResponse> for LinkingResult {
    fn from(response: LinkingResponse) -> Self {
        let classes = response
            .linked_classes
            .into_iter()
            .map(|r| r.into_candidate(Category::Class));
        let relations = response
            .linked_relations
            .into_iter()
            .map(|r| r.into_candidate(Category::Relation));
        let entities = response
            .linked_entities
            .into_iter()
            .map(|r| r.into_candidate(Category::Entity));

        LinkingResult::from_candidates(response.input_text, classes.chain(relations).chain(entities))
    }
}

// ============================================================================
// TRIPLE PATTERN KEYS AND TEMPLATES
// ============================================================================

/// Ordered category signature selecting a template, e.g. `(Class, Entity)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriplePatternKey {
    first: Category,
    second: Option<Category>,
}

impl TriplePatternKey {
    pub fn single(first: Category) -> Self {
        Self {
            first,
            second: None,
        }
    }

    pub fn pair(first: Category, second: Category) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }

    pub fn first(&self) -> Category {
        self.first
    }

    pub fn second(&self) -> Option<Category> {
        self.second
    }

    pub fn categories(&self) -> Vec<Category> {
        std::iter::once(self.first).chain(self.second).collect()
    }

    /// Catalog key: labels joined by the operator infix (`CLASS__CONTAINED_IN__ENTITY`)
    pub fn lookup_key(&self, infix: &str) -> String {
        match self.second {
            Some(second) => format!("{}{}{}", self.first, infix, second),
            None => self.first.to_string(),
        }
    }
}

impl fmt::Display for TriplePatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.second {
            Some(second) => write!(f, "({}, {})", self.first, second),
            None => write!(f, "({},)", self.first),
        }
    }
}

/// Named slot inside a template string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    Class,
    Entity,
    Relation,
    RelationFilter,
    Distance,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Placeholder::Class,
        Placeholder::Entity,
        Placeholder::Relation,
        Placeholder::RelationFilter,
        Placeholder::Distance,
    ];

    /// Sentinel token used in the template file format
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Class => "__CLASS__",
            Placeholder::Entity => "__ENTITY__",
            Placeholder::Relation => "__RELATION__",
            Placeholder::RelationFilter => "__RELATION_FILTER__",
            Placeholder::Distance => "__DISTANCE__",
        }
    }

    /// Placeholder that receives candidates of the given category
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Class => Placeholder::Class,
            Category::Entity => Placeholder::Entity,
            Category::Relation => Placeholder::Relation,
        }
    }
}

/// Piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Where-clause template plus the variable it projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTemplate {
    pub segments: Vec<Segment>,
    pub output_variable: Option<String>,
}

impl PatternTemplate {
    pub fn slot_count(&self, placeholder: Placeholder) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Slot(p) if *p == placeholder))
            .count()
    }

    pub fn has_slot(&self, placeholder: Placeholder) -> bool {
        self.slot_count(placeholder) > 0
    }
}

// ============================================================================
// FILLED QUERIES
// ============================================================================

/// Candidates a query was built from, one list per role
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsedCandidates {
    pub classes: Vec<LinkedCandidate>,
    pub entities: Vec<LinkedCandidate>,
    pub relations: Vec<LinkedCandidate>,
}

impl UsedCandidates {
    /// Record a candidate under the role its category dictates
    pub fn push(&mut self, candidate: LinkedCandidate) {
        match candidate.category() {
            Category::Class => self.classes.push(candidate),
            Category::Entity => self.entities.push(candidate),
            Category::Relation => self.relations.push(candidate),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkedCandidate> {
        self.classes
            .iter()
            .chain(self.relations.iter())
            .chain(self.entities.iter())
    }

    pub fn len(&self) -> usize {
        self.classes.len() + self.entities.len() + self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryForm {
    Select,
    Ask,
}

impl QueryForm {
    pub fn keyword(&self) -> &'static str {
        match self {
            QueryForm::Select => "SELECT",
            QueryForm::Ask => "ASK",
        }
    }
}

/// A complete, executable query with its provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledQuery {
    pub query: String,
    pub form: QueryForm,
    pub question: String,
    pub geo_operator: GeoOperator,
    pub used: UsedCandidates,
}

impl FilledQuery {
    pub fn is_ask(&self) -> bool {
        self.form == QueryForm::Ask
    }

    pub fn is_select(&self) -> bool {
        self.form == QueryForm::Select
    }
}

impl fmt::Display for FilledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

// ============================================================================
// SPARQL RESULTS
// ============================================================================

/// SPARQL 1.1 JSON results: `{head, results}` for SELECT, `{head, boolean}` for ASK
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: ResultHead,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultBindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultHead {
    #[serde(default)]
    pub vars: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBindings {
    #[serde(default)]
    pub bindings: Vec<BTreeMap<String, RdfTerm>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdfTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl SparqlResults {
    /// The answer returned when nothing could be answered
    pub fn empty_answer() -> Self {
        Self {
            head: ResultHead {
                vars: vec!["x".to_string()],
                link: Vec::new(),
            },
            results: Some(ResultBindings::default()),
            boolean: None,
        }
    }

    pub fn boolean_answer(value: bool) -> Self {
        Self {
            head: ResultHead::default(),
            results: None,
            boolean: Some(value),
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.boolean.is_some()
    }

    pub fn bindings(&self) -> &[BTreeMap<String, RdfTerm>] {
        self.results
            .as_ref()
            .map(|r| r.bindings.as_slice())
            .unwrap_or(&[])
    }

    pub fn binding_count(&self) -> usize {
        self.bindings().len()
    }

    /// First projected variable
    pub fn selected_variable(&self) -> Option<&str> {
        self.head.vars.first().map(String::as_str)
    }

    /// Values bound to the first projected variable, in binding order
    pub fn answer_strings(&self) -> Vec<String> {
        let Some(var) = self.selected_variable() else {
            return Vec::new();
        };
        self.bindings()
            .iter()
            .filter_map(|b| b.get(var).map(|term| term.value.clone()))
            .collect()
    }
}

/// An executed query, its raw result and the score the ranker gave it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAndResult {
    pub query: FilledQuery,
    pub result: SparqlResults,
    pub ranking_score: f64,
}

impl QueryAndResult {
    pub fn new(query: FilledQuery, result: SparqlResults) -> Self {
        Self {
            query,
            result,
            ranking_score: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_labels_round_trip() {
        for op in GeoOperator::ALL {
            assert_eq!(op.label().parse::<GeoOperator>().unwrap(), op);
        }
        assert_eq!("Border".parse::<GeoOperator>().unwrap(), GeoOperator::Border);
        assert!("Adjacency".parse::<GeoOperator>().is_err());
    }

    #[test]
    fn test_lookup_key() {
        let pair = TriplePatternKey::pair(Category::Class, Category::Entity);
        assert_eq!(
            pair.lookup_key(GeoOperator::Containment.pattern_infix()),
            "CLASS__CONTAINED_IN__ENTITY"
        );
        let single = TriplePatternKey::single(Category::Class);
        assert_eq!(single.lookup_key("__BORDERS__"), "CLASS");
        assert_eq!(single.to_string(), "(CLASS,)");
    }

    #[test]
    fn test_linking_response_assigns_categories() {
        let body = r#"{
            "inputText": "Are there any driving schools in Blumenthal?",
            "linkedClasses": [{"uri": "http://linkedgeodata.org/ontology/DrivingSchool",
                "label": "driving school", "originalTerm": "driving schools",
                "esScore": 11.2, "multiplier": 2, "levensteinDistance": 1,
                "types": [], "startIndex": [3], "endIndex": [4]}],
            "linkedRelations": [],
            "linkedEntities": [{"uri": "http://linkedgeodata.org/triplify/way1",
                "label": "Blumenthal", "originalTerm": "Blumenthal", "multiplier": 3,
                "types": ["http://linkedgeodata.org/meta/Way"], "startIndex": [6]}]
        }"#;
        let response: LinkingResponse = serde_json::from_str(body).unwrap();
        let linking = LinkingResult::from(response);

        assert_eq!(linking.classes().len(), 1);
        assert_eq!(linking.entities().len(), 1);
        assert_eq!(linking.classes()[0].category(), Category::Class);
        assert_eq!(linking.entities()[0].category(), Category::Entity);
        assert!(linking.entities()[0].is_non_point());
        assert!(!linking.entities()[0].is_point());
        assert_eq!(linking.classes()[0].multiplier(), 2.0);
    }

    #[test]
    fn test_shares_position() {
        let a = LinkedCandidate::new(Category::Class, "a", "a").at_positions([1, 2]);
        let b = LinkedCandidate::new(Category::Entity, "b", "b").at_positions([2]);
        let c = LinkedCandidate::new(Category::Entity, "c", "c").at_positions([5]);
        assert!(a.shares_position_with(&b));
        assert!(!a.shares_position_with(&c));
    }

    #[test]
    fn test_unpositioned_candidates_share_position() {
        let a = LinkedCandidate::new(Category::Entity, "a", "a");
        let b = LinkedCandidate::new(Category::Entity, "b", "b");
        let c = LinkedCandidate::new(Category::Entity, "c", "c").at_positions([5]);
        assert!(a.shares_position_with(&b));
        assert!(!a.shares_position_with(&c));
        assert!(!c.shares_position_with(&a));
    }

    #[test]
    fn test_sparql_results_shapes() {
        let select: SparqlResults = serde_json::from_str(
            r#"{"head": {"vars": ["target"]}, "results": {"bindings": [
                {"target": {"type": "uri", "value": "http://example.org/a"}},
                {"target": {"type": "uri", "value": "http://example.org/b"}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(select.binding_count(), 2);
        assert_eq!(
            select.answer_strings(),
            vec!["http://example.org/a", "http://example.org/b"]
        );

        let ask: SparqlResults = serde_json::from_str(r#"{"head": {}, "boolean": false}"#).unwrap();
        assert!(ask.is_boolean());
        assert_eq!(ask.binding_count(), 0);

        let empty = serde_json::to_value(SparqlResults::empty_answer()).unwrap();
        assert_eq!(
            empty,
            serde_json::json!({"head": {"vars": ["x"]}, "results": {"bindings": []}})
        );
    }
}
