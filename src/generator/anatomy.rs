//! Query anatomy
//!
//! `PREFIXES FORM VARIABLES WHERE { ... } ORDER BY LIMIT`, with the
//! question-dependent parts (form, aggregate, ordering, thresholds, proximity
//! radius) read off the linguistic parse once per question.

use geoqa_types::QueryForm;

use crate::nlp::{ParsedQuestion, Token};

pub const PREFIXES: &str = "PREFIX uom: <http://www.opengis.net/def/uom/OGC/1.0/>\n\
PREFIX geo: <http://www.opengis.net/ont/geosparql#>\n\
PREFIX geof: <http://www.opengis.net/def/function/geosparql/>\n\
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n";

/// Variable the relation value is bound to
pub const VALUE_VARIABLE: &str = "?value";

/// Proximity radius when the question names none
pub const DEFAULT_DISTANCE_METRES: f64 = 250.0;

const METRE_UNITS: &[&str] = &["m", "meter", "meters", "metre", "metres"];
const KILOMETRE_UNITS: &[&str] = &["km", "kilometer", "kilometers", "kilometre", "kilometres"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    GreaterThan,
    LessThan,
}

impl Comparator {
    fn symbol(&self) -> &'static str {
        match self {
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
        }
    }
}

/// Comparative in the question: the direction, and the threshold if one was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub comparator: Comparator,
    pub threshold: Option<f64>,
}

impl Comparison {
    /// `FILTER(?value > N)`; `None` without a threshold
    pub fn filter_clause(&self) -> Option<String> {
        self.threshold.map(|n| {
            format!(
                "FILTER({} {} {})",
                VALUE_VARIABLE,
                self.comparator.symbol(),
                format_number(n)
            )
        })
    }
}

/// Everything query assembly takes from the question itself
#[derive(Debug, Clone, PartialEq)]
pub struct QueryModifiers {
    pub form: QueryForm,
    /// "how many" questions project `COUNT(DISTINCT ?var)`
    pub count: bool,
    pub ordering: Option<SortDirection>,
    pub comparison: Option<Comparison>,
    /// Metres, from a `<number> <unit>` expression or the default
    pub distance: f64,
}

impl QueryModifiers {
    pub fn from_question(parsed: &ParsedQuestion) -> Self {
        let form = match parsed.first_lemma() {
            Some("do") | Some("be") => QueryForm::Ask,
            _ => QueryForm::Select,
        };
        let count = parsed.leading_lemmas(2) == "how many";

        let tokens = parsed.tokens();
        let distance_expr = distance_expression(tokens);

        let comparison = parsed.comparative().map(|cmp| {
            let threshold = tokens
                .iter()
                .enumerate()
                .filter(|(i, _)| distance_expr.map(|(at, _)| at) != Some(*i))
                .find_map(|(_, t)| t.numeric_value());
            Comparison {
                comparator: if cmp.polarity > 0.0 {
                    Comparator::GreaterThan
                } else {
                    Comparator::LessThan
                },
                threshold,
            }
        });

        let ordering = parsed.superlative().map(|sup| {
            if sup.polarity > 0.0 {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            }
        });

        Self {
            form,
            count,
            ordering,
            comparison,
            distance: distance_expr
                .map(|(_, metres)| metres)
                .unwrap_or(DEFAULT_DISTANCE_METRES),
        }
    }

    /// Assemble one query; `None` for a SELECT with nothing to project.
    ///
    /// Ordering is only emitted when there is a relation value to order by
    /// and the projection is not an aggregate.
    pub fn assemble(
        &self,
        where_clause: &str,
        variable: Option<&str>,
        value_variable: Option<&str>,
    ) -> Option<String> {
        let projection = match self.form {
            QueryForm::Ask => String::new(),
            QueryForm::Select => {
                let variable = variable?;
                if self.count {
                    format!("(COUNT(DISTINCT {}) AS ?count)", variable)
                } else {
                    variable.to_string()
                }
            }
        };

        let mut query = format!(
            "{}{} {} WHERE {}",
            PREFIXES,
            self.form.keyword(),
            projection,
            where_clause
        );

        if let (QueryForm::Select, false, Some(direction), Some(value)) =
            (self.form, self.count, self.ordering, value_variable)
        {
            query.push_str(&format!(" ORDER BY {}({}) LIMIT 1", direction.keyword(), value));
        }

        Some(query)
    }
}

/// First `<numeral> <unit>` pair: the numeral's token index and the distance in metres
pub fn distance_expression(tokens: &[Token]) -> Option<(usize, f64)> {
    tokens.windows(2).enumerate().find_map(|(i, pair)| {
        let value = pair[0].numeric_value()?;
        let unit = pair[1].lemma.as_str();
        if METRE_UNITS.contains(&unit) {
            Some((i, value))
        } else if KILOMETRE_UNITS.contains(&unit) {
            Some((i, value * 1000.0))
        } else {
            None
        }
    })
}

/// Integral values print without a fraction (`200000`, not `200000.0`)
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
