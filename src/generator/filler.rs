//! Template Filler
//!
//! Binds linked candidates into template slots. Class and entity slots are
//! bound first; the relation slots stay open until relation augmentation
//! decides what goes in them, and the distance slot is bound at render time.

use geoqa_types::{Category, LinkedCandidate, PatternTemplate, Placeholder, Segment, UsedCandidates};

use super::anatomy::{format_number, VALUE_VARIABLE};
use crate::error::CatalogError;

/// Template with class/entity slots bound, plus the candidates used
#[derive(Debug, Clone, PartialEq)]
pub struct FilledPattern {
    segments: Vec<Segment>,
    variable: Option<String>,
    value_variable: Option<String>,
    used: UsedCandidates,
}

impl FilledPattern {
    /// Bind a combination of candidates into a template.
    ///
    /// The k-th slot of a kind takes the k-th candidate of the matching
    /// category; when there are fewer candidates than slots the last one
    /// fills the rest.
    pub fn bind(
        template: &PatternTemplate,
        combination: &[&LinkedCandidate],
    ) -> Result<Self, CatalogError> {
        let classes: Vec<&LinkedCandidate> = combination
            .iter()
            .copied()
            .filter(|c| c.category() == Category::Class)
            .collect();
        let entities: Vec<&LinkedCandidate> = combination
            .iter()
            .copied()
            .filter(|c| c.category() == Category::Entity)
            .collect();

        let mut next_class = 0;
        let mut next_entity = 0;
        let mut segments = Vec::with_capacity(template.segments.len());

        for segment in &template.segments {
            let bound = match segment {
                Segment::Slot(Placeholder::Class) => {
                    let candidate = nth_or_last(&classes, next_class)
                        .ok_or(CatalogError::UnboundPlaceholder {
                            token: Placeholder::Class.token(),
                        })?;
                    next_class += 1;
                    Segment::Literal(format!("<{}>", candidate.uri()))
                }
                Segment::Slot(Placeholder::Entity) => {
                    let candidate = nth_or_last(&entities, next_entity)
                        .ok_or(CatalogError::UnboundPlaceholder {
                            token: Placeholder::Entity.token(),
                        })?;
                    next_entity += 1;
                    Segment::Literal(format!("<{}>", candidate.uri()))
                }
                other => other.clone(),
            };
            segments.push(bound);
        }

        let mut used = UsedCandidates::default();
        for candidate in combination {
            used.push((*candidate).clone());
        }

        Ok(Self {
            segments,
            variable: template.output_variable.clone(),
            value_variable: None,
            used,
        })
    }

    /// Variant that binds the output variable's value through `relation`.
    ///
    /// `None` when the template has no relation slot or nothing to bind.
    pub fn with_relation(&self, relation: &LinkedCandidate, filter: Option<&str>) -> Option<Self> {
        let variable = self.variable.as_deref()?;
        if !self.has_slot(Placeholder::Relation) {
            return None;
        }

        let triple = format!(
            "{} <{}> ?valueRaw . BIND(xsd:decimal(?valueRaw) AS {})",
            variable,
            relation.uri(),
            VALUE_VARIABLE
        );

        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Slot(Placeholder::Relation) => Segment::Literal(triple.clone()),
                Segment::Slot(Placeholder::RelationFilter) => {
                    Segment::Literal(filter.unwrap_or_default().to_string())
                }
                other => other.clone(),
            })
            .collect();

        let mut used = self.used.clone();
        used.push(relation.clone());

        Some(Self {
            segments,
            variable: self.variable.clone(),
            value_variable: Some(VALUE_VARIABLE.to_string()),
            used,
        })
    }

    /// Where-clause text. Open relation slots are dropped; a distance slot
    /// needs `distance`. Separators left around a dropped or empty slot
    /// fold into one space.
    pub fn render(&self, distance: Option<f64>) -> Result<String, CatalogError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => push_joined(&mut out, text),
                Segment::Slot(Placeholder::Relation | Placeholder::RelationFilter) => {}
                Segment::Slot(Placeholder::Distance) => {
                    let metres = distance.ok_or(CatalogError::UnboundPlaceholder {
                        token: Placeholder::Distance.token(),
                    })?;
                    out.push_str(&format_number(metres));
                }
                Segment::Slot(p @ (Placeholder::Class | Placeholder::Entity)) => {
                    return Err(CatalogError::UnboundPlaceholder { token: p.token() });
                }
            }
        }
        Ok(out)
    }

    pub fn has_slot(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Slot(p) if *p == placeholder))
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn value_variable(&self) -> Option<&str> {
        self.value_variable.as_deref()
    }

    pub fn used(&self) -> &UsedCandidates {
        &self.used
    }

    pub fn into_used(self) -> UsedCandidates {
        self.used
    }
}

fn push_joined(out: &mut String, text: &str) {
    if out.ends_with(' ') {
        out.push_str(text.trim_start_matches(' '));
    } else {
        out.push_str(text);
    }
}

fn nth_or_last<'a>(candidates: &[&'a LinkedCandidate], n: usize) -> Option<&'a LinkedCandidate> {
    candidates.get(n).or_else(|| candidates.last()).copied()
}
