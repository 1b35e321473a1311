//! Template string parser
//!
//! Splits a template such as
//! `{ ?target a __CLASS__ . __RELATION__ __RELATION_FILTER__ }` into
//! literal and placeholder segments. Substitution then works on segments,
//! so a URI that happens to contain `__ENTITY__` can never be re-substituted.
//! Whitespace runs inside literals are collapsed here, once per template;
//! values bound later are never rewritten.

use std::sync::LazyLock;

use geoqa_types::{Placeholder, Segment};
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::combinator::{all_consuming, map, value};
use nom::multi::many0;
use nom::IResult;
use regex::Regex;

/// Anything shaped like a sentinel token
static SENTINEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__[A-Z][A-Z_]*?__").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Template text could not be split into segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSyntaxError {
    /// A `__TOKEN__` that is not one of the known placeholders
    UnknownPlaceholder(String),
    Malformed(String),
}

fn placeholder(input: &str) -> IResult<&str, Placeholder> {
    // RELATION_FILTER before RELATION: the shorter token is a prefix of the longer
    alt((
        value(Placeholder::RelationFilter, tag("__RELATION_FILTER__")),
        value(Placeholder::Relation, tag("__RELATION__")),
        value(Placeholder::Class, tag("__CLASS__")),
        value(Placeholder::Entity, tag("__ENTITY__")),
        value(Placeholder::Distance, tag("__DISTANCE__")),
    ))(input)
}

fn segment(input: &str) -> IResult<&str, Segment> {
    alt((
        map(placeholder, Segment::Slot),
        map(is_not("_"), |s: &str| Segment::Literal(s.to_string())),
        map(tag("_"), |s: &str| Segment::Literal(s.to_string())),
    ))(input)
}

/// Parse a template string into merged segments
pub fn parse_template(input: &str) -> Result<Vec<Segment>, TemplateSyntaxError> {
    let (_, raw) = all_consuming(many0(segment))(input)
        .map_err(|e| TemplateSyntaxError::Malformed(e.to_string()))?;

    let mut segments: Vec<Segment> = Vec::with_capacity(raw.len());
    for seg in raw {
        if let (Some(Segment::Literal(prev)), Segment::Literal(next)) = (segments.last_mut(), &seg)
        {
            prev.push_str(next);
            continue;
        }
        segments.push(seg);
    }

    for seg in &segments {
        if let Segment::Literal(text) = seg {
            if let Some(m) = SENTINEL_RE.find(text) {
                return Err(TemplateSyntaxError::UnknownPlaceholder(m.as_str().to_string()));
            }
        }
    }

    let last = segments.len().saturating_sub(1);
    for (i, seg) in segments.iter_mut().enumerate() {
        if let Segment::Literal(text) = seg {
            let mut collapsed = WHITESPACE_RE.replace_all(text, " ").into_owned();
            if i == 0 {
                collapsed = collapsed.trim_start().to_string();
            }
            if i == last {
                collapsed = collapsed.trim_end().to_string();
            }
            *text = collapsed;
        }
    }
    segments.retain(|seg| !matches!(seg, Segment::Literal(text) if text.is_empty()));

    Ok(segments)
}
