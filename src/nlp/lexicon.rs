//! Rule-based tokenizer and tagger
//!
//! Covers exactly what query generation looks at: auxiliaries ("is", "does"),
//! digit numerals, and the comparative/superlative forms of a fixed set of
//! gradable words with a pinned polarity.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{ParsedQuestion, PartOfSpeech, QuestionParser, Token};

/// Numbers with `,`/`.` separators, words (Unicode letters, inner `'` or `-`), single symbols
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)*|[\p{L}\p{M}]+(?:['’-][\p{L}\p{M}]+)*|[^\s\p{L}\p{M}\p{N}]")
        .unwrap()
});

/// (base, comparative, superlative, polarity)
const GRADABLE: &[(&str, &str, &str, f32)] = &[
    ("large", "larger", "largest", 0.5),
    ("big", "bigger", "biggest", 0.5),
    ("high", "higher", "highest", 0.5),
    ("tall", "taller", "tallest", 0.5),
    ("long", "longer", "longest", 0.5),
    ("wide", "wider", "widest", 0.5),
    ("great", "greater", "greatest", 0.8),
    ("many", "more", "most", 0.5),
    ("far", "farther", "farthest", 0.3),
    ("small", "smaller", "smallest", -0.5),
    ("little", "less", "least", -0.5),
    ("few", "fewer", "fewest", -0.5),
    ("low", "lower", "lowest", -0.5),
    ("short", "shorter", "shortest", -0.5),
    ("narrow", "narrower", "narrowest", -0.5),
    ("near", "nearer", "nearest", -0.3),
    ("close", "closer", "closest", -0.3),
];

const AUXILIARIES: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("am", "be"),
    ("be", "be"),
    ("been", "be"),
    ("being", "be"),
    ("do", "do"),
    ("does", "do"),
    ("did", "do"),
    ("has", "have"),
    ("have", "have"),
    ("had", "have"),
];

struct Gradable {
    lemma: &'static str,
    pos: PartOfSpeech,
    polarity: f32,
}

/// Lexicon-backed [`QuestionParser`]
pub struct LexiconParser {
    gradable: HashMap<&'static str, Gradable>,
    auxiliaries: HashMap<&'static str, &'static str>,
}

impl Default for LexiconParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconParser {
    pub fn new() -> Self {
        let mut gradable = HashMap::new();
        for &(base, comparative, superlative, polarity) in GRADABLE {
            gradable.insert(
                comparative,
                Gradable {
                    lemma: base,
                    pos: PartOfSpeech::Comparative,
                    polarity,
                },
            );
            gradable.insert(
                superlative,
                Gradable {
                    lemma: base,
                    pos: PartOfSpeech::Superlative,
                    polarity,
                },
            );
        }

        Self {
            gradable,
            auxiliaries: AUXILIARIES.iter().copied().collect(),
        }
    }

    fn tag(&self, text: &str) -> Token {
        let lower = text.to_lowercase();

        if text.starts_with(|c: char| c.is_ascii_digit()) {
            return Token {
                text: text.to_string(),
                lemma: lower,
                pos: PartOfSpeech::Numeral,
                polarity: 0.0,
            };
        }

        if let Some(g) = self.gradable.get(lower.as_str()) {
            return Token {
                text: text.to_string(),
                lemma: g.lemma.to_string(),
                pos: g.pos,
                polarity: g.polarity,
            };
        }

        let pos = if text.chars().any(char::is_alphabetic) {
            PartOfSpeech::Word
        } else {
            PartOfSpeech::Punctuation
        };
        let lemma = self
            .auxiliaries
            .get(lower.as_str())
            .map(|l| l.to_string())
            .unwrap_or(lower);

        Token {
            text: text.to_string(),
            lemma,
            pos,
            polarity: 0.0,
        }
    }
}

impl QuestionParser for LexiconParser {
    fn parse(&self, question: &str) -> ParsedQuestion {
        let tokens = TOKEN_RE
            .find_iter(question)
            .map(|m| self.tag(m.as_str()))
            .collect();
        ParsedQuestion::new(question, tokens)
    }
}
