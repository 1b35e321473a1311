//! Linguistic parse of a question
//!
//! The generator only needs three things per token: a lemma, a coarse
//! part-of-speech tag and a polarity score. [`QuestionParser`] is the seam
//! where a real tagger can be plugged in; [`LexiconParser`] is the built-in
//! rule-based implementation.

mod lexicon;

pub use lexicon::LexiconParser;

use serde::Serialize;

/// Coarse part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartOfSpeech {
    /// Comparative adjective or adverb ("larger", "more")
    Comparative,
    /// Superlative adjective or adverb ("largest", "most")
    Superlative,
    /// Number written with digits
    Numeral,
    Word,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// Sign gives the direction of a gradable word: positive for "more/larger"
    pub polarity: f32,
}

impl Token {
    /// Numeric value of a numeral token
    pub fn numeric_value(&self) -> Option<f64> {
        if self.pos != PartOfSpeech::Numeral {
            return None;
        }
        self.text.replace(',', "").parse().ok()
    }

    pub fn is_comparative(&self) -> bool {
        self.pos == PartOfSpeech::Comparative
    }

    pub fn is_superlative(&self) -> bool {
        self.pos == PartOfSpeech::Superlative
    }
}

/// Tokens of one question, in text order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuestion {
    text: String,
    tokens: Vec<Token>,
}

impl ParsedQuestion {
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn first_lemma(&self) -> Option<&str> {
        self.tokens.first().map(|t| t.lemma.as_str())
    }

    /// Lemmas of the first `n` tokens joined by single spaces
    pub fn leading_lemmas(&self, n: usize) -> String {
        self.tokens
            .iter()
            .take(n)
            .map(|t| t.lemma.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn comparative(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_comparative())
    }

    pub fn superlative(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_superlative())
    }
}

/// Produces the linguistic parse the generator consumes
pub trait QuestionParser: Send + Sync {
    fn parse(&self, question: &str) -> ParsedQuestion;
}
