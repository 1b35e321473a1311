//! QALD-style benchmark dataset
//!
//! ```json
//! {"questions": [{"question": [{"language": "en", "string": "..."}],
//!                 "answertype": "resource",
//!                 "answers": [{"head": {...}, "results": {...}}]}]}
//! ```
//!
//! Supplies the question list for batch runs and the gold answers the
//! oracle reranks against.

use std::collections::HashMap;
use std::path::Path;

use geoqa_types::SparqlResults;
use serde::Deserialize;
use tracing::info;

use crate::error::BenchmarkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    Boolean,
    Number,
    Resource,
    /// date, string, ... never matched by the oracle
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionText {
    #[serde(default)]
    pub language: Option<String>,
    pub string: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkQuestion {
    #[serde(default)]
    pub question: Vec<QuestionText>,
    pub answertype: AnswerType,
    #[serde(default)]
    pub answers: Vec<SparqlResults>,
}

impl BenchmarkQuestion {
    /// First question string, trimmed
    pub fn text(&self) -> Option<&str> {
        self.question.first().map(|q| q.string.trim())
    }
}

/// Recorded answer for one benchmark question
#[derive(Debug, Clone, PartialEq)]
pub struct GoldAnswer {
    pub answer_type: AnswerType,
    pub answer: SparqlResults,
}

impl GoldAnswer {
    pub fn boolean(&self) -> Option<bool> {
        self.answer.boolean
    }

    pub fn values(&self) -> Vec<String> {
        self.answer.answer_strings()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchmarkDataset {
    #[serde(default)]
    pub questions: Vec<BenchmarkQuestion>,
}

impl BenchmarkDataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchmarkError> {
        let path = path.as_ref();
        info!("Loading benchmark from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| BenchmarkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, BenchmarkError> {
        let dataset: Self = serde_json::from_str(content)?;
        info!("Benchmark has {} questions", dataset.questions.len());
        Ok(dataset)
    }

    pub fn question_texts(&self) -> Vec<&str> {
        self.questions.iter().filter_map(|q| q.text()).collect()
    }

    /// Gold answer per question text; questions without an answer are skipped
    pub fn gold_answers(&self) -> HashMap<String, GoldAnswer> {
        self.questions
            .iter()
            .filter_map(|q| {
                let text = q.text()?;
                let answer = q.answers.first()?.clone();
                Some((
                    text.to_string(),
                    GoldAnswer {
                        answer_type: q.answertype,
                        answer,
                    },
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "questions": [
            {"id": "1", "answertype": "boolean",
             "question": [{"language": "en", "string": "Are there any driving schools in Blumenthal? "}],
             "answers": [{"head": {}, "boolean": true}]},
            {"id": 2, "answertype": "resource",
             "question": [{"language": "en", "string": "Which parks are in Walle?"}],
             "answers": [{"head": {"vars": ["target"]}, "results": {"bindings": [
                 {"target": {"type": "uri", "value": "http://lgd/park1"}},
                 {"target": {"type": "uri", "value": "http://lgd/park2"}}]}}]},
            {"id": "3", "answertype": "date",
             "question": [{"language": "en", "string": "When was the cathedral built?"}],
             "answers": []}
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let dataset = BenchmarkDataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.questions.len(), 3);
        assert_eq!(
            dataset.question_texts(),
            vec![
                "Are there any driving schools in Blumenthal?",
                "Which parks are in Walle?",
                "When was the cathedral built?"
            ]
        );
        assert_eq!(dataset.questions[2].answertype, AnswerType::Other);
    }

    #[test]
    fn test_gold_answers() {
        let gold = BenchmarkDataset::from_json(SAMPLE).unwrap().gold_answers();
        assert_eq!(gold.len(), 2);
        assert_eq!(
            gold["Are there any driving schools in Blumenthal?"].boolean(),
            Some(true)
        );
        let parks = &gold["Which parks are in Walle?"];
        assert_eq!(parks.answer_type, AnswerType::Resource);
        assert_eq!(parks.values(), vec!["http://lgd/park1", "http://lgd/park2"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dataset = BenchmarkDataset::load(file.path()).unwrap();
        assert_eq!(dataset.questions.len(), 3);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            BenchmarkDataset::from_json("{\"questions\": 3}"),
            Err(BenchmarkError::Parse(_))
        ));
    }
}
