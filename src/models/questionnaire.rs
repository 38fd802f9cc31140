// src/models/questionnaire.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single `{value, label}` choice for select/radio/checkbox questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

/// Closed set of supported input widgets.
/// Exhaustive matching guarantees every type has a rendering path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Number,
    Select,
    Radio,
    Checkbox,
    Range,
}

impl QuestionType {
    /// Whether answers for this type are picked from the declared options.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::Radio | QuestionType::Checkbox
        )
    }
}

/// A single question inside a step. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique key the answer is stored under.
    pub question_key: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub is_required: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Resolves a stored option value to its display label.
    /// Falls back to the raw value when no option matches.
    pub fn option_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.as_str())
            .unwrap_or(value)
    }
}

/// One step of the multi-step questionnaire. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireStep {
    /// 1-based position as declared by the backend.
    pub step_number: usize,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

/// Wire envelope for `GET /api/questionnaire/`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionnaireResponse {
    pub steps: Vec<QuestionnaireStep>,
}

/// A single answer value; its shape depends on the question type.
/// Text/select/radio answers are strings, number/range answers are numeric,
/// checkbox answers are a set-like list of selected option values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Multi(Vec<String>),
}

impl AnswerValue {
    /// "Non-empty" rule used for required-question validation: an empty
    /// string or an empty selection set does not count as an answer.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.is_empty(),
            AnswerValue::Number(_) => false,
            AnswerValue::Multi(values) => values.is_empty(),
        }
    }
}

/// Accumulated answers keyed by question key.
/// Mutated incrementally as the user advances; persisted across reloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormAnswers(BTreeMap<String, AnswerValue>);

impl FormAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Sets a single answer, leaving every other key untouched.
    pub fn set(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.0.insert(key.into(), value);
    }

    /// Merge-by-key: keys present in `other` replace, all others are kept.
    pub fn merge(&mut self, other: FormAnswers) {
        self.0.extend(other.0);
    }

    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.0.remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    /// Whether `key` holds a non-empty answer (see `AnswerValue::is_empty`).
    pub fn has_answer(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|value| !value.is_empty())
    }
}

/// Position and validity of the questionnaire cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct FormProgress {
    /// 0-based index of the current step.
    pub current: usize,
    pub total: usize,
    /// True iff every required question in the current step has a
    /// non-empty answer.
    pub is_valid: bool,
}
