//! Answer shapes as handed over by response collection.
//!
//! Answers arrive as a raw string, a raw array of strings (checkbox), or an
//! object wrapping either under `value`. They are reduced to [`AnswerValue`]
//! once, before any operator runs.

use crate::schema::operand::scalar_to_string;
use ahash::AHashMap;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

/// The canonical answer shape seen by the operator evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnswerValue {
    Absent,
    Scalar(String),
    Set(Vec<String>),
}

impl AnswerValue {
    pub fn from_json(raw: Option<&JsonValue>) -> Self {
        match raw {
            None | Some(JsonValue::Null) => AnswerValue::Absent,
            Some(JsonValue::Array(items)) => {
                AnswerValue::Set(items.iter().filter_map(scalar_to_string).collect())
            }
            Some(JsonValue::Object(fields)) => AnswerValue::from_json(fields.get("value")),
            Some(scalar) => scalar_to_string(scalar)
                .map(AnswerValue::Scalar)
                .unwrap_or(AnswerValue::Absent),
        }
    }

    /// Absent, whitespace-only, or an empty selection.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Absent => true,
            AnswerValue::Scalar(s) => s.trim().is_empty(),
            AnswerValue::Set(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Absent => write!(f, "blank"),
            AnswerValue::Scalar(s) => write!(f, "{}", s),
            AnswerValue::Set(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A lookup from question id to the respondent's raw answer.
///
/// The map spans every section answered so far, so conditions may reference
/// questions outside the section being left.
pub trait AnswerSource {
    fn raw_answer(&self, question_id: &str) -> Option<&JsonValue>;

    fn answer(&self, question_id: &str) -> AnswerValue {
        AnswerValue::from_json(self.raw_answer(question_id))
    }
}

impl AnswerSource for AHashMap<String, JsonValue> {
    fn raw_answer(&self, question_id: &str) -> Option<&JsonValue> {
        self.get(question_id)
    }
}

impl<S: BuildHasher> AnswerSource for HashMap<String, JsonValue, S> {
    fn raw_answer(&self, question_id: &str) -> Option<&JsonValue> {
        self.get(question_id)
    }
}

impl AnswerSource for Map<String, JsonValue> {
    fn raw_answer(&self, question_id: &str) -> Option<&JsonValue> {
        self.get(question_id)
    }
}

impl<A: AnswerSource + ?Sized> AnswerSource for &A {
    fn raw_answer(&self, question_id: &str) -> Option<&JsonValue> {
        (**self).raw_answer(question_id)
    }
}
