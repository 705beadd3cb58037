use crate::schema::{Operator, QuestionType, SectionTarget};
use thiserror::Error;

/// Errors that can occur while loading a survey definition.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("Failed to parse survey JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Section '{0}' is defined more than once")]
    DuplicateSection(String),

    #[error("Question '{question_id}' belongs to section '{section_id}', which does not exist")]
    OrphanQuestion {
        question_id: String,
        section_id: String,
    },
}

/// Errors from navigation previews. Resolving a single transition never fails
/// for a known section.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("Section '{0}' not found in the survey")]
    SectionNotFound(String),

    #[error("Section '{repeated}' is visited twice along the path {}", .path.join(" -> "))]
    Cycle { path: Vec<String>, repeated: String },

    #[error("Path did not end within {0} steps")]
    StepLimitExceeded(usize),
}

/// An authoring-time defect in a section's branching. Advisory only: the
/// navigator tolerates every one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsistencyIssue {
    #[error("Rule '{rule_id}' in section '{section_id}' has no condition groups")]
    EmptyRule { section_id: String, rule_id: String },

    #[error("Group '{group_id}' of rule '{rule_id}' in section '{section_id}' has no conditions")]
    EmptyGroup {
        section_id: String,
        rule_id: String,
        group_id: String,
    },

    #[error("Rule '{rule_id}' in section '{section_id}' references unknown question '{question_id}'")]
    DanglingQuestion {
        section_id: String,
        rule_id: String,
        question_id: String,
    },

    #[error("{} in section '{section_id}' targets unknown section '{target}'", rule_label(.rule_id))]
    DanglingSection {
        section_id: String,
        rule_id: Option<String>,
        target: SectionTarget,
    },

    #[error("{} in section '{section_id}' routes back to its own section", rule_label(.rule_id))]
    SelfTarget {
        section_id: String,
        rule_id: Option<String>,
    },

    #[error("Condition on '{question_id}' in rule '{rule_id}' (section '{section_id}'): {reason}")]
    MalformedOperand {
        section_id: String,
        rule_id: String,
        question_id: String,
        reason: String,
    },

    #[error(
        "Operator '{operator}' is not offered for {question_type} question '{question_id}' (rule '{rule_id}', section '{section_id}')"
    )]
    OperatorNotAllowed {
        section_id: String,
        rule_id: String,
        question_id: String,
        operator: Operator,
        question_type: QuestionType,
    },

    #[error(
        "Condition on '{question_id}' caches type {cached} but the question is {actual} (rule '{rule_id}', section '{section_id}')"
    )]
    StaleQuestionType {
        section_id: String,
        rule_id: String,
        question_id: String,
        cached: QuestionType,
        actual: QuestionType,
    },

    #[error(
        "Rule '{rule_id}' in section '{section_id}' branches on informational block '{question_id}'"
    )]
    InformationalQuestion {
        section_id: String,
        rule_id: String,
        question_id: String,
    },

    #[error("Priority {priority} is used by more than one rule in section '{section_id}'")]
    DuplicatePriority { section_id: String, priority: i64 },

    #[error("Priority {missing} is missing from the rules of section '{section_id}'")]
    PriorityGap { section_id: String, missing: i64 },
}

fn rule_label(rule_id: &Option<String>) -> String {
    match rule_id {
        Some(id) => format!("Rule '{}'", id),
        None => "The default target".to_string(),
    }
}
