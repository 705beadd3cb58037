//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the bunki crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let survey = SurveyDefinition::from_file("path/to/survey.json")?;
//! let answers: AHashMap<String, serde_json::Value> =
//!     serde_json::from_str(&std::fs::read_to_string("path/to/answers.json")?)?;
//!
//! let navigator = Navigator::new(survey)?;
//! let outcome = navigator.resolve("intro", &answers)?;
//! println!("Next: {} ({})", outcome.next, outcome.reason);
//! # Ok(())
//! # }
//! ```

// Navigation
pub use crate::navigator::{NavigationOutcome, Navigator, NavigatorBuilder, Resolution, resolve_next};

// Evaluation
pub use crate::answer::{AnswerSource, AnswerValue};
pub use crate::evaluator::{
    DanglingReferencePolicy, RuleEngine, evaluate, resolve_condition, resolve_group, resolve_rule,
};
pub use crate::normalizer::{NormalizedBranching, normalize};

// Schema
pub use crate::schema::{
    BranchingLogic, Condition, ConditionGroup, END_SURVEY, EnhancedBranching, LegacyBranching,
    LegacyCondition, LogicalOperator, Operand, Operator, Question, QuestionType, Rule, Section,
    SectionTarget,
};
pub use crate::survey::SurveyDefinition;

// Authoring aids
pub use crate::consistency::{check_survey, is_terminal_target, unreachable_sections};

// Error types
pub use crate::error::{ConsistencyIssue, NavigationError, SchemaError};

// Trace formatting
pub use crate::trace::{EvaluationTrace, TraceFormatter};

pub use ahash::AHashMap;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
