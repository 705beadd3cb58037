//! # Bunki - Survey Branching and Section Navigation Engine
//!
//! **Bunki** decides, after a respondent finishes a survey section, which
//! section is shown next. Sections carry branching logic: prioritized rules
//! made of condition groups, each condition comparing one answer against an
//! operand. The first matching rule by priority wins; otherwise the section's
//! default target applies, and failing that the survey continues in order.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Survey**: Deserialize a [`SurveyDefinition`](survey::SurveyDefinition)
//!     (sections, their branching, and optionally the question list) from JSON, or build one in code.
//! 2.  **Build a Navigator**: `Navigator::builder(survey)` normalizes every section's
//!     branching once. Legacy branching is upgraded to the rule-based shape here.
//! 3.  **Resolve**: Call `resolve` with the section just completed and the answers so far.
//!     The result is either a section id or `END_SURVEY`, with an explanation.
//!
//! Evaluation never fails on malformed rules. A rule with no conditions, an
//! operand of the wrong shape or an unparseable number simply does not match.
//! The [`consistency`] module reports such defects for authors.
//!
//! ## Quick Start
//!
//! ```rust
//! use bunki::prelude::*;
//! use serde_json::json;
//!
//! let survey = SurveyDefinition::from_json(r#"{
//!     "sections": [
//!         { "id": "S1", "order": 1, "branchingLogic": {
//!             "rules": [{
//!                 "id": "adults", "priority": 1, "groupOperator": "AND",
//!                 "conditionGroups": [{
//!                     "id": "g1", "conditionOperator": "AND",
//!                     "conditions": [{
//!                         "questionId": "age", "operator": "greater_than",
//!                         "value": 17, "questionType": "scale"
//!                     }]
//!                 }],
//!                 "nextSectionId": "S3"
//!             }],
//!             "defaultNextSectionId": "END_SURVEY"
//!         }},
//!         { "id": "S2", "order": 2 },
//!         { "id": "S3", "order": 3 }
//!     ]
//! }"#)?;
//!
//! let navigator = Navigator::builder(survey).build()?;
//! let answers = json!({ "age": "34" });
//! let answers = answers.as_object().unwrap();
//!
//! let outcome = navigator.resolve("S1", answers)?;
//! assert_eq!(outcome.next, SectionTarget::section("S3"));
//! println!("{}", outcome.reason); // Rule 'adults' (priority 1) matched: $age (was 34) > 17
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod answer;
pub mod consistency;
pub mod error;
pub mod evaluator;
pub mod navigator;
pub mod normalizer;
pub mod prelude;
pub mod schema;
pub mod survey;
pub mod trace;
