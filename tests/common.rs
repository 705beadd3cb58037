//! Common test utilities for building branching definitions and answers.
use bunki::prelude::*;
use serde_json::{Value, json};

/// A single-condition group.
#[allow(dead_code)]
pub fn group(id: &str, condition: Condition) -> ConditionGroup {
    ConditionGroup::new(id, LogicalOperator::And, vec![condition])
}

#[allow(dead_code)]
pub fn cond(question_id: &str, ty: QuestionType, operator: Operator, operand: &str) -> Condition {
    Condition::new(question_id, ty, operator, Some(Operand::scalar(operand)))
}

/// A condition that is true for any answer map: `$Q_ALWAYS is blank` where
/// `Q_ALWAYS` is never answered.
#[allow(dead_code)]
pub fn always() -> Condition {
    Condition::new("Q_ALWAYS", QuestionType::Text, Operator::IsBlank, None)
}

#[allow(dead_code)]
pub fn rule(id: &str, priority: i64, groups: Vec<ConditionGroup>, next: Option<&str>) -> Rule {
    Rule::new(
        id,
        priority,
        LogicalOperator::And,
        groups,
        next.map(SectionTarget::from),
    )
}

/// Sections `S1..=S<count>` in natural order, without branching.
#[allow(dead_code)]
pub fn linear_sections(count: usize) -> Vec<Section> {
    (1..=count)
        .map(|i| Section::new(format!("S{}", i), i as i64))
        .collect()
}

/// Section S1 routes on Q2:
/// priority 1: `Q2 > 5` -> S4, priority 2: `Q2 < 5` -> S5, default S6.
#[allow(dead_code)]
pub fn create_scale_routing() -> EnhancedBranching {
    EnhancedBranching {
        rules: vec![
            rule(
                "high",
                1,
                vec![group("g-high", cond("Q2", QuestionType::Scale, Operator::GreaterThan, "5"))],
                Some("S4"),
            ),
            rule(
                "low",
                2,
                vec![group("g-low", cond("Q2", QuestionType::Scale, Operator::LessThan, "5"))],
                Some("S5"),
            ),
        ],
        default_next_section_id: Some(SectionTarget::section("S6")),
    }
}

/// Six sections in order; S1 carries [`create_scale_routing`].
#[allow(dead_code)]
pub fn create_scale_survey() -> SurveyDefinition {
    let mut sections = linear_sections(6);
    sections[0].branching_logic = Some(create_scale_routing().into());
    SurveyDefinition::new(
        sections,
        vec![
            Question::new("Q1", "S1", QuestionType::Text),
            Question::new("Q2", "S1", QuestionType::Scale),
        ],
    )
}

/// Builds an answer map from a JSON object literal.
#[allow(dead_code)]
pub fn answers(value: Value) -> AHashMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => AHashMap::new(),
    }
}

#[allow(dead_code)]
pub fn no_answers() -> AHashMap<String, Value> {
    answers(json!({}))
}

/// A complete survey document in the stored JSON shape, mixing an enhanced
/// rule set, a legacy rule set and a section without branching.
#[allow(dead_code)]
pub const SURVEY_JSON: &str = r#"{
    "sections": [
        {
            "id": "intro",
            "order": 1,
            "title": "About you",
            "branchingLogic": {
                "rules": [
                    {
                        "id": "students",
                        "priority": 1,
                        "groupOperator": "OR",
                        "conditionGroups": [
                            {
                                "id": "g1",
                                "conditionOperator": "AND",
                                "conditions": [
                                    { "questionId": "occupation", "sectionId": "intro", "operator": "equals", "value": "Student", "questionType": "radio" },
                                    { "questionId": "age", "sectionId": "intro", "operator": "between", "value": [16, 30], "questionType": "scale" }
                                ]
                            },
                            {
                                "id": "g2",
                                "conditionOperator": "AND",
                                "conditions": [
                                    { "questionId": "interests", "sectionId": "intro", "operator": "contains", "value": "campus life", "questionType": "checkbox" }
                                ]
                            }
                        ],
                        "nextSectionId": "campus"
                    },
                    {
                        "id": "no-comment",
                        "priority": 2,
                        "groupOperator": "AND",
                        "conditionGroups": [
                            {
                                "id": "g3",
                                "conditionOperator": "AND",
                                "conditions": [
                                    { "questionId": "comment", "operator": "is_blank", "questionType": "paragraph" }
                                ]
                            }
                        ],
                        "nextSectionId": "END_SURVEY"
                    }
                ],
                "defaultNextSectionId": null
            }
        },
        {
            "id": "work",
            "order": 2,
            "branchingLogic": {
                "conditions": [
                    { "questionId": "remote", "value": "Yes" }
                ],
                "defaultNextSectionId": "wrapup"
            }
        },
        { "id": "campus", "order": 3 },
        { "id": "wrapup", "order": 4 }
    ],
    "questions": [
        { "id": "occupation", "sectionId": "intro", "type": "radio" },
        { "id": "age", "sectionId": "intro", "type": "scale" },
        { "id": "interests", "sectionId": "intro", "type": "checkbox" },
        { "id": "comment", "sectionId": "intro", "type": "paragraph" },
        { "id": "intro-banner", "sectionId": "intro", "type": "informational-image" },
        { "id": "remote", "sectionId": "work", "type": "radio" }
    ]
}"#;
