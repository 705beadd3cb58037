//! Tests for the advisory consistency checks used by the rule editor.
mod common;
use bunki::consistency::{check_section, outgoing_targets};
use bunki::prelude::*;
use common::*;

fn survey_with(branching: EnhancedBranching) -> SurveyDefinition {
    let mut sections = linear_sections(3);
    sections[0].branching_logic = Some(branching.into());
    SurveyDefinition::new(
        sections,
        vec![
            Question::new("Q1", "S1", QuestionType::Text),
            Question::new("Q2", "S1", QuestionType::Scale),
            Question::new("banner", "S1", QuestionType::Informational("image".into())),
        ],
    )
}

#[test]
fn test_clean_branching_has_no_issues() {
    let survey = survey_with(EnhancedBranching {
        rules: vec![rule(
            "r1",
            1,
            vec![group("g", cond("Q2", QuestionType::Scale, Operator::GreaterThan, "5"))],
            Some("S3"),
        )],
        default_next_section_id: Some(SectionTarget::EndSurvey),
    });
    assert_eq!(check_survey(&survey), vec![]);
}

#[test]
fn test_structural_defects_are_reported() {
    let survey = survey_with(EnhancedBranching {
        rules: vec![
            rule("no-groups", 1, vec![], Some("S2")),
            rule(
                "empty-group",
                2,
                vec![ConditionGroup::new("hollow", LogicalOperator::Or, vec![])],
                Some("S2"),
            ),
        ],
        default_next_section_id: None,
    });
    let issues = check_survey(&survey);
    assert!(issues.contains(&ConsistencyIssue::EmptyRule {
        section_id: "S1".into(),
        rule_id: "no-groups".into(),
    }));
    assert!(issues.contains(&ConsistencyIssue::EmptyGroup {
        section_id: "S1".into(),
        rule_id: "empty-group".into(),
        group_id: "hollow".into(),
    }));
}

#[test]
fn test_dangling_references_are_reported() {
    let survey = survey_with(EnhancedBranching {
        rules: vec![rule(
            "r1",
            1,
            vec![group("g", cond("gone", QuestionType::Text, Operator::Equals, "x"))],
            Some("S9"),
        )],
        default_next_section_id: Some(SectionTarget::section("S1")),
    });
    let issues = check_survey(&survey);
    assert_eq!(
        issues,
        vec![
            ConsistencyIssue::DanglingQuestion {
                section_id: "S1".into(),
                rule_id: "r1".into(),
                question_id: "gone".into(),
            },
            ConsistencyIssue::DanglingSection {
                section_id: "S1".into(),
                rule_id: Some("r1".into()),
                target: SectionTarget::section("S9"),
            },
            ConsistencyIssue::SelfTarget {
                section_id: "S1".into(),
                rule_id: None,
            },
        ]
    );
    assert!(issues[1].to_string().contains("Rule 'r1'"));
    assert!(issues[2].to_string().starts_with("The default target"));
}

#[test]
fn test_operand_and_operator_defects() {
    let inverted = Condition::new(
        "Q2",
        QuestionType::Scale,
        Operator::Between,
        Some(Operand::range("10", "1")),
    );
    let scalar_between = cond("Q2", QuestionType::Scale, Operator::Between, "3");
    let missing_value = Condition::new("Q1", QuestionType::Text, Operator::Equals, None);
    let not_offered = cond("Q1", QuestionType::Text, Operator::GreaterThan, "3");
    let survey = survey_with(EnhancedBranching {
        rules: vec![rule(
            "r1",
            1,
            vec![ConditionGroup::new(
                "g",
                LogicalOperator::Or,
                vec![inverted, scalar_between, missing_value, not_offered],
            )],
            Some("S3"),
        )],
        default_next_section_id: None,
    });
    let issues = check_survey(&survey);
    let malformed = issues
        .iter()
        .filter(|i| matches!(i, ConsistencyIssue::MalformedOperand { .. }))
        .count();
    assert_eq!(malformed, 3, "{:#?}", issues);
    assert!(issues.contains(&ConsistencyIssue::OperatorNotAllowed {
        section_id: "S1".into(),
        rule_id: "r1".into(),
        question_id: "Q1".into(),
        operator: Operator::GreaterThan,
        question_type: QuestionType::Text,
    }));
    assert!(issues.iter().any(|i| i.to_string().contains("exceeds maximum")));
}

#[test]
fn test_type_drift_and_informational_blocks() {
    let survey = survey_with(EnhancedBranching {
        rules: vec![rule(
            "r1",
            1,
            vec![ConditionGroup::new(
                "g",
                LogicalOperator::And,
                vec![
                    cond("Q2", QuestionType::Text, Operator::Equals, "5"),
                    Condition::new(
                        "banner",
                        QuestionType::Informational("image".into()),
                        Operator::IsBlank,
                        None,
                    ),
                ],
            )],
            Some("S3"),
        )],
        default_next_section_id: None,
    });
    let issues = check_survey(&survey);
    assert!(issues.contains(&ConsistencyIssue::StaleQuestionType {
        section_id: "S1".into(),
        rule_id: "r1".into(),
        question_id: "Q2".into(),
        cached: QuestionType::Text,
        actual: QuestionType::Scale,
    }));
    assert!(issues.contains(&ConsistencyIssue::InformationalQuestion {
        section_id: "S1".into(),
        rule_id: "r1".into(),
        question_id: "banner".into(),
    }));
}

#[test]
fn test_priority_collisions_and_gaps() {
    let survey = survey_with(EnhancedBranching {
        rules: vec![
            rule("a", 1, vec![group("g1", always())], Some("S2")),
            rule("b", 1, vec![group("g2", always())], Some("S3")),
            rule("c", 4, vec![group("g3", always())], Some("S3")),
        ],
        default_next_section_id: None,
    });
    let issues = check_section(&survey.sections[0], &survey);
    let priority_issues: Vec<_> = issues
        .into_iter()
        .filter(|i| {
            matches!(
                i,
                ConsistencyIssue::DuplicatePriority { .. } | ConsistencyIssue::PriorityGap { .. }
            )
        })
        .collect();
    assert_eq!(
        priority_issues,
        vec![
            ConsistencyIssue::DuplicatePriority {
                section_id: "S1".into(),
                priority: 1,
            },
            ConsistencyIssue::PriorityGap {
                section_id: "S1".into(),
                missing: 2,
            },
            ConsistencyIssue::PriorityGap {
                section_id: "S1".into(),
                missing: 3,
            },
        ]
    );
}

#[test]
fn test_terminal_targets() {
    // S1 jumps to S4 or defaults to S3, so S2 is never reached and S4 is only entered by the jump.
    let mut sections = linear_sections(5);
    sections[0].branching_logic = Some(
        EnhancedBranching {
            rules: vec![rule("jump", 1, vec![group("g", always())], Some("S4"))],
            default_next_section_id: Some(SectionTarget::section("S3")),
        }
        .into(),
    );
    sections[2].branching_logic = Some(
        EnhancedBranching {
            rules: vec![],
            default_next_section_id: Some(SectionTarget::EndSurvey),
        }
        .into(),
    );

    assert!(is_terminal_target("S4", &sections));
    // S3 is a jump target, but S2 falls through into it.
    assert!(!is_terminal_target("S3", &sections));
    assert!(!is_terminal_target("S5", &sections));
    assert!(!is_terminal_target("S1", &sections));
    assert!(!is_terminal_target("missing", &sections));

    let survey = SurveyDefinition::new(sections, vec![]);
    assert_eq!(unreachable_sections(&survey), vec!["S2".to_string()]);
}

#[test]
fn test_outgoing_targets_include_the_fallback() {
    let survey = create_scale_survey();
    let targets = outgoing_targets(&survey.sections[0], &survey.sections);
    assert_eq!(
        targets,
        vec![
            SectionTarget::section("S4"),
            SectionTarget::section("S5"),
            SectionTarget::section("S6"),
        ]
    );
    let plain = outgoing_targets(&survey.sections[5], &survey.sections);
    assert_eq!(plain, vec![SectionTarget::EndSurvey]);
}
