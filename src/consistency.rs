//! Advisory checks for the rule editor.
//!
//! Nothing here affects navigation. The navigator evaluates malformed rules
//! as non-matching; these checks only tell an author why.

use crate::error::ConsistencyIssue;
use crate::normalizer::{NormalizedBranching, normalize};
use crate::schema::{Rule, Section, SectionId, SectionTarget, natural_next};
use crate::survey::SurveyDefinition;
use ahash::AHashSet;
use itertools::Itertools;
use std::collections::VecDeque;

/// Checks every section's branching in the survey.
pub fn check_survey(survey: &SurveyDefinition) -> Vec<ConsistencyIssue> {
    survey
        .sections
        .iter()
        .sorted_by_key(|s| s.order)
        .flat_map(|section| check_section(section, survey))
        .collect()
}

/// Checks one section's branching against the survey it belongs to.
///
/// Question references are only checked when the survey lists its questions.
pub fn check_section(section: &Section, survey: &SurveyDefinition) -> Vec<ConsistencyIssue> {
    let Some(branching) = normalize(section.branching_logic.as_ref()) else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    check_priorities(&section.id, &branching, &mut issues);
    for rule in &branching.rules {
        check_rule(section, rule, survey, &mut issues);
        if let Some(target) = &rule.next_section_id {
            check_target(section, Some(&rule.id), target, survey, &mut issues);
        }
    }
    if let Some(target) = &branching.default_next_section_id {
        check_target(section, None, target, survey, &mut issues);
    }
    issues
}

fn check_priorities(section_id: &str, branching: &NormalizedBranching, issues: &mut Vec<ConsistencyIssue>) {
    let counts = branching.rules.iter().counts_by(|r| r.priority);
    for (&priority, _) in counts.iter().filter(|(_, n)| **n > 1).sorted() {
        issues.push(ConsistencyIssue::DuplicatePriority {
            section_id: section_id.to_string(),
            priority,
        });
    }
    for missing in (1..=branching.rules.len() as i64).filter(|p| !counts.contains_key(p)) {
        issues.push(ConsistencyIssue::PriorityGap {
            section_id: section_id.to_string(),
            missing,
        });
    }
}

fn check_rule(
    section: &Section,
    rule: &Rule,
    survey: &SurveyDefinition,
    issues: &mut Vec<ConsistencyIssue>,
) {
    let section_id = || section.id.clone();
    if rule.condition_groups.is_empty() {
        issues.push(ConsistencyIssue::EmptyRule {
            section_id: section_id(),
            rule_id: rule.id.clone(),
        });
    }
    for group in rule.condition_groups.iter().filter(|g| g.conditions.is_empty()) {
        issues.push(ConsistencyIssue::EmptyGroup {
            section_id: section_id(),
            rule_id: rule.id.clone(),
            group_id: group.id.clone(),
        });
    }

    let questions = survey.question_index();
    for condition in rule.conditions() {
        if !questions.is_empty() {
            match questions.get(&condition.question_id) {
                None => {
                    issues.push(ConsistencyIssue::DanglingQuestion {
                        section_id: section_id(),
                        rule_id: rule.id.clone(),
                        question_id: condition.question_id.clone(),
                    });
                    continue;
                }
                Some(question) if question.question_type != condition.question_type => {
                    issues.push(ConsistencyIssue::StaleQuestionType {
                        section_id: section_id(),
                        rule_id: rule.id.clone(),
                        question_id: condition.question_id.clone(),
                        cached: condition.question_type.clone(),
                        actual: question.question_type.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        if !condition.question_type.participates_in_branching() {
            issues.push(ConsistencyIssue::InformationalQuestion {
                section_id: section_id(),
                rule_id: rule.id.clone(),
                question_id: condition.question_id.clone(),
            });
        } else if !condition.question_type.allows(condition.operator) {
            issues.push(ConsistencyIssue::OperatorNotAllowed {
                section_id: section_id(),
                rule_id: rule.id.clone(),
                question_id: condition.question_id.clone(),
                operator: condition.operator,
                question_type: condition.question_type.clone(),
            });
        }

        if let Some(reason) = condition.operand_defect() {
            issues.push(ConsistencyIssue::MalformedOperand {
                section_id: section_id(),
                rule_id: rule.id.clone(),
                question_id: condition.question_id.clone(),
                reason,
            });
        }
    }
}

fn check_target(
    section: &Section,
    rule_id: Option<&String>,
    target: &SectionTarget,
    survey: &SurveyDefinition,
    issues: &mut Vec<ConsistencyIssue>,
) {
    let SectionTarget::Section(target_id) = target else {
        return;
    };
    if target_id == &section.id {
        issues.push(ConsistencyIssue::SelfTarget {
            section_id: section.id.clone(),
            rule_id: rule_id.cloned(),
        });
    } else if !survey.has_section(target_id) {
        issues.push(ConsistencyIssue::DanglingSection {
            section_id: section.id.clone(),
            rule_id: rule_id.cloned(),
            target: target.clone(),
        });
    }
}

/// Every section a respondent could be sent to from `section`: each rule
/// target, plus the fallback used when no rule matches or a match has no
/// target (the default, or else natural order).
pub fn outgoing_targets(section: &Section, all_sections: &[Section]) -> Vec<SectionTarget> {
    let Some(branching) = normalize(section.branching_logic.as_ref()) else {
        return vec![natural_next(section, all_sections)];
    };
    let fallback = branching
        .default_next_section_id
        .clone()
        .unwrap_or_else(|| natural_next(section, all_sections));
    branching
        .rules
        .iter()
        .filter_map(|r| r.next_section_id.clone())
        .chain(std::iter::once(fallback))
        .unique()
        .collect()
}

/// True when the section is only entered by jumping to it.
///
/// That is: some other section's rule or default names it, and its natural
/// predecessor never falls through to it because that predecessor always
/// leaves via branching (a default target other than this section). The
/// editor uses this to suggest giving such sections an explicit exit.
pub fn is_terminal_target(section_id: &str, all_sections: &[Section]) -> bool {
    let Some(section) = all_sections.iter().find(|s| s.id == section_id) else {
        return false;
    };
    let jumped_to = all_sections
        .iter()
        .filter(|s| s.id != section_id)
        .filter_map(|s| normalize(s.branching_logic.as_ref()))
        .any(|b| {
            b.rules
                .iter()
                .filter_map(|r| r.next_section_id.as_ref())
                .chain(b.default_next_section_id.as_ref())
                .any(|t| t.section_id() == Some(section_id))
        });
    if !jumped_to {
        return false;
    }
    let predecessor = all_sections
        .iter()
        .filter(|s| s.order < section.order)
        .max_by_key(|s| s.order);
    let Some(predecessor) = predecessor else {
        return false;
    };
    match normalize(predecessor.branching_logic.as_ref()) {
        None => false,
        Some(b) => b
            .default_next_section_id
            .as_ref()
            .is_some_and(|d| d.section_id() != Some(section_id)),
    }
}

/// Sections no answer combination can reach from the first section,
/// in survey order. Dangling targets are ignored.
pub fn unreachable_sections(survey: &SurveyDefinition) -> Vec<SectionId> {
    let Some(first) = survey.first_section() else {
        return Vec::new();
    };
    let mut reached: AHashSet<&str> = AHashSet::new();
    let mut queue = VecDeque::from([first]);
    reached.insert(first.id.as_str());
    while let Some(section) = queue.pop_front() {
        for target in outgoing_targets(section, &survey.sections) {
            let Some(next) = target.section_id().and_then(|id| survey.section(id)) else {
                continue;
            };
            if reached.insert(next.id.as_str()) {
                queue.push_back(next);
            }
        }
    }
    survey
        .sections
        .iter()
        .sorted_by_key(|s| s.order)
        .filter(|s| !reached.contains(s.id.as_str()))
        .map(|s| s.id.clone())
        .collect()
}
