//! Reduces either stored branching schema to the one shape the navigator runs.

use crate::schema::{
    BranchingLogic, Condition, ConditionGroup, EnhancedBranching, LegacyBranching,
    LogicalOperator, Operator, QuestionType, Rule, SectionTarget,
};

/// Rule id given to the single rule synthesized from a legacy schema.
pub const LEGACY_RULE_ID: &str = "legacy";

/// Branching in evaluation form: rules already sorted by priority, ties kept
/// in their authored order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBranching {
    pub rules: Vec<Rule>,
    pub default_next_section_id: Option<SectionTarget>,
}

/// Normalizes a section's branching. `None` means no branching is configured.
pub fn normalize(raw: Option<&BranchingLogic>) -> Option<NormalizedBranching> {
    raw.map(|logic| match logic {
        BranchingLogic::Enhanced(enhanced) => normalize_enhanced(enhanced),
        BranchingLogic::Legacy(legacy) => upgrade_legacy(legacy),
    })
}

fn normalize_enhanced(enhanced: &EnhancedBranching) -> NormalizedBranching {
    if !enhanced.has_dense_priorities() {
        log::debug!(
            "rule priorities are not a dense 1..={} sequence; ordering by priority then position",
            enhanced.rules.len()
        );
    }
    NormalizedBranching {
        rules: enhanced.rules_by_priority().cloned().collect(),
        default_next_section_id: enhanced.default_next_section_id.clone(),
    }
}

/// Lifts the deprecated schema into a single priority-1 rule: one group per
/// legacy condition, groups joined by AND, every check an `equals`. The rule
/// has no target of its own, so a match falls through to the default.
pub fn upgrade_legacy(legacy: &LegacyBranching) -> NormalizedBranching {
    log::debug!(
        "upgrading legacy branching with {} condition(s)",
        legacy.conditions.len()
    );
    let rules = if legacy.conditions.is_empty() {
        Vec::new()
    } else {
        let groups = legacy
            .conditions
            .iter()
            .enumerate()
            .map(|(index, c)| {
                let condition = Condition {
                    question_id: c.question_id.clone(),
                    section_id: c.section_id.clone(),
                    operator: Operator::Equals,
                    operand: Some(c.value.clone()),
                    question_type: c.question_type.clone().unwrap_or(QuestionType::Radio),
                };
                ConditionGroup::new(
                    format!("{}-{}", LEGACY_RULE_ID, index + 1),
                    LogicalOperator::And,
                    vec![condition],
                )
            })
            .collect();
        vec![Rule::new(LEGACY_RULE_ID, 1, LogicalOperator::And, groups, None)]
    };
    NormalizedBranching {
        rules,
        default_next_section_id: legacy.default_next_section_id.clone(),
    }
}

impl From<NormalizedBranching> for EnhancedBranching {
    fn from(value: NormalizedBranching) -> Self {
        EnhancedBranching {
            rules: value.rules,
            default_next_section_id: value.default_next_section_id,
        }
    }
}
