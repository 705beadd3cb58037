use super::types::deserialize_optional_target;
use super::{LogicalOperator, Operand, Operator, QuestionId, QuestionType, SectionId, SectionTarget};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// A single comparison between one question's answer and an operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub question_id: QuestionId,
    /// Section owning the referenced question, cached by the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    pub operator: Operator,
    #[serde(default, rename = "value", skip_serializing_if = "Option::is_none")]
    pub operand: Option<Operand>,
    pub question_type: QuestionType,
}

impl Condition {
    pub fn new(
        question_id: impl Into<QuestionId>,
        question_type: QuestionType,
        operator: Operator,
        operand: Option<Operand>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            section_id: None,
            operator,
            operand,
            question_type,
        }
    }

    pub fn in_section(mut self, section_id: impl Into<SectionId>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }

    /// Describes why the operand does not fit the operator, if it doesn't.
    pub fn operand_defect(&self) -> Option<String> {
        match (&self.operand, self.operator) {
            (_, op) if !op.takes_operand() => None,
            (None, op) => Some(format!("'{}' requires a value", op)),
            (Some(operand), Operator::Between) => match operand.as_range() {
                None => Some("'between' requires a [min, max] pair".to_string()),
                Some((min, max)) => {
                    let (Some(lo), Some(hi)) = (
                        crate::evaluator::parse_ordinal(min, &self.question_type),
                        crate::evaluator::parse_ordinal(max, &self.question_type),
                    ) else {
                        return Some(format!("range bounds '{}'..'{}' are not comparable", min, max));
                    };
                    (lo > hi).then(|| format!("range minimum '{}' exceeds maximum '{}'", min, max))
                }
            },
            (Some(Operand::List(_)), op) => Some(format!("'{}' requires a single value", op)),
            (Some(Operand::Scalar(_)), _) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub condition_operator: LogicalOperator,
}

impl ConditionGroup {
    pub fn new(id: impl Into<String>, operator: LogicalOperator, conditions: Vec<Condition>) -> Self {
        Self {
            id: id.into(),
            conditions,
            condition_operator: operator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    /// Lower runs first. Zero and negative values are accepted and simply
    /// sort ahead of 1.
    pub priority: i64,
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
    #[serde(default)]
    pub group_operator: LogicalOperator,
    #[serde(default, deserialize_with = "deserialize_optional_target")]
    pub next_section_id: Option<SectionTarget>,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        priority: i64,
        operator: LogicalOperator,
        groups: Vec<ConditionGroup>,
        next: Option<SectionTarget>,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            condition_groups: groups,
            group_operator: operator,
            next_section_id: next,
        }
    }

    /// A rule with no groups, or with an empty group, can never match.
    pub fn is_structurally_valid(&self) -> bool {
        !self.condition_groups.is_empty()
            && self.condition_groups.iter().all(|g| !g.conditions.is_empty())
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.condition_groups.iter().flat_map(|g| g.conditions.iter())
    }
}

/// The current branching schema: prioritized rules plus a default target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedBranching {
    pub rules: Vec<Rule>,
    #[serde(default, deserialize_with = "deserialize_optional_target")]
    pub default_next_section_id: Option<SectionTarget>,
}

/// One equality check from the deprecated schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCondition {
    pub question_id: QuestionId,
    pub value: Operand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
}

/// The deprecated branching schema. Only ever read, never produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBranching {
    #[serde(default)]
    pub conditions: Vec<LegacyCondition>,
    #[serde(default, deserialize_with = "deserialize_optional_target")]
    pub default_next_section_id: Option<SectionTarget>,
}

/// Either branching schema as stored on a section. A `rules` key selects the
/// enhanced shape; anything else is read as legacy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BranchingLogic {
    Enhanced(EnhancedBranching),
    Legacy(LegacyBranching),
}

impl<'de> Deserialize<'de> for BranchingLogic {
    /// An enhanced document that fails to parse is an error, never a legacy one.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        if raw.get("rules").is_some() {
            EnhancedBranching::deserialize(raw)
                .map(BranchingLogic::Enhanced)
                .map_err(|e| D::Error::custom(format!("invalid rule-based branching: {}", e)))
        } else {
            LegacyBranching::deserialize(raw)
                .map(BranchingLogic::Legacy)
                .map_err(|e| D::Error::custom(format!("invalid legacy branching: {}", e)))
        }
    }
}

impl BranchingLogic {
    pub fn default_next_section_id(&self) -> Option<&SectionTarget> {
        match self {
            BranchingLogic::Enhanced(b) => b.default_next_section_id.as_ref(),
            BranchingLogic::Legacy(b) => b.default_next_section_id.as_ref(),
        }
    }
}

impl From<EnhancedBranching> for BranchingLogic {
    fn from(value: EnhancedBranching) -> Self {
        BranchingLogic::Enhanced(value)
    }
}

impl From<LegacyBranching> for BranchingLogic {
    fn from(value: LegacyBranching) -> Self {
        BranchingLogic::Legacy(value)
    }
}
