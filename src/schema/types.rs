use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub type SectionId = String;
pub type QuestionId = String;

/// The literal used in stored schemas for the end-of-survey sentinel.
pub const END_SURVEY: &str = "END_SURVEY";

/// The kind of question a condition refers to. Selects operand semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuestionType {
    Text,
    Paragraph,
    Radio,
    Select,
    Checkbox,
    Scale,
    Date,
    Time,
    /// Display-only blocks (`informational-text`, `informational-image`, ...).
    /// The suffix is kept verbatim.
    Informational(String),
}

impl QuestionType {
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name {
            "text" => QuestionType::Text,
            "paragraph" => QuestionType::Paragraph,
            "radio" => QuestionType::Radio,
            "select" => QuestionType::Select,
            "checkbox" => QuestionType::Checkbox,
            "scale" => QuestionType::Scale,
            "date" => QuestionType::Date,
            "time" => QuestionType::Time,
            other => {
                let kind = other.strip_prefix("informational-")?;
                QuestionType::Informational(kind.to_string())
            }
        };
        Some(ty)
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Paragraph => "paragraph",
            QuestionType::Radio => "radio",
            QuestionType::Select => "select",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Scale => "scale",
            QuestionType::Date => "date",
            QuestionType::Time => "time",
            QuestionType::Informational(_) => "informational",
        }
    }

    /// Informational blocks carry no answer and never appear in conditions.
    pub fn participates_in_branching(&self) -> bool {
        !matches!(self, QuestionType::Informational(_))
    }

    pub fn is_multi_valued(&self) -> bool {
        matches!(self, QuestionType::Checkbox)
    }

    /// The operators the rule editor offers for this question type.
    pub fn allowed_operators(&self) -> &'static [Operator] {
        use Operator::*;
        match self {
            QuestionType::Text | QuestionType::Paragraph => &[
                Equals,
                NotEquals,
                Contains,
                NotContains,
                IsBlank,
                IsNotBlank,
            ],
            QuestionType::Scale | QuestionType::Date | QuestionType::Time => {
                &[Equals, NotEquals, LessThan, GreaterThan, Between]
            }
            QuestionType::Radio | QuestionType::Select | QuestionType::Checkbox => {
                &[Equals, NotEquals, Contains, NotContains]
            }
            QuestionType::Informational(_) => &[],
        }
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.allowed_operators().contains(&operator)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Informational(kind) => write!(f, "informational-{}", kind),
            other => f.write_str(other.as_str()),
        }
    }
}

impl Serialize for QuestionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        QuestionType::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown question type '{}'", name)))
    }
}

/// Comparison operators available to a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsBlank,
    IsNotBlank,
    LessThan,
    GreaterThan,
    Between,
}

impl Operator {
    /// `is_blank` and `is_not_blank` take no operand.
    pub fn takes_operand(self) -> bool {
        !matches!(self, Operator::IsBlank | Operator::IsNotBlank)
    }

    pub fn takes_range(self) -> bool {
        matches!(self, Operator::Between)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Contains => "contains",
            Operator::NotContains => "does not contain",
            Operator::IsBlank => "is blank",
            Operator::IsNotBlank => "is not blank",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::Between => "between",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::IsBlank => "is_blank",
            Operator::IsNotBlank => "is_not_blank",
            Operator::LessThan => "less_than",
            Operator::GreaterThan => "greater_than",
            Operator::Between => "between",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("AND"),
            LogicalOperator::Or => f.write_str("OR"),
        }
    }
}

/// Where a rule or default sends the respondent. "Unset" is `Option::None`
/// at the use site, never a variant here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionTarget {
    Section(SectionId),
    EndSurvey,
}

impl SectionTarget {
    pub fn section(id: impl Into<SectionId>) -> Self {
        SectionTarget::Section(id.into())
    }

    pub fn section_id(&self) -> Option<&str> {
        match self {
            SectionTarget::Section(id) => Some(id),
            SectionTarget::EndSurvey => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, SectionTarget::EndSurvey)
    }
}

impl fmt::Display for SectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionTarget::Section(id) => f.write_str(id),
            SectionTarget::EndSurvey => f.write_str(END_SURVEY),
        }
    }
}

impl From<String> for SectionTarget {
    fn from(value: String) -> Self {
        if value == END_SURVEY {
            SectionTarget::EndSurvey
        } else {
            SectionTarget::Section(value)
        }
    }
}

impl From<&str> for SectionTarget {
    fn from(value: &str) -> Self {
        SectionTarget::from(value.to_string())
    }
}

impl Serialize for SectionTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SectionTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SectionTarget::from)
    }
}

/// Reads an optional target where `null`, a missing key, and a blank id all
/// mean unset.
pub(crate) fn deserialize_optional_target<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SectionTarget>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|id| !id.trim().is_empty())
        .map(SectionTarget::from))
}
