use super::{BranchingLogic, QuestionId, QuestionType, SectionId, SectionTarget};
use serde::{Deserialize, Serialize};

/// An ordered page of a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branching_logic: Option<BranchingLogic>,
}

impl Section {
    pub fn new(id: impl Into<SectionId>, order: i64) -> Self {
        Self {
            id: id.into(),
            order,
            title: None,
            branching_logic: None,
        }
    }

    pub fn with_branching(mut self, branching: impl Into<BranchingLogic>) -> Self {
        self.branching_logic = Some(branching.into());
        self
    }
}

/// A question as far as branching cares: its id, owner, and type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub section_id: SectionId,
    #[serde(rename = "type", alias = "questionType")]
    pub question_type: QuestionType,
}

impl Question {
    pub fn new(
        id: impl Into<QuestionId>,
        section_id: impl Into<SectionId>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            question_type,
        }
    }
}

/// The section following `current` in natural order: the smallest `order`
/// strictly greater than the current one. Ties on `order` resolve to the
/// first such section in the slice.
pub fn natural_next(current: &Section, all_sections: &[Section]) -> SectionTarget {
    all_sections
        .iter()
        .filter(|s| s.order > current.order)
        .min_by_key(|s| s.order)
        .map(|s| SectionTarget::Section(s.id.clone()))
        .unwrap_or(SectionTarget::EndSurvey)
}
