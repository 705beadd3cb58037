use crate::error::SchemaError;
use crate::schema::{Question, QuestionId, Section, SectionId};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fs;

/// A survey as far as navigation is concerned: its sections, each carrying
/// optional branching, and the questions conditions may reference.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SurveyDefinition {
    pub sections: Vec<Section>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl SurveyDefinition {
    pub fn new(sections: Vec<Section>, questions: Vec<Question>) -> Self {
        Self {
            sections,
            questions,
        }
    }

    /// Parses and validates a survey document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let survey: Self =
            serde_json::from_str(json).map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
        survey.validate()?;
        Ok(survey)
    }

    /// Load a survey definition from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Rejects duplicate section ids and questions owned by missing sections.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = AHashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(SchemaError::DuplicateSection(section.id.clone()));
            }
        }
        if let Some(orphan) = self
            .questions
            .iter()
            .find(|q| !seen.contains(q.section_id.as_str()))
        {
            return Err(SchemaError::OrphanQuestion {
                question_id: orphan.id.clone(),
                section_id: orphan.section_id.clone(),
            });
        }
        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The section with the lowest `order`, where respondents start.
    pub fn first_section(&self) -> Option<&Section> {
        self.sections.iter().min_by_key(|s| s.order)
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.section(id).is_some()
    }

    pub fn question_index(&self) -> AHashMap<QuestionId, &Question> {
        self.questions.iter().map(|q| (q.id.clone(), q)).collect()
    }

    pub fn question_ids(&self) -> AHashSet<QuestionId> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }

    pub fn section_ids(&self) -> AHashSet<SectionId> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }
}
