//! Decides which section follows the one a respondent just finished.

use crate::answer::AnswerSource;
use crate::error::{NavigationError, SchemaError};
use crate::evaluator::{DanglingReferencePolicy, RuleEngine};
use crate::normalizer::{NormalizedBranching, normalize};
use crate::schema::{BranchingLogic, QuestionId, Section, SectionId, SectionTarget, natural_next};
use crate::survey::SurveyDefinition;
use crate::trace::TraceFormatter;
use ahash::{AHashMap, AHashSet};

const DEFAULT_MAX_WALK_STEPS: usize = 1_000;

/// How the next section was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A rule matched and carried its own target.
    Rule { rule_id: String, priority: i64 },
    /// The section's default target was used. `matched_rule` is set when a
    /// rule matched but had no target.
    Default { matched_rule: Option<String> },
    /// Fell through to the next section by `order`.
    NaturalOrder { matched_rule: Option<String> },
}

/// The result of resolving one section transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub next: SectionTarget,
    pub resolution: Resolution,
    /// A human-readable explanation of the decision.
    pub reason: String,
}

/// Resolves the section after `section`.
///
/// Rules are tried in ascending priority and the first match wins. A matching
/// rule without a target, or no match at all, falls back to the default
/// target and then to natural order. Never fails and never mutates its input.
pub fn resolve_next<A: AnswerSource + ?Sized>(
    section: &Section,
    branching: Option<&BranchingLogic>,
    answers: &A,
    all_sections: &[Section],
) -> SectionTarget {
    let normalized = normalize(branching);
    route(
        section,
        normalized.as_ref(),
        &RuleEngine::new(answers),
        all_sections,
    )
    .next
}

fn route<A: AnswerSource + ?Sized>(
    section: &Section,
    branching: Option<&NormalizedBranching>,
    engine: &RuleEngine<'_, A>,
    all_sections: &[Section],
) -> NavigationOutcome {
    let Some(branching) = branching else {
        let next = natural_next(section, all_sections);
        return NavigationOutcome {
            reason: format!("No branching configured; continuing in order to {}", next),
            next,
            resolution: Resolution::NaturalOrder { matched_rule: None },
        };
    };

    let mut matched_rule = None;
    let mut explanation = None;
    for rule in &branching.rules {
        let trace = engine.trace_rule(rule);
        if !trace.outcome() {
            continue;
        }
        let why = TraceFormatter::format_trace(&trace);
        if let Some(next) = &rule.next_section_id {
            log::debug!(
                "section '{}' -> {} via rule '{}' (priority {})",
                section.id,
                next,
                rule.id,
                rule.priority
            );
            return NavigationOutcome {
                next: next.clone(),
                resolution: Resolution::Rule {
                    rule_id: rule.id.clone(),
                    priority: rule.priority,
                },
                reason: format!(
                    "Rule '{}' (priority {}) matched: {}",
                    rule.id, rule.priority, why
                ),
            };
        }
        matched_rule = Some(rule.id.clone());
        explanation = Some(format!("Rule '{}' matched without a target ({})", rule.id, why));
        break;
    }

    let prefix = explanation.unwrap_or_else(|| "No rule matched".to_string());
    if let Some(default) = &branching.default_next_section_id {
        log::debug!("section '{}' -> {} via default", section.id, default);
        return NavigationOutcome {
            next: default.clone(),
            resolution: Resolution::Default { matched_rule },
            reason: format!("{}; using default target {}", prefix, default),
        };
    }

    let next = natural_next(section, all_sections);
    log::debug!("section '{}' -> {} via natural order", section.id, next);
    NavigationOutcome {
        reason: format!("{}; continuing in order to {}", prefix, next),
        next,
        resolution: Resolution::NaturalOrder { matched_rule },
    }
}

/// Builder for [`Navigator`].
pub struct NavigatorBuilder {
    survey: SurveyDefinition,
    policy: DanglingReferencePolicy,
    max_walk_steps: usize,
}

impl NavigatorBuilder {
    pub fn new(survey: SurveyDefinition) -> Self {
        Self {
            survey,
            policy: DanglingReferencePolicy::default(),
            max_walk_steps: DEFAULT_MAX_WALK_STEPS,
        }
    }

    /// What a condition on a question missing from the survey evaluates to.
    /// Only takes effect when the survey lists its questions.
    pub fn dangling_reference_policy(mut self, policy: DanglingReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upper bound on the number of sections [`Navigator::walk`] visits.
    pub fn max_walk_steps(mut self, steps: usize) -> Self {
        self.max_walk_steps = steps;
        self
    }

    pub fn build(self) -> Result<Navigator, SchemaError> {
        self.survey.validate()?;
        let branching = self
            .survey
            .sections
            .iter()
            .filter_map(|s| {
                normalize(s.branching_logic.as_ref()).map(|b| (s.id.clone(), b))
            })
            .collect();
        let known_questions = (!self.survey.questions.is_empty()).then(|| self.survey.question_ids());
        Ok(Navigator {
            survey: self.survey,
            branching,
            known_questions,
            policy: self.policy,
            max_walk_steps: self.max_walk_steps,
        })
    }
}

/// A survey prepared for repeated navigation.
///
/// Branching is normalized once at build time. A `Navigator` holds no mutable
/// state, so one instance can serve any number of respondents concurrently.
pub struct Navigator {
    survey: SurveyDefinition,
    branching: AHashMap<SectionId, NormalizedBranching>,
    known_questions: Option<AHashSet<QuestionId>>,
    policy: DanglingReferencePolicy,
    max_walk_steps: usize,
}

impl Navigator {
    pub fn builder(survey: SurveyDefinition) -> NavigatorBuilder {
        NavigatorBuilder::new(survey)
    }

    pub fn new(survey: SurveyDefinition) -> Result<Self, SchemaError> {
        NavigatorBuilder::new(survey).build()
    }

    pub fn survey(&self) -> &SurveyDefinition {
        &self.survey
    }

    pub fn branching(&self, section_id: &str) -> Option<&NormalizedBranching> {
        self.branching.get(section_id)
    }

    fn engine<'a, A: AnswerSource + ?Sized>(&'a self, answers: &'a A) -> RuleEngine<'a, A> {
        let engine = RuleEngine::new(answers);
        match &self.known_questions {
            Some(known) => engine.with_known_questions(known, self.policy),
            None => engine,
        }
    }

    /// Resolves the transition out of `section_id`, with an explanation.
    pub fn resolve<A: AnswerSource + ?Sized>(
        &self,
        section_id: &str,
        answers: &A,
    ) -> Result<NavigationOutcome, NavigationError> {
        let section = self
            .survey
            .section(section_id)
            .ok_or_else(|| NavigationError::SectionNotFound(section_id.to_string()))?;
        Ok(route(
            section,
            self.branching.get(section_id),
            &self.engine(answers),
            &self.survey.sections,
        ))
    }

    pub fn resolve_next<A: AnswerSource + ?Sized>(
        &self,
        section_id: &str,
        answers: &A,
    ) -> Result<SectionTarget, NavigationError> {
        self.resolve(section_id, answers).map(|outcome| outcome.next)
    }

    /// Previews the full path a respondent with `answers` would take, from the
    /// first section until the survey ends.
    ///
    /// Fails if a section would be shown twice or if a target names a section
    /// the survey does not have.
    pub fn walk<A: AnswerSource + ?Sized>(
        &self,
        answers: &A,
    ) -> Result<Vec<SectionId>, NavigationError> {
        let Some(first) = self.survey.first_section() else {
            return Ok(Vec::new());
        };
        let mut path = vec![first.id.clone()];
        let mut visited: AHashSet<SectionId> = [first.id.clone()].into_iter().collect();
        loop {
            if path.len() > self.max_walk_steps {
                return Err(NavigationError::StepLimitExceeded(self.max_walk_steps));
            }
            let current = &path[path.len() - 1];
            let next = match self.resolve_next(current, answers)? {
                SectionTarget::EndSurvey => return Ok(path),
                SectionTarget::Section(id) => id,
            };
            if !visited.insert(next.clone()) {
                path.push(next.clone());
                return Err(NavigationError::Cycle {
                    path,
                    repeated: next,
                });
            }
            path.push(next);
        }
    }
}
