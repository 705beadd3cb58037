use crate::answer::{AnswerSource, AnswerValue};
use crate::schema::{Condition, ConditionGroup, LogicalOperator, QuestionId, Rule};
use crate::trace::EvaluationTrace;
use ahash::AHashSet;

mod operator;

pub use operator::{evaluate, parse_ordinal};

/// How a condition behaves when it names a question the survey no longer has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingReferencePolicy {
    /// The answer reads as absent, so `is_blank` matches and most other
    /// operators do not.
    #[default]
    TreatAsBlank,
    /// The condition is false regardless of operator.
    FailCondition,
}

/// Evaluates conditions, groups and rules against one respondent's answers.
///
/// Holds only borrowed, read-only state; create one per evaluation.
pub struct RuleEngine<'a, A: AnswerSource + ?Sized> {
    answers: &'a A,
    known_questions: Option<&'a AHashSet<QuestionId>>,
    policy: DanglingReferencePolicy,
}

impl<'a, A: AnswerSource + ?Sized> RuleEngine<'a, A> {
    pub fn new(answers: &'a A) -> Self {
        Self {
            answers,
            known_questions: None,
            policy: DanglingReferencePolicy::default(),
        }
    }

    /// Enables dangling-reference detection against the survey's question ids.
    pub fn with_known_questions(
        mut self,
        known_questions: &'a AHashSet<QuestionId>,
        policy: DanglingReferencePolicy,
    ) -> Self {
        self.known_questions = Some(known_questions);
        self.policy = policy;
        self
    }

    fn is_dangling(&self, question_id: &str) -> bool {
        self.known_questions
            .is_some_and(|known| !known.contains(question_id))
    }

    pub fn trace_condition(&self, condition: &Condition) -> EvaluationTrace {
        let dangling = self.is_dangling(&condition.question_id);
        let answer = if dangling {
            AnswerValue::Absent
        } else {
            self.answers.answer(&condition.question_id)
        };
        let outcome = match (dangling, self.policy) {
            (true, DanglingReferencePolicy::FailCondition) => false,
            _ => evaluate(
                condition.operator,
                &answer,
                condition.operand.as_ref(),
                &condition.question_type,
            ),
        };
        log::trace!(
            "condition ${} {} {:?} on {} -> {}",
            condition.question_id,
            condition.operator,
            condition.operand,
            answer,
            outcome
        );
        EvaluationTrace::Comparison {
            question_id: condition.question_id.clone(),
            operator: condition.operator,
            answer,
            operand: condition.operand.clone(),
            outcome,
        }
    }

    /// An empty group never matches.
    pub fn trace_group(&self, group: &ConditionGroup) -> EvaluationTrace {
        self.junction(group.condition_operator, &group.conditions, |c| {
            self.trace_condition(c)
        })
    }

    /// A rule with no groups, or with an empty group, never matches.
    pub fn trace_rule(&self, rule: &Rule) -> EvaluationTrace {
        if !rule.is_structurally_valid() {
            log::warn!(
                "rule '{}' has no condition groups or an empty group; treating as non-matching",
                rule.id
            );
            return EvaluationTrace::Junction {
                operator: rule.group_operator,
                children: Vec::new(),
                outcome: false,
            };
        }
        self.junction(rule.group_operator, &rule.condition_groups, |g| {
            self.trace_group(g)
        })
    }

    pub fn resolve_condition(&self, condition: &Condition) -> bool {
        self.trace_condition(condition).outcome()
    }

    pub fn resolve_group(&self, group: &ConditionGroup) -> bool {
        self.trace_group(group).outcome()
    }

    pub fn resolve_rule(&self, rule: &Rule) -> bool {
        self.trace_rule(rule).outcome()
    }

    /// Folds children with AND/OR, short-circuiting like `&&` and `||`.
    /// Children after the deciding one are recorded as not evaluated.
    fn junction<T>(
        &self,
        operator: LogicalOperator,
        items: &[T],
        eval: impl Fn(&T) -> EvaluationTrace,
    ) -> EvaluationTrace {
        if items.is_empty() {
            return EvaluationTrace::Junction {
                operator,
                children: Vec::new(),
                outcome: false,
            };
        }
        let deciding = match operator {
            LogicalOperator::And => false,
            LogicalOperator::Or => true,
        };
        let mut children = Vec::with_capacity(items.len());
        let mut decided = false;
        for item in items {
            if decided {
                children.push(EvaluationTrace::NotEvaluated);
                continue;
            }
            let child = eval(item);
            decided = child.outcome() == deciding;
            children.push(child);
        }
        let outcome = if decided { deciding } else { !deciding };
        EvaluationTrace::Junction {
            operator,
            children,
            outcome,
        }
    }
}

/// Resolves a single condition against the answer map. Missing answers are absent.
pub fn resolve_condition<A: AnswerSource + ?Sized>(condition: &Condition, answers: &A) -> bool {
    RuleEngine::new(answers).resolve_condition(condition)
}

/// An empty group never matches.
pub fn resolve_group<A: AnswerSource + ?Sized>(group: &ConditionGroup, answers: &A) -> bool {
    RuleEngine::new(answers).resolve_group(group)
}

/// A rule with no groups, or with an empty group, never matches.
pub fn resolve_rule<A: AnswerSource + ?Sized>(rule: &Rule, answers: &A) -> bool {
    RuleEngine::new(answers).resolve_rule(rule)
}
