mod formatter;

pub use formatter::TraceFormatter;

use crate::answer::AnswerValue;
use crate::schema::{LogicalOperator, Operand, Operator, QuestionId};

/// A record of how a rule was evaluated, including every answer it looked at.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationTrace {
    /// A condition group or a rule: children joined by one logical operator.
    Junction {
        operator: LogicalOperator,
        children: Vec<EvaluationTrace>,
        outcome: bool,
    },
    Comparison {
        question_id: QuestionId,
        operator: Operator,
        answer: AnswerValue,
        operand: Option<Operand>,
        outcome: bool,
    },
    /// Skipped because an earlier sibling already decided the junction.
    NotEvaluated,
}

impl EvaluationTrace {
    pub fn outcome(&self) -> bool {
        match self {
            EvaluationTrace::Junction { outcome, .. }
            | EvaluationTrace::Comparison { outcome, .. } => *outcome,
            EvaluationTrace::NotEvaluated => false,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            EvaluationTrace::Junction { operator, .. } => match operator {
                LogicalOperator::Or => 1,
                LogicalOperator::And => 2,
            },
            EvaluationTrace::Comparison { .. } | EvaluationTrace::NotEvaluated => 9,
        }
    }
}
