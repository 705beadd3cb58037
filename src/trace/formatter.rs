use super::EvaluationTrace;
use crate::schema::{LogicalOperator, Operator};

/// Formats evaluation traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format an evaluation trace into a human-readable explanation.
    pub fn format_trace(trace: &EvaluationTrace) -> String {
        Self::format_recursive(trace, 0)
    }

    /// Recursively formats the trace, adding parentheses only when necessary.
    fn format_recursive(trace: &EvaluationTrace, parent_precedence: u8) -> String {
        match trace {
            EvaluationTrace::Junction {
                operator,
                children,
                outcome,
            } => {
                let shown = Self::decisive_children(*operator, children, *outcome);
                // A single decisive child stands on its own.
                if let [only] = shown.as_slice() {
                    return Self::format_recursive(only, parent_precedence);
                }
                let current_precedence = trace.precedence();
                let separator = format!(" {} ", operator);
                let joined = shown
                    .iter()
                    .map(|child| Self::format_recursive(child, current_precedence))
                    .collect::<Vec<_>>()
                    .join(separator.as_str());
                if current_precedence < parent_precedence {
                    format!("({})", joined)
                } else {
                    joined
                }
            }
            EvaluationTrace::Comparison {
                question_id,
                operator,
                answer,
                operand,
                ..
            } => {
                let subject = format!("${} (was {})", question_id, answer);
                match (operator, operand) {
                    (Operator::IsBlank | Operator::IsNotBlank, _) | (_, None) => {
                        format!("{} {}", subject, operator.symbol())
                    }
                    (_, Some(operand)) => format!("{} {} {}", subject, operator.symbol(), operand),
                }
            }
            EvaluationTrace::NotEvaluated => String::new(),
        }
    }

    /// Keeps the children that decided the junction. A short-circuited AND is
    /// explained by its false member, a short-circuited OR by its true member.
    fn decisive_children(
        operator: LogicalOperator,
        children: &[EvaluationTrace],
        outcome: bool,
    ) -> Vec<&EvaluationTrace> {
        let evaluated = children
            .iter()
            .filter(|c| !matches!(c, EvaluationTrace::NotEvaluated));
        match (operator, outcome) {
            (LogicalOperator::And, false) => evaluated.filter(|c| !c.outcome()).collect(),
            (LogicalOperator::Or, true) => evaluated.filter(|c| c.outcome()).collect(),
            _ => evaluated.collect(),
        }
    }
}
