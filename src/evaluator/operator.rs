use crate::answer::AnswerValue;
use crate::schema::{Operand, Operator, QuestionType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Applies one operator to one normalized answer.
///
/// Never fails: an operand of the wrong shape, an unparseable number or an
/// inverted range all make the comparison false. Operators the editor would
/// not offer for `question_type` still run with their generic meaning.
pub fn evaluate(
    operator: Operator,
    answer: &AnswerValue,
    operand: Option<&Operand>,
    question_type: &QuestionType,
) -> bool {
    match operator {
        Operator::IsBlank => answer.is_blank(),
        Operator::IsNotBlank => !answer.is_blank(),
        Operator::Equals => with_scalar(operand, |op| equals(answer, op)),
        Operator::NotEquals => with_scalar(operand, |op| !equals(answer, op)),
        Operator::Contains => with_scalar(operand, |op| contains(answer, op, question_type)),
        Operator::NotContains => {
            with_scalar(operand, |op| !contains(answer, op, question_type))
        }
        Operator::LessThan => compare(answer, operand, question_type, |a, b| a < b),
        Operator::GreaterThan => compare(answer, operand, question_type, |a, b| a > b),
        Operator::Between => between(answer, operand, question_type),
    }
}

fn with_scalar(operand: Option<&Operand>, f: impl FnOnce(&str) -> bool) -> bool {
    operand.and_then(Operand::as_scalar).is_some_and(f)
}

/// Single values match after trimming, case-sensitively. A selection matches
/// only when it is exactly `{operand}`.
fn equals(answer: &AnswerValue, operand: &str) -> bool {
    let operand = operand.trim();
    match answer {
        AnswerValue::Absent => false,
        AnswerValue::Scalar(value) => value.trim() == operand,
        AnswerValue::Set(items) => {
            !items.is_empty() && items.iter().all(|item| item.trim() == operand)
        }
    }
}

/// Selections test membership. Free text tests case-insensitive substring.
/// A single choice (radio, select) behaves as a one-element selection.
fn contains(answer: &AnswerValue, operand: &str, question_type: &QuestionType) -> bool {
    let operand = operand.trim();
    match answer {
        AnswerValue::Absent => false,
        AnswerValue::Set(items) => items.iter().any(|item| item.trim() == operand),
        AnswerValue::Scalar(value) => match question_type {
            QuestionType::Radio | QuestionType::Select | QuestionType::Checkbox => {
                value.trim() == operand
            }
            _ => value.to_lowercase().contains(&operand.to_lowercase()),
        },
    }
}

fn compare(
    answer: &AnswerValue,
    operand: Option<&Operand>,
    question_type: &QuestionType,
    cmp: impl FnOnce(f64, f64) -> bool,
) -> bool {
    let Some(value) = answer_ordinal(answer, question_type) else {
        return false;
    };
    operand
        .and_then(Operand::as_scalar)
        .and_then(|op| parse_ordinal(op, question_type))
        .is_some_and(|bound| cmp(value, bound))
}

/// Inclusive on both ends. An inverted range never matches.
fn between(answer: &AnswerValue, operand: Option<&Operand>, question_type: &QuestionType) -> bool {
    let Some((min, max)) = operand.and_then(Operand::as_range) else {
        return false;
    };
    let (Some(value), Some(lo), Some(hi)) = (
        answer_ordinal(answer, question_type),
        parse_ordinal(min, question_type),
        parse_ordinal(max, question_type),
    ) else {
        return false;
    };
    lo <= hi && lo <= value && value <= hi
}

fn answer_ordinal(answer: &AnswerValue, question_type: &QuestionType) -> Option<f64> {
    match answer {
        AnswerValue::Scalar(value) => parse_ordinal(value, question_type),
        AnswerValue::Absent | AnswerValue::Set(_) => None,
    }
}

/// Maps a value onto a comparable number: dates and date-times become Unix
/// seconds, times become seconds since midnight, everything else is parsed
/// as a plain number. Date and time questions also accept plain numbers.
pub fn parse_ordinal(text: &str, question_type: &QuestionType) -> Option<f64> {
    let text = text.trim();
    let temporal = match question_type {
        QuestionType::Date => parse_date(text),
        QuestionType::Time => parse_time(text),
        _ => None,
    };
    temporal.or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()))
}

fn parse_date(text: &str) -> Option<f64> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp() as f64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp() as f64);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.and_utc().timestamp() as f64)
}

fn parse_time(text: &str) -> Option<f64> {
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .map(|t| t.num_seconds_from_midnight() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> AnswerValue {
        AnswerValue::Scalar(s.to_string())
    }

    fn set(items: &[&str]) -> AnswerValue {
        AnswerValue::Set(items.iter().map(|s| s.to_string()).collect())
    }

    fn op(s: &str) -> Option<Operand> {
        Some(Operand::scalar(s))
    }

    #[test]
    fn blank_and_not_blank_are_complements() {
        let samples = [
            AnswerValue::Absent,
            scalar(""),
            scalar("  "),
            scalar("x"),
            set(&[]),
            set(&["a"]),
        ];
        for ty in [QuestionType::Text, QuestionType::Checkbox, QuestionType::Scale] {
            for answer in &samples {
                assert_eq!(
                    evaluate(Operator::IsBlank, answer, None, &ty),
                    !evaluate(Operator::IsNotBlank, answer, None, &ty),
                    "{:?} / {:?}",
                    answer,
                    ty
                );
            }
        }
    }

    #[test]
    fn equals_trims_but_respects_case() {
        let ty = QuestionType::Text;
        assert!(evaluate(Operator::Equals, &scalar("  Yes "), op("Yes").as_ref(), &ty));
        assert!(!evaluate(Operator::Equals, &scalar("yes"), op("Yes").as_ref(), &ty));
        assert!(evaluate(Operator::NotEquals, &scalar("yes"), op("Yes").as_ref(), &ty));
        assert!(!evaluate(Operator::Equals, &AnswerValue::Absent, op("Yes").as_ref(), &ty));
    }

    #[test]
    fn checkbox_equals_requires_the_exact_singleton() {
        let ty = QuestionType::Checkbox;
        assert!(evaluate(Operator::Equals, &set(&["red"]), op("red").as_ref(), &ty));
        assert!(!evaluate(Operator::Equals, &set(&["red", "blue"]), op("red").as_ref(), &ty));
        assert!(!evaluate(Operator::Equals, &set(&[]), op("red").as_ref(), &ty));
    }

    #[test]
    fn checkbox_membership() {
        let ty = QuestionType::Checkbox;
        let answer = set(&["red", "blue"]);
        assert!(evaluate(Operator::Contains, &answer, op("blue").as_ref(), &ty));
        assert!(!evaluate(Operator::Contains, &answer, op("green").as_ref(), &ty));
        assert!(evaluate(Operator::NotContains, &answer, op("green").as_ref(), &ty));
        assert!(!evaluate(Operator::NotContains, &answer, op("red").as_ref(), &ty));
    }

    #[test]
    fn text_contains_is_case_insensitive_substring() {
        let ty = QuestionType::Paragraph;
        let answer = scalar("I really Like Rust");
        assert!(evaluate(Operator::Contains, &answer, op("like rust").as_ref(), &ty));
        assert!(!evaluate(Operator::Contains, &answer, op("python").as_ref(), &ty));
        assert!(evaluate(Operator::NotContains, &answer, op("python").as_ref(), &ty));
    }

    #[test]
    fn radio_contains_is_membership_not_substring() {
        let ty = QuestionType::Radio;
        assert!(evaluate(Operator::Contains, &scalar("Option A"), op("Option A").as_ref(), &ty));
        assert!(!evaluate(Operator::Contains, &scalar("Option A"), op("Option").as_ref(), &ty));
    }

    #[test]
    fn numeric_comparisons() {
        let ty = QuestionType::Scale;
        assert!(evaluate(Operator::GreaterThan, &scalar("7"), op("5").as_ref(), &ty));
        assert!(!evaluate(Operator::GreaterThan, &scalar("5"), op("5").as_ref(), &ty));
        assert!(evaluate(Operator::LessThan, &scalar("3.5"), op("5").as_ref(), &ty));
        assert!(!evaluate(Operator::LessThan, &scalar("abc"), op("5").as_ref(), &ty));
        assert!(!evaluate(Operator::LessThan, &scalar("3"), op("five").as_ref(), &ty));
        assert!(!evaluate(Operator::LessThan, &AnswerValue::Absent, op("5").as_ref(), &ty));
        assert!(!evaluate(Operator::GreaterThan, &scalar("NaN"), op("5").as_ref(), &ty));
    }

    #[test]
    fn between_is_inclusive() {
        let ty = QuestionType::Scale;
        let range = Some(Operand::range("2", "8"));
        for (value, expected) in [("2", true), ("8", true), ("5", true), ("1.999", false), ("8.001", false)] {
            assert_eq!(
                evaluate(Operator::Between, &scalar(value), range.as_ref(), &ty),
                expected,
                "value {}",
                value
            );
        }
    }

    #[test]
    fn inverted_or_malformed_ranges_never_match() {
        let ty = QuestionType::Scale;
        let inverted = Some(Operand::range("8", "2"));
        assert!(!evaluate(Operator::Between, &scalar("5"), inverted.as_ref(), &ty));
        let scalar_operand = op("5");
        assert!(!evaluate(Operator::Between, &scalar("5"), scalar_operand.as_ref(), &ty));
        let triple = Some(Operand::List(vec!["1".into(), "2".into(), "3".into()]));
        assert!(!evaluate(Operator::Between, &scalar("2"), triple.as_ref(), &ty));
    }

    #[test]
    fn range_operand_on_equals_is_false() {
        let range = Some(Operand::range("1", "2"));
        let ty = QuestionType::Text;
        assert!(!evaluate(Operator::Equals, &scalar("1"), range.as_ref(), &ty));
        assert!(!evaluate(Operator::NotEquals, &scalar("1"), range.as_ref(), &ty));
        assert!(!evaluate(Operator::Equals, &scalar("1"), None, &ty));
    }

    #[test]
    fn dates_compare_chronologically() {
        let ty = QuestionType::Date;
        assert!(evaluate(Operator::LessThan, &scalar("2024-01-31"), op("2024-02-01").as_ref(), &ty));
        assert!(evaluate(
            Operator::GreaterThan,
            &scalar("2024-03-01T10:00:00Z"),
            op("2024-03-01").as_ref(),
            &ty
        ));
        let range = Some(Operand::range("2024-01-01", "2024-12-31"));
        assert!(evaluate(Operator::Between, &scalar("2024-12-31"), range.as_ref(), &ty));
        assert!(!evaluate(Operator::Between, &scalar("2025-01-01"), range.as_ref(), &ty));
        assert!(!evaluate(Operator::LessThan, &scalar("yesterday"), op("2024-02-01").as_ref(), &ty));
    }

    #[test]
    fn times_compare_within_the_day() {
        let ty = QuestionType::Time;
        assert!(evaluate(Operator::LessThan, &scalar("09:30"), op("10:00").as_ref(), &ty));
        assert!(evaluate(Operator::GreaterThan, &scalar("23:59:59"), op("23:59").as_ref(), &ty));
        let range = Some(Operand::range("09:00", "17:00"));
        assert!(evaluate(Operator::Between, &scalar("17:00"), range.as_ref(), &ty));
        assert!(!evaluate(Operator::Between, &scalar("17:00:01"), range.as_ref(), &ty));
    }
}
