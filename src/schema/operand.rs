use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// The right-hand side of a condition.
///
/// Stored schemas write operands as strings, numbers, or arrays. Numbers are
/// kept in their textual form so that `equals` stays an exact string match.
/// A `List` is only meaningful as a `[min, max]` pair for `between`; any other
/// length is kept as-is so the consistency checker can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Scalar(String),
    List(Vec<String>),
}

impl Operand {
    pub fn scalar(value: impl Into<String>) -> Self {
        Operand::Scalar(value.into())
    }

    pub fn range(min: impl Into<String>, max: impl Into<String>) -> Self {
        Operand::List(vec![min.into(), max.into()])
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Operand::Scalar(s) => Some(s),
            Operand::List(_) => None,
        }
    }

    /// Returns the `(min, max)` bounds when the operand is a two-element list.
    pub fn as_range(&self) -> Option<(&str, &str)> {
        match self {
            Operand::List(items) if items.len() == 2 => Some((&items[0], &items[1])),
            _ => None,
        }
    }
}

/// Renders a JSON scalar the way it is compared: integral floats lose their
/// fractional part, strings are taken verbatim.
pub(crate) fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                        format!("{}", f as i64)
                    } else {
                        format!("{}", f)
                    }
                })
            }
        }
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(s) => write!(f, "{}", s),
            Operand::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Scalar(s) => serializer.serialize_str(s),
            Operand::List(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        match &raw {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| {
                        serde::de::Error::custom(format!("operand element '{}' is not a scalar", item))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Operand::List),
            other => scalar_to_string(other)
                .map(Operand::Scalar)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid operand '{}'", other))),
        }
    }
}
