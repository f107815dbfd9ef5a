//! Typed cell values.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::schema::ScalarType;

/// Tokens read as a missing value, in any column.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single parsed cell.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Number(f64),
    Null,
}

impl CellValue {
    /// Check if a raw token represents a missing value.
    pub fn is_null_token(raw: &str) -> bool {
        NULL_TOKENS.contains(&raw)
    }

    /// Parse a raw token as the given scalar type.
    ///
    /// Null tokens become [`CellValue::Null`] regardless of type; whether the
    /// column admits nulls is for the schema validator to decide.
    pub fn parse(raw: &str, scalar: ScalarType) -> std::result::Result<Self, String> {
        if Self::is_null_token(raw) {
            return Ok(CellValue::Null);
        }

        match scalar {
            ScalarType::String => Ok(CellValue::String(raw.to_string())),
            ScalarType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(CellValue::Integer)
                .map_err(|_| format!("cannot convert '{}' to integer", raw)),
            ScalarType::Number => raw
                .trim()
                .parse::<f64>()
                .map(CellValue::Number)
                .map_err(|_| format!("cannot convert '{}' to number", raw)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// String content, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// JSON representation used for schema validation.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::String(s) => Value::String(s.clone()),
            CellValue::Integer(i) => Value::from(*i),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Null => Value::Null,
        }
    }

    /// Text written back to TSV, `NA` for nulls.
    pub fn to_tsv_field(&self) -> String {
        match self {
            CellValue::Null => "NA".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => f.write_str(s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Null => f.write_str("NA"),
        }
    }
}

// Numbers compare by bit pattern so rows can be grouped; NaN never reaches a
// cell since "NaN" is a null token.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Null, CellValue::Null) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Number(n) => n.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_null_tokens() {
        assert!(CellValue::is_null_token(""));
        assert!(CellValue::is_null_token("NA"));
        assert!(CellValue::is_null_token("NaN"));
        assert!(CellValue::is_null_token("<NA>"));
        assert!(!CellValue::is_null_token("value"));
        assert!(!CellValue::is_null_token("0"));
        assert!(!CellValue::is_null_token("."));
    }

    #[test]
    fn test_parse_typed() {
        assert_eq!(
            CellValue::parse("10", ScalarType::Integer).unwrap(),
            CellValue::Integer(10)
        );
        assert_eq!(
            CellValue::parse("2.5", ScalarType::Number).unwrap(),
            CellValue::Number(2.5)
        );
        assert_eq!(
            CellValue::parse("", ScalarType::Integer).unwrap(),
            CellValue::Null
        );
        assert!(CellValue::parse("ten", ScalarType::Integer).is_err());
        assert!(CellValue::parse("1.5", ScalarType::Integer).is_err());
    }

    #[test]
    fn test_nulls_group_together() {
        let mut seen = HashSet::new();
        seen.insert(vec![CellValue::String("bone1".into()), CellValue::Null]);
        assert!(seen.contains(&vec![CellValue::String("bone1".into()), CellValue::Null]));
        assert_ne!(CellValue::Integer(1), CellValue::Number(1.0));
    }

    #[test]
    fn test_json_and_tsv() {
        assert_eq!(CellValue::Integer(3).to_json(), serde_json::json!(3));
        assert_eq!(CellValue::Null.to_json(), Value::Null);
        assert_eq!(CellValue::Null.to_tsv_field(), "NA");
        assert_eq!(CellValue::Number(10.0).to_tsv_field(), "10");
    }
}
