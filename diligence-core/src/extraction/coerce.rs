//! Lenient numeric coercion of document values.

use serde_json::Value;

/// Nested `{"value": ...}` wrappers followed before giving up.
const MAX_VALUE_NESTING: usize = 8;

/// Coerce a document value to a finite number.
///
/// Accepts JSON numbers, numeric strings (currency symbols, `%`, thousands
/// separators and whitespace are stripped) and objects carrying a `value`
/// field, coerced recursively. Anything else, or a non-finite result, is
/// `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    coerce_nested(value, 0)
}

fn coerce_nested(value: &Value, nesting: usize) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        Value::Object(map) if nesting < MAX_VALUE_NESTING => map
            .get("value")
            .and_then(|inner| coerce_nested(inner, nesting + 1)),
        _ => None,
    }
}

fn parse_numeric_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '€' | '£' | '¥' | '%' | ','))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    // Accounting-style negatives: (1200) means -1200.
    let (negate, body) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned.as_str()),
    };
    let parsed = body.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negate { -parsed } else { parsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers() {
        assert_eq!(coerce_number(&json!(42)), Some(42.0));
        assert_eq!(coerce_number(&json!(-3.5)), Some(-3.5));
    }

    #[test]
    fn test_strings() {
        assert_eq!(coerce_number(&json!("$1,200")), Some(1200.0));
        assert_eq!(coerce_number(&json!(" 42.5 % ")), Some(42.5));
        assert_eq!(coerce_number(&json!("€ 3 000")), Some(3000.0));
        assert_eq!(coerce_number(&json!("(250)")), Some(-250.0));
        assert_eq!(coerce_number(&json!("1e3")), Some(1000.0));
    }

    #[test]
    fn test_malformed_strings_are_absent() {
        assert_eq!(coerce_number(&json!("about forty")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!("12-15")), None);
    }

    #[test]
    fn test_value_objects() {
        assert_eq!(coerce_number(&json!({"value": 1200, "unit": "$M"})), Some(1200.0));
        assert_eq!(coerce_number(&json!({"value": {"value": "7"}})), Some(7.0));
        assert_eq!(coerce_number(&json!({"amount": 7})), None);
    }

    #[test]
    fn test_other_variants() {
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!([1, 2])), None);
    }
}
