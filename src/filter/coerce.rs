use std::collections::HashMap;

use serde_json::{Number, Value};

use super::types::FilterParams;

/// Reinterpret raw query-string values so schema validation and the filter
/// compilers see typed data: `"true"`/`"false"` become booleans, anything
/// that parses as a finite number (surrounding whitespace ignored) becomes a
/// number, the rest stay strings.
///
/// Every key is converted; allow-list checks happen later.
pub fn coerce_query_params(raw: HashMap<String, String>) -> FilterParams {
    raw.into_iter()
        .map(|(key, value)| {
            let coerced = coerce_value(value);
            (key, coerced)
        })
        .collect()
}

pub fn coerce_value(value: String) -> Value {
    match value.as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        // Left as-is rather than becoming 0
        "" => return Value::String(value),
        _ => {}
    }

    match parse_number(value.trim()) {
        Some(number) => Value::Number(number),
        None => Value::String(value),
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }

    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    // i64::MAX as f64 rounds up to 2^63, which no longer fits
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn converts_booleans_numbers_and_leaves_text() {
        let coerced = coerce_query_params(raw(&[("a", "true"), ("b", "false"), ("c", "10000"), ("d", "text")]));

        assert_eq!(Value::Object(coerced), json!({"a": true, "b": false, "c": 10000, "d": "text"}));
    }

    #[test]
    fn parses_fractions_and_exponents() {
        assert_eq!(coerce_value("0.5".into()), json!(0.5));
        assert_eq!(coerce_value("-12".into()), json!(-12));
        assert_eq!(coerce_value("1e3".into()), json!(1000));
    }

    #[test]
    fn non_finite_and_partial_numbers_stay_strings() {
        assert_eq!(coerce_value("NaN".into()), json!("NaN"));
        assert_eq!(coerce_value("inf".into()), json!("inf"));
        assert_eq!(coerce_value("12abc".into()), json!("12abc"));
        assert_eq!(coerce_value("True".into()), json!("True"));
    }

    #[test]
    fn empty_string_is_not_zero() {
        assert_eq!(coerce_value(String::new()), json!(""));
        assert_eq!(coerce_value("  ".into()), json!("  "));
    }

    #[test]
    fn padded_numbers_are_trimmed() {
        assert_eq!(coerce_value(" 5".into()), json!(5));
        assert_eq!(coerce_value("0.5\t".into()), json!(0.5));
        assert_eq!(coerce_value(" true".into()), json!(" true"));
    }

    #[test]
    fn integers_beyond_i64_stay_exact_floats() {
        let value = coerce_value("9223372036854775808".into());
        assert!(!value.is_i64());
        assert_eq!(value.as_f64(), Some(9_223_372_036_854_775_808.0));

        assert_eq!(coerce_value("9223372036854775807".into()), json!(i64::MAX));
        assert_eq!(coerce_value("-9223372036854775808".into()), json!(i64::MIN));
    }

    #[test]
    fn keeps_unknown_keys() {
        let coerced = coerce_query_params(raw(&[("anything", "1")]));
        assert_eq!(coerced.get("anything"), Some(&json!(1)));
    }
}
