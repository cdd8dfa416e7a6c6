//! Defensive field access over provider JSON.
//!
//! Provider responses are not contractually stable: a field may be missing,
//! `null`, or carry a different JSON type depending on endpoint and API
//! version. Every accessor here degrades to the caller's default instead of
//! failing, so mapping code never has to check for nulls itself. A node that
//! is not an object behaves as if every property were missing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Parse a response body, treating anything that is not JSON as `null`.
pub fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!(error = %e, "Response body is not JSON, mapping from defaults");
        Value::Null
    })
}

/// Extract-or-default accessors for a loosely structured JSON node.
pub trait JsonFields {
    /// Non-null property `key`, if present.
    fn field(&self, key: &str) -> Option<&Value>;

    /// Property rendered as a string. Numbers and booleans are rendered as
    /// text, other non-string values as their JSON form.
    fn optional_string(&self, key: &str) -> Option<String> {
        self.field(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Property rendered as a string, or `default`.
    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional_string(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer property, accepting a JSON number or a numeric string.
    fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.field(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Boolean property, accepting a JSON boolean or `"true"`/`"false"`.
    fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.field(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => parse_bool(s).unwrap_or(default),
            _ => default,
        }
    }

    /// Timestamp property. Only string-encoded timestamps are recognised.
    fn datetime_or(&self, key: &str, default: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        match self.field(key) {
            Some(Value::String(s)) => parse_datetime(s).or(default),
            _ => default,
        }
    }

    /// String at the end of `path`, or `None` as soon as any hop is missing
    /// or null.
    fn nested_string(&self, path: &[&str]) -> Option<String>;

    /// String at the end of `path`, or `default`.
    fn nested_string_or(&self, path: &[&str], default: &str) -> String {
        self.nested_string(path)
            .unwrap_or_else(|| default.to_string())
    }
}

impl JsonFields for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    fn nested_string(&self, path: &[&str]) -> Option<String> {
        let (last, hops) = path.split_last()?;
        let mut current = self;
        for hop in hops {
            current = current.field(hop)?;
        }
        current.optional_string(last)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Naive timestamp layouts accepted after RFC 3339, all taken as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, a naive date-time, or a bare date
/// (midnight UTC).
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_missing_and_null_yield_defaults() {
        let node = json!({ "present": null });

        for key in ["absent", "present"] {
            assert_eq!(node.string_or(key, "dflt"), "dflt");
            assert_eq!(node.int_or(key, 42), 42);
            assert!(node.bool_or(key, true));
            assert!(!node.bool_or(key, false));
            assert_eq!(node.datetime_or(key, None), None);
            assert!(node.optional_string(key).is_none());
        }

        let fallback = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(node.datetime_or("absent", Some(fallback)), Some(fallback));
    }

    #[test]
    fn test_string_renders_scalars() {
        let node = json!({ "s": "text", "n": 17, "b": true, "o": {"a": 1} });
        assert_eq!(node.string_or("s", ""), "text");
        assert_eq!(node.string_or("n", ""), "17");
        assert_eq!(node.string_or("b", ""), "true");
        assert_eq!(node.string_or("o", ""), r#"{"a":1}"#);
    }

    #[test]
    fn test_int_accepts_numbers_and_numeric_strings() {
        let node = json!({ "n": 12, "s": "34", "bad": "x", "f": 1.5, "b": true });
        assert_eq!(node.int_or("n", 0), 12);
        assert_eq!(node.int_or("s", 0), 34);
        assert_eq!(node.int_or("bad", -1), -1);
        assert_eq!(node.int_or("f", -1), -1);
        assert_eq!(node.int_or("b", -1), -1);
    }

    #[test]
    fn test_bool_accepts_booleans_and_strings() {
        let node = json!({ "t": true, "f": false, "st": "True", "sf": " false ", "junk": "yes", "n": 1 });
        assert!(node.bool_or("t", false));
        assert!(!node.bool_or("f", true));
        assert!(node.bool_or("st", false));
        assert!(!node.bool_or("sf", true));
        assert!(node.bool_or("junk", true));
        assert!(!node.bool_or("n", false));
    }

    #[test]
    fn test_datetime_only_from_strings() {
        let node = json!({
            "rfc": "2024-01-02T03:04:05Z",
            "offset": "2024-01-02T05:04:05+02:00",
            "naive": "2024-01-02T03:04:05",
            "spaced": "2024-01-02 03:04:05",
            "fraction": "2024-01-02 03:04:05.000",
            "date": "2024-01-02",
            "garbage": "yesterday",
            "number": 1704164645
        });
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(node.datetime_or("rfc", None), Some(expected));
        assert_eq!(node.datetime_or("offset", None), Some(expected));
        assert_eq!(node.datetime_or("naive", None), Some(expected));
        assert_eq!(node.datetime_or("spaced", None), Some(expected));
        assert_eq!(node.datetime_or("fraction", None), Some(expected));
        assert_eq!(
            node.datetime_or("date", None),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(node.datetime_or("garbage", None), None);
        assert_eq!(node.datetime_or("number", None), None);
    }

    #[test]
    fn test_nested_string() {
        let node = json!({
            "user": { "login": "octocat", "profile": null },
            "ghost": null
        });
        assert_eq!(node.nested_string_or(&["user", "login"], "Unknown"), "octocat");
        assert_eq!(node.nested_string_or(&["user", "name"], "Unknown"), "Unknown");
        assert_eq!(node.nested_string_or(&["ghost", "login"], "Unknown"), "Unknown");
        assert_eq!(
            node.nested_string_or(&["user", "profile", "bio"], "Unknown"),
            "Unknown"
        );
        assert_eq!(node.nested_string_or(&["missing", "login"], "Unknown"), "Unknown");
        assert_eq!(node.nested_string(&[]), None);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("<html>oops</html>"), Value::Null);
    }

    #[test]
    fn test_non_object_node_behaves_as_empty() {
        for node in [json!(null), json!([1, 2]), json!("text"), json!(3)] {
            assert_eq!(node.string_or("title", "d"), "d");
            assert_eq!(node.nested_string_or(&["user", "login"], "d"), "d");
        }
    }
}
