//! Query mapping sent to the LocationIQ endpoints and its serialization.

use serde_json::Value;

/// Ordered key/value pairs serialized into a request's query string.
///
/// Values stay as JSON so that falsiness can be judged on the original value:
/// `null`, `false`, `0` and `""` are dropped when serializing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, Value)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair, replacing the value in place if the key already exists.
    pub fn insert(&mut self, key: &'static str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Builder-style variant of [`QueryParams::insert`].
    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends every pair of `other` after the pairs already present.
    pub fn extend(&mut self, other: QueryParams) -> &mut Self {
        for (key, value) in other.pairs {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(k, _)| *k)
    }

    /// Serializes to `key=value&...`, skipping falsy values and
    /// percent-encoding each value like `encodeURIComponent`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(key, value)| format!("{}={}", key, encode_component(&render(value))))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Whether a value survives serialization.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Textual form of a value as it appears in the query string.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format_number(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Formats a float without a trailing `.0` for whole numbers (`2.0` -> `"2"`).
pub(crate) fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Percent-encodes everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub(crate) fn encode_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')' => {
                result.push(c)
            },
            _ => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).as_bytes() {
                    result.push_str(&format!("%{b:02X}"));
                }
            },
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values_are_dropped() {
        let query = QueryParams::new()
            .with("key", "abc")
            .with("format", "json")
            .with("tag", "")
            .with("radius", 0)
            .with("extra", Value::Null)
            .with("flag", false);

        assert_eq!(query.to_query_string(), "key=abc&format=json");
    }

    #[test]
    fn test_zero_as_string_is_kept() {
        let query = QueryParams::new().with("lat", "0").with("lon", "0");
        assert_eq!(query.to_query_string(), "lat=0&lon=0");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let query = QueryParams::new().with("q", "10 Downing Street, London & co");
        assert_eq!(
            query.to_query_string(),
            "q=10%20Downing%20Street%2C%20London%20%26%20co"
        );
        assert_eq!(encode_component("Köln"), "K%C3%B6ln");
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
    }

    #[test]
    fn test_insert_keeps_first_position() {
        let mut query = QueryParams::new().with("key", "old").with("format", "json");
        query.insert("key", "new");

        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["key", "format"]);
        assert_eq!(query.get("key"), Some(&json!("new")));
    }

    #[test]
    fn test_numbers_render_like_javascript() {
        assert_eq!(render(&json!(500)), "500");
        assert_eq!(render(&json!(2.0)), "2");
        assert_eq!(render(&json!(48.85)), "48.85");
        assert_eq!(render(&json!(-0.1275)), "-0.1275");
        assert_eq!(render(&json!([1, 2])), "1,2");
    }
}
