//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! Host applications hand context data over as JSON; datetimes cross the
//! boundary as RFC 3339 strings.

use indexmap::IndexMap;

use crate::value::Value;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut out = IndexMap::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, Value::from(v));
                }
                Value::Map(out)
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::from(n),
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, v.into());
                }
                serde_json::Value::Object(out)
            }
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"name": "Alice", "age": 30, "score": 1.5, "tags": ["a", "b"], "extra": null}"#,
        )
        .unwrap();
        let value = Value::from(json.clone());

        assert_eq!(value.lookup_path("name"), Some(&Value::from("Alice")));
        assert_eq!(value.lookup_path("age"), Some(&Value::Int(30)));
        assert_eq!(value.lookup_path("score"), Some(&Value::Float(1.5)));
        assert_eq!(value.lookup_path("extra"), Some(&Value::Null));

        let back: serde_json::Value = value.into();
        assert_eq!(back, json);
    }

    #[test]
    fn object_key_order_is_preserved() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "mid": 3, "alpha": 2}"#).unwrap();
        let Value::Map(map) = Value::from(json) else {
            unreachable!("object converts to map");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "mid", "alpha"]);
    }
}
