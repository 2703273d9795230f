use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single device telemetry point.
///
/// Only `name` and `value` are interpreted by the bridge. Every other field
/// (datatype, alias, timestamp, properties ...) is kept in `extra` and passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    /// `None` when the metric was received without a `value` field
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metric {
    pub fn new<S: Into<String>, V: Into<Value>>(name: S, value: V) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            extra: Map::new(),
        }
    }

    pub fn set_value<V: Into<Value>>(&mut self, value: V) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// Set a protocol field the bridge does not interpret e.g `datatype`
    pub fn set_field<S: Into<String>, V: Into<Value>>(&mut self, key: S, value: V) -> &mut Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

// An explicit `null` is a value, only an absent field maps to `None`
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extra_fields_pass_through() {
        let raw = json!({"name": "temp", "value": 20, "type": "Int32", "alias": 4});
        let metric: Metric = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(metric.name, "temp");
        assert_eq!(metric.value, Some(json!(20)));
        assert_eq!(metric.extra.get("type"), Some(&json!("Int32")));
        assert_eq!(serde_json::to_value(&metric).unwrap(), raw);
    }

    #[test]
    fn missing_value_is_not_added() {
        let raw = json!({"name": "temp", "is_null": true});
        let metric: Metric = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(metric.value, None);
        assert_eq!(serde_json::to_value(&metric).unwrap(), raw);
    }

    #[test]
    fn null_value_is_kept() {
        let raw = json!({"name": "temp", "value": null});
        let metric: Metric = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(metric.value, Some(Value::Null));
        assert_eq!(serde_json::to_value(&metric).unwrap(), raw);
    }

    #[test]
    fn name_is_required() {
        assert!(serde_json::from_value::<Metric>(json!({"value": 1})).is_err());
    }
}
