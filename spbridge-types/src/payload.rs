use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::TIMESTAMP_KEY;

/// Error types for reading the metric list out of a payload.
#[derive(Error, Debug, PartialEq)]
pub enum PayloadError {
    #[error("Payload has no '{0}' metric list")]
    MissingMetrics(&'static str),
    #[error("Payload metric list is invalid: {0}")]
    InvalidMetrics(String),
}

/// An already decoded Sparkplug payload.
///
/// The bridge treats payloads as structured records: keys it does not care about
/// are forwarded unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.0.get(TIMESTAMP_KEY).and_then(Value::as_u64)
    }

    pub fn set_timestamp(&mut self, timestamp: u64) -> &mut Self {
        self.insert(TIMESTAMP_KEY, timestamp)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert<S: Into<String>, V: Into<Value>>(&mut self, key: S, value: V) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl TryFrom<Value> for Payload {
    type Error = Value;

    /// Fails, returning the value, if it is not a JSON object
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl From<Payload> for Value {
    fn from(value: Payload) -> Self {
        Value::Object(value.0)
    }
}
