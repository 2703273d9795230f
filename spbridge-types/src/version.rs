use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    constants::{METRICS_KEY_B, METRIC_KEY_A, SPAV01, SPBV01},
    payload::{Payload, PayloadError},
    Metric,
};

/// The Sparkplug protocol version the bridge speaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// Sparkplug A, metrics are carried under the `metric` key
    #[serde(rename = "A")]
    A,
    /// Sparkplug B, metrics are carried under the `metrics` key
    #[default]
    #[serde(rename = "spBv1.0")]
    B,
}

impl ProtocolVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::A => SPAV01,
            ProtocolVersion::B => SPBV01,
        }
    }

    /// The payload key holding the metric list for this version
    pub fn metrics_key(&self) -> &'static str {
        match self {
            ProtocolVersion::A => METRIC_KEY_A,
            ProtocolVersion::B => METRICS_KEY_B,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown protocol version '{0}', expected 'A' or 'spBv1.0'")]
pub struct UnknownVersion(pub String);

impl FromStr for ProtocolVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SPAV01 => Ok(ProtocolVersion::A),
            SPBV01 => Ok(ProtocolVersion::B),
            other => Err(UnknownVersion(other.to_string())),
        }
    }
}

/// Reads and writes the metric list of a payload for one protocol version.
///
/// Resolved once when a bridge is built so message handlers never branch on the version.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PayloadFormat {
    metrics_key: &'static str,
}

impl PayloadFormat {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            metrics_key: version.metrics_key(),
        }
    }

    pub fn metrics_key(&self) -> &'static str {
        self.metrics_key
    }

    /// Extract the ordered metric list from a payload.
    ///
    /// Fails if the payload carries no metric list under the version's key. Entries that are
    /// not readable metrics, e.g. an alias only metric without a `name`, are returned as errors
    /// in their position so callers can skip them.
    pub fn metrics(
        &self,
        payload: &Payload,
    ) -> Result<Vec<Result<Metric, PayloadError>>, PayloadError> {
        let metrics = payload
            .get(self.metrics_key)
            .ok_or(PayloadError::MissingMetrics(self.metrics_key))?
            .as_array()
            .ok_or_else(|| {
                PayloadError::InvalidMetrics(format!("'{}' is not a list", self.metrics_key))
            })?;
        Ok(metrics
            .iter()
            .map(|metric| {
                Metric::deserialize(metric).map_err(|e| PayloadError::InvalidMetrics(e.to_string()))
            })
            .collect())
    }

    /// Build a birth payload carrying `metrics` under the version's key.
    pub fn birth_payload(&self, timestamp: u64, metrics: &[Metric]) -> Payload {
        let metrics: Vec<Value> = metrics
            .iter()
            .map(|metric| serde_json::to_value(metric).unwrap_or(Value::Null))
            .collect();
        let mut payload = Payload::new();
        payload
            .set_timestamp(timestamp)
            .insert(self.metrics_key, metrics);
        payload
    }
}

impl From<ProtocolVersion> for PayloadFormat {
    fn from(value: ProtocolVersion) -> Self {
        Self::new(value)
    }
}
