use serde::Deserialize;
use spbridge_types::ProtocolVersion;

use crate::BuildError;

pub const DEFAULT_NAME: &str = "bridge";

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

/// Bridge settings owned by the caller.
///
/// Can be deserialized e.g from `{"name": "node1", "cache_enabled": true, "version": "spBv1.0"}`.
/// Missing fields take their defaults: name `bridge`, caching disabled and Sparkplug B.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BridgeConfig {
    /// Name used to identify the bridge in logs, usually the edge node id
    #[serde(default = "default_name")]
    pub name: String,
    /// Cache device metrics so device births can be replayed on a rebirth request
    #[serde(default)]
    pub cache_enabled: bool,
    #[serde(default)]
    pub version: ProtocolVersion,
}

impl BridgeConfig {
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        spbridge_types::utils::validate_name(&self.name).map_err(BuildError::InvalidName)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            cache_enabled: false,
            version: ProtocolVersion::default(),
        }
    }
}
