use std::fmt;

use spbridge_types::{constants::REBIRTH_TOPIC, payload::Payload};

/// A device message delivered to the bridge by the inbound router.
///
/// `topic` is expected to be of the form `<deviceId>/<msgType>` where `msgType` is
/// one of DBIRTH, DDATA or DDEATH.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMessage {
    pub topic: String,
    pub payload: Payload,
}

impl InputMessage {
    pub fn new<S: Into<String>>(topic: S, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// A message the bridge hands to downstream consumers.
///
/// Either a device command relayed from the network (`topic` is the device id) or,
/// when device caching is disabled, a rebirth request (`topic` is `rebirth`).
#[derive(Debug, Clone, PartialEq)]
pub struct DownstreamMessage {
    pub topic: String,
    pub payload: Payload,
}

impl DownstreamMessage {
    pub fn command<S: Into<String>>(device_id: S, payload: Payload) -> Self {
        Self {
            topic: device_id.into(),
            payload,
        }
    }

    pub fn rebirth() -> Self {
        Self {
            topic: REBIRTH_TOPIC.to_string(),
            payload: Payload::new(),
        }
    }

    pub fn is_rebirth(&self) -> bool {
        self.topic == REBIRTH_TOPIC
    }
}

/// Connectivity of the transport as last reported by its events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}
