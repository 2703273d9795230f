use std::{fmt, str::FromStr};

use thiserror::Error;

use super::constants::{DBIRTH, DDATA, DDEATH};

#[derive(Error, Debug, PartialEq)]
pub enum TopicError {
    #[error("Invalid topic '{0}', must be of the form <deviceId>/<msgType>")]
    Malformed(String),
    #[error("Unsupported message type '{0}', expected one of DBIRTH, DDATA or DDEATH")]
    UnsupportedMessageType(String),
}

/// The device lifecycle messages the bridge accepts as input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceMessage {
    DBirth,
    DDeath,
    DData,
}

impl DeviceMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceMessage::DBirth => DBIRTH,
            DeviceMessage::DDeath => DDEATH,
            DeviceMessage::DData => DDATA,
        }
    }
}

impl fmt::Display for DeviceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceMessage {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DBIRTH => Ok(DeviceMessage::DBirth),
            DDEATH => Ok(DeviceMessage::DDeath),
            DDATA => Ok(DeviceMessage::DData),
            other => Err(TopicError::UnsupportedMessageType(other.to_string())),
        }
    }
}

/// A parsed input topic of the form `<deviceId>/<msgType>`
#[derive(Clone, Debug, PartialEq)]
pub struct InputTopic {
    pub device_id: String,
    pub message_type: DeviceMessage,
}

impl InputTopic {
    pub fn new<S: Into<String>>(device_id: S, message_type: DeviceMessage) -> Self {
        Self {
            device_id: device_id.into(),
            message_type,
        }
    }

    /// Parse a `<deviceId>/<msgType>` topic.
    ///
    /// Fails with [TopicError::Malformed] if the topic does not have exactly two non empty
    /// segments and with [TopicError::UnsupportedMessageType] if the message type is not
    /// DBIRTH, DDATA or DDEATH.
    pub fn parse(topic: &str) -> Result<Self, TopicError> {
        let mut iter = topic.split('/');
        let (device_id, message_type) = match (iter.next(), iter.next(), iter.next()) {
            (Some(device_id), Some(message_type), None) => (device_id, message_type),
            _ => return Err(TopicError::Malformed(topic.to_string())),
        };
        if device_id.is_empty() || message_type.is_empty() {
            return Err(TopicError::Malformed(topic.to_string()));
        }
        Ok(Self {
            device_id: device_id.to_string(),
            message_type: message_type.parse()?,
        })
    }
}

impl FromStr for InputTopic {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for InputTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.message_type)
    }
}
