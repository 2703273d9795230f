use spbridge_types::{topic::{DeviceMessage, TopicError}, UnknownVersion};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CacheError {
    #[error("Unknown device: {0}")]
    UnknownDevice(String),
}

/// Reasons an input message was dropped.
///
/// None of these stop the bridge, the message is logged and discarded without side effects.
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Malformed topic: {0}")]
    MalformedTopic(String),
    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),
    #[error("DDATA for unknown device {0}")]
    UnknownDevice(String),
}

impl From<TopicError> for InputError {
    fn from(value: TopicError) -> Self {
        match value {
            TopicError::Malformed(topic) => InputError::MalformedTopic(topic),
            TopicError::UnsupportedMessageType(message_type) => {
                InputError::UnsupportedMessageType(message_type)
            }
        }
    }
}

impl From<CacheError> for InputError {
    fn from(value: CacheError) -> Self {
        match value {
            CacheError::UnknownDevice(device_id) => InputError::UnknownDevice(device_id),
        }
    }
}

/// A single failed publish to the transport.
#[derive(Error, Debug, PartialEq)]
#[error("Publishing {message_type} failed. device={device_id}")]
pub struct PublishError {
    pub device_id: String,
    pub message_type: DeviceMessage,
}

#[derive(Error, Debug, PartialEq)]
pub enum HandleError {
    #[error("Bridge has stopped")]
    Stopped,
}

/// Configuration problems that prevent a bridge from being created.
#[derive(Error, Debug, PartialEq)]
pub enum BuildError {
    #[error("Invalid bridge name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    UnknownVersion(#[from] UnknownVersion),
}
