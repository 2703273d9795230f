use spbridge_types::payload::Payload;

/// An enum that represents the different types of events an [EventLoop](crate::EventLoop) implementation can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The client connected to the broker
    Connect,
    /// The client lost its connection and is trying to connect again
    Reconnect,
    /// The client reported an error
    Error(String),
    /// The network requested that the node republish the births of all its devices
    Rebirth,
    /// A command was received for a device
    Command { device_id: String, payload: Payload },
}
