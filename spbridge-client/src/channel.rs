use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use crate::Event;
use async_trait::async_trait;
use spbridge_types::payload::Payload;
use tokio::sync::mpsc;

/// A [Client](crate::Client) implementation that uses channels for message passing.
///
/// # Examples
///
/// See [ChannelEventLoop]
#[derive(Clone)]
pub struct ChannelClient {
    tx: mpsc::UnboundedSender<OutboundMessage>,
    failing_devices: Arc<Mutex<HashSet<String>>>,
}

impl ChannelClient {
    fn publish(&self, device_id: &str, message: OutboundMessage) -> Result<(), ()> {
        if self.failing_devices.lock().unwrap().contains(device_id) {
            return Err(());
        }
        match self.tx.send(message) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }
}

#[async_trait]
impl crate::Client for ChannelClient {
    async fn disconnect(&self) -> Result<(), ()> {
        match self.tx.send(OutboundMessage::Disconnect) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }

    async fn publish_device_birth(&self, device_id: &str, payload: Payload) -> Result<(), ()> {
        self.publish(
            device_id,
            OutboundMessage::DeviceBirth {
                device_id: device_id.to_string(),
                payload,
            },
        )
    }

    async fn publish_device_data(&self, device_id: &str, payload: Payload) -> Result<(), ()> {
        self.publish(
            device_id,
            OutboundMessage::DeviceData {
                device_id: device_id.to_string(),
                payload,
            },
        )
    }

    async fn publish_device_death(&self, device_id: &str, payload: Payload) -> Result<(), ()> {
        self.publish(
            device_id,
            OutboundMessage::DeviceDeath {
                device_id: device_id.to_string(),
                payload,
            },
        )
    }
}

/// An Enum representing different messages and requests a [ChannelClient] can send to the [ChannelBroker]
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundMessage {
    Disconnect,
    DeviceBirth { device_id: String, payload: Payload },
    DeviceData { device_id: String, payload: Payload },
    DeviceDeath { device_id: String, payload: Payload },
}

/// A "broker" that manages the communication between a [ChannelClient] and a [ChannelEventLoop].
///
/// Used to send events to the eventloop and inspect messages/requests produced by the client
///
/// # Examples
///
/// ```ignore
/// use spbridge_client::{Event, channel::{ChannelEventLoop, ChannelClient}};
/// use tokio::runtime::Runtime;
///
/// let rt = Runtime::new().unwrap();
/// rt.block_on(async {
///     let (mut eventloop, client, mut broker) = ChannelEventLoop::new();
///
///     //create a bridge that uses the EventLoop and client
///
///     //Send an event to the EventLoop
///     broker.tx_event.send(Event::Connect).unwrap();
///
///     //Receive a message or request from the Client
///     let message = broker.rx_outbound.recv().await.unwrap();
/// });
/// ```
pub struct ChannelBroker {
    pub rx_outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    pub tx_event: mpsc::UnboundedSender<Event>,
    failing_devices: Arc<Mutex<HashSet<String>>>,
}

impl ChannelBroker {
    /// Make every publish for `device_id` fail until [ChannelBroker::restore_device] is called.
    pub fn fail_device<S: Into<String>>(&self, device_id: S) {
        self.failing_devices.lock().unwrap().insert(device_id.into());
    }

    pub fn restore_device(&self, device_id: &str) {
        self.failing_devices.lock().unwrap().remove(device_id);
    }
}

/// An [EventLoop](crate::EventLoop) implementation that uses channels
///
/// # Examples
///
/// See [ChannelBroker]
pub struct ChannelEventLoop {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl ChannelEventLoop {
    /// Creates a new event loop along with the corresponding client and broker.
    pub fn new() -> (Self, ChannelClient, ChannelBroker) {
        let (tx_event, rx_event) = mpsc::unbounded_channel();
        let (tx_outbound, rx_outbound) = mpsc::unbounded_channel();
        let failing_devices = Arc::new(Mutex::new(HashSet::new()));
        (
            Self { rx: rx_event },
            ChannelClient {
                tx: tx_outbound,
                failing_devices: failing_devices.clone(),
            },
            ChannelBroker {
                rx_outbound,
                tx_event,
                failing_devices,
            },
        )
    }
}

#[async_trait]
impl crate::EventLoop for ChannelEventLoop {
    async fn poll(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
