use std::time::Duration;

use serde_json::Value;
use spbridge::{Bridge, BridgeBuilder, BridgeHandle, ConnectionStatus, Downstream, InputMessage};
use spbridge_client::channel::{ChannelBroker, ChannelEventLoop, OutboundMessage};
use spbridge_types::{payload::Payload, ProtocolVersion};
use tokio::{task::JoinHandle, time::timeout};

pub const SYNC_DEVICE: &str = "sync";

pub struct TestBridge {
    pub handle: BridgeHandle,
    pub downstream: Downstream,
    pub broker: ChannelBroker,
    pub task: JoinHandle<()>,
}

pub fn build_bridge(
    cache_enabled: bool,
    version: ProtocolVersion,
) -> (Bridge, BridgeHandle, Downstream, ChannelBroker) {
    let (eventloop, client, broker) = ChannelEventLoop::new();
    let (bridge, handle, downstream) = BridgeBuilder::new(eventloop, client)
        .with_name("node")
        .with_cache_enabled(cache_enabled)
        .with_version(version)
        .build()
        .unwrap();
    (bridge, handle, downstream, broker)
}

pub fn start_bridge(cache_enabled: bool, version: ProtocolVersion) -> TestBridge {
    let (bridge, handle, downstream, broker) = build_bridge(cache_enabled, version);
    let task = tokio::spawn(async move { bridge.run().await });
    TestBridge {
        handle,
        downstream,
        broker,
        task,
    }
}

pub fn payload(value: Value) -> Payload {
    Payload::try_from(value).unwrap()
}

pub fn send_input(handle: &BridgeHandle, topic: &str, value: Value) {
    handle
        .input(InputMessage::new(topic, payload(value)))
        .unwrap();
}

pub async fn recv_outbound(broker: &mut ChannelBroker) -> OutboundMessage {
    timeout(Duration::from_secs(1), broker.rx_outbound.recv())
        .await
        .unwrap()
        .unwrap()
}

/// Wait until every input queued before this call has been processed.
///
/// Publishes a DDEATH for a sentinel device and checks it is the next outbound message, so any
/// message published for earlier input would have been seen first.
pub async fn sync_input(handle: &BridgeHandle, broker: &mut ChannelBroker) {
    send_input(handle, &format!("{SYNC_DEVICE}/DDEATH"), serde_json::json!({}));
    match recv_outbound(broker).await {
        OutboundMessage::DeviceDeath { device_id, .. } if device_id == SYNC_DEVICE => (),
        message => panic!("expected sync DDEATH, got {message:?}"),
    }
}

pub async fn verify_device_birth(broker: &mut ChannelBroker, expected_device: &str) -> Payload {
    match recv_outbound(broker).await {
        OutboundMessage::DeviceBirth { device_id, payload } => {
            assert_eq!(device_id, expected_device);
            payload
        }
        message => panic!("expected DBIRTH, got {message:?}"),
    }
}

pub async fn verify_device_data(broker: &mut ChannelBroker, expected_device: &str) -> Payload {
    match recv_outbound(broker).await {
        OutboundMessage::DeviceData { device_id, payload } => {
            assert_eq!(device_id, expected_device);
            payload
        }
        message => panic!("expected DDATA, got {message:?}"),
    }
}

pub async fn verify_device_death(broker: &mut ChannelBroker, expected_device: &str) -> Payload {
    match recv_outbound(broker).await {
        OutboundMessage::DeviceDeath { device_id, payload } => {
            assert_eq!(device_id, expected_device);
            payload
        }
        message => panic!("expected DDEATH, got {message:?}"),
    }
}

pub async fn wait_for_status(handle: &BridgeHandle, expected: ConnectionStatus) {
    let mut status = handle.status();
    timeout(Duration::from_secs(1), status.wait_for(|s| *s == expected))
        .await
        .unwrap()
        .unwrap();
}
