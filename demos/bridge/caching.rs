use log::{info, LevelFilter};
use serde_json::json;
use spbridge::{BridgeBuilder, InputMessage};
use spbridge_client::{
    channel::{ChannelEventLoop, OutboundMessage},
    Event,
};
use spbridge_types::{payload::Payload, ProtocolVersion};

fn input(topic: &str, payload: serde_json::Value) -> InputMessage {
    InputMessage::new(topic, Payload::try_from(payload).unwrap())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .init();

    let (eventloop, client, mut broker) = ChannelEventLoop::new();
    let (bridge, handle, _downstream) = BridgeBuilder::new(eventloop, client)
        .with_name("edge1")
        .with_cache_enabled(true)
        .with_version(ProtocolVersion::B)
        .build()
        .unwrap();

    let bridge_task = tokio::spawn(bridge.run());

    broker.tx_event.send(Event::Connect).unwrap();

    handle
        .input(input(
            "boiler/DBIRTH",
            json!({"timestamp": 0, "metrics": [{"name": "temp", "value": 20}, {"name": "pressure", "value": 1.2}]}),
        ))
        .unwrap();
    handle
        .input(input(
            "boiler/DDATA",
            json!({"timestamp": 1, "metrics": [{"name": "temp", "value": 25}, {"name": "flow", "value": 3}]}),
        ))
        .unwrap();
    // rejected, the device was never birthed
    handle
        .input(input("pump/DDATA", json!({"metrics": [{"name": "rpm", "value": 900}]})))
        .unwrap();

    for _ in 0..2 {
        if let Some(message) = broker.rx_outbound.recv().await {
            info!("Published {message:?}");
        }
    }

    // the network asks for the device births again, answered from the cache
    broker.tx_event.send(Event::Rebirth).unwrap();
    if let Some(OutboundMessage::DeviceBirth { device_id, payload }) =
        broker.rx_outbound.recv().await
    {
        info!("Replayed birth for {device_id}: {}", serde_json::Value::from(payload));
    }

    handle.cancel().await;
    _ = bridge_task.await;
}
