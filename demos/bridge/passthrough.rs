use log::{info, LevelFilter};
use serde_json::json;
use spbridge::{BridgeBuilder, BridgeConfig, InputMessage};
use spbridge_client::{channel::ChannelEventLoop, Event};
use spbridge_types::payload::Payload;

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    let config: BridgeConfig =
        serde_json::from_value(json!({"name": "edge2", "cache_enabled": false, "version": "A"}))
            .unwrap();

    let (eventloop, client, mut broker) = ChannelEventLoop::new();
    let (bridge, handle, mut downstream) = BridgeBuilder::new(eventloop, client)
        .with_config(config)
        .build()
        .unwrap();

    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            info!("Failed to register CTRL-C handler: {e}");
            return;
        }
        shutdown_handle.cancel().await;
    });

    let bridge_task = tokio::spawn(bridge.run());

    // without a cache DDATA is forwarded even for devices that were never birthed
    handle
        .input(InputMessage::new(
            "sensor/DDATA",
            Payload::try_from(json!({"metric": [{"name": "level", "value": 7}]})).unwrap(),
        ))
        .unwrap();
    if let Some(message) = broker.rx_outbound.recv().await {
        info!("Published {message:?}");
    }

    broker.tx_event.send(Event::Rebirth).unwrap();
    broker
        .tx_event
        .send(Event::Command {
            device_id: "sensor".into(),
            payload: Payload::new(),
        })
        .unwrap();

    for _ in 0..2 {
        if let Some(message) = downstream.recv().await {
            info!("Downstream topic={} payload={:?}", message.topic, message.payload);
        }
    }

    handle.cancel().await;
    _ = bridge_task.await;
}
