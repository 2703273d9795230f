use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, info, warn};
use spbridge_client::{DynClient, Event};
use spbridge_types::{
    payload::Payload,
    topic::{DeviceMessage, InputTopic},
    utils::timestamp,
    Metric, PayloadFormat,
};
use tokio::sync::{mpsc, watch};

use crate::{
    cache::DeviceCache, BridgeConfig, ConnectionStatus, DownstreamMessage, InputError,
    InputMessage, PublishError,
};

/// Reconciles device lifecycle messages against the device cache and drives the transport.
///
/// Owned by a single [Bridge](crate::Bridge) task, every method runs to completion before the
/// next event is handled so the cache needs no locking.
pub(crate) struct Coordinator {
    name: String,
    format: PayloadFormat,
    /// `None` when device caching is disabled
    cache: Option<DeviceCache>,
    client: Arc<DynClient>,
    downstream_tx: mpsc::UnboundedSender<DownstreamMessage>,
    status_tx: watch::Sender<ConnectionStatus>,
}

impl Coordinator {
    pub(crate) fn new(
        config: &BridgeConfig,
        client: Arc<DynClient>,
        downstream_tx: mpsc::UnboundedSender<DownstreamMessage>,
        status_tx: watch::Sender<ConnectionStatus>,
    ) -> Self {
        Self {
            name: config.name.clone(),
            format: PayloadFormat::new(config.version),
            cache: config.cache_enabled.then(DeviceCache::new),
            client,
            downstream_tx,
            status_tx,
        }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> Option<&DeviceCache> {
        self.cache.as_ref()
    }

    pub(crate) async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Connect => self.on_status(ConnectionStatus::Connected),
            Event::Reconnect => self.on_status(ConnectionStatus::Connecting),
            Event::Error(e) => {
                error!("Transport error: {e}. bridge={}", self.name);
                self.on_status(ConnectionStatus::Disconnected)
            }
            Event::Rebirth => {
                self.on_rebirth().await;
            }
            Event::Command { device_id, payload } => self.on_command(device_id, payload),
        }
    }

    /// Process a device message from the inbound router.
    ///
    /// Publish failures are logged but do not make the input fail, the cache keeps the update.
    pub(crate) async fn handle_input(&mut self, message: InputMessage) -> Result<(), InputError> {
        debug!(
            "Received input. bridge={} topic={} payload={:?}",
            self.name, message.topic, message.payload
        );
        let topic = InputTopic::parse(&message.topic)?;
        let device_id = topic.device_id;
        let payload = message.payload;
        match topic.message_type {
            DeviceMessage::DBirth => {
                self.on_dbirth(device_id, payload).await;
                Ok(())
            }
            DeviceMessage::DData => self.on_ddata(device_id, payload).await,
            DeviceMessage::DDeath => {
                self.on_ddeath(device_id, payload).await;
                Ok(())
            }
        }
    }

    async fn on_dbirth(&mut self, device_id: String, payload: Payload) {
        if let Some(cache) = self.cache.as_mut() {
            let metrics = read_metrics(
                &self.name,
                &self.format,
                DeviceMessage::DBirth,
                &device_id,
                &payload,
            );
            info!(
                "Caching device birth. bridge={} device={device_id} metrics={}",
                self.name,
                metrics.len()
            );
            cache.set_birth(device_id.clone(), metrics);
        }
        _ = self
            .publish(DeviceMessage::DBirth, &device_id, payload)
            .await;
    }

    async fn on_ddata(&mut self, device_id: String, payload: Payload) -> Result<(), InputError> {
        if let Some(cache) = self.cache.as_mut() {
            if !cache.contains(&device_id) {
                return Err(InputError::UnknownDevice(device_id));
            }
            let metrics = read_metrics(
                &self.name,
                &self.format,
                DeviceMessage::DData,
                &device_id,
                &payload,
            );
            for metric in cache.apply_data(&device_id, metrics)? {
                warn!(
                    "Received a DDATA message with an unknown metric, adding it to the cache. bridge={} device={device_id} metric={metric}",
                    self.name
                );
            }
        }
        _ = self
            .publish(DeviceMessage::DData, &device_id, payload)
            .await;
        Ok(())
    }

    async fn on_ddeath(&mut self, device_id: String, payload: Payload) {
        if let Some(cache) = self.cache.as_mut() {
            if cache.remove(&device_id).is_some() {
                info!("Cleared device cache. bridge={} device={device_id}", self.name);
            }
        }
        _ = self
            .publish(DeviceMessage::DDeath, &device_id, payload)
            .await;
    }

    /// Answer a rebirth request from the network.
    ///
    /// With caching enabled a DBIRTH is published for every cached device, otherwise the request
    /// is passed downstream. Returns the publishes that failed.
    pub(crate) async fn on_rebirth(&self) -> Vec<PublishError> {
        info!("Received rebirth request. bridge={}", self.name);
        let cache = match &self.cache {
            Some(cache) => cache,
            None => {
                info!("Sending rebirth request downstream. bridge={}", self.name);
                self.send_downstream(DownstreamMessage::rebirth());
                return Vec::new();
            }
        };

        let futures: Vec<_> = cache
            .keys()
            .into_iter()
            .map(|device_id| {
                let metrics = cache.get(&device_id).unwrap_or_default();
                let payload = self.format.birth_payload(timestamp(), metrics);
                async move {
                    self.publish(DeviceMessage::DBirth, &device_id, payload)
                        .await
                }
            })
            .collect();

        let failures: Vec<PublishError> = join_all(futures)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if !failures.is_empty() {
            warn!(
                "Rebirth incomplete, {} device births failed. bridge={}",
                failures.len(),
                self.name
            );
        }
        failures
    }

    fn on_command(&self, device_id: String, payload: Payload) {
        info!(
            "Received command, sending downstream. bridge={} device={device_id}",
            self.name
        );
        self.send_downstream(DownstreamMessage::command(device_id, payload));
    }

    fn on_status(&self, status: ConnectionStatus) {
        info!("Transport {status}. bridge={}", self.name);
        self.status_tx.send_replace(status);
    }

    fn send_downstream(&self, message: DownstreamMessage) {
        if self.downstream_tx.send(message).is_err() {
            debug!("No downstream consumer, message dropped. bridge={}", self.name);
        }
    }

    async fn publish(
        &self,
        message_type: DeviceMessage,
        device_id: &str,
        payload: Payload,
    ) -> Result<(), PublishError> {
        let result = match message_type {
            DeviceMessage::DBirth => self.client.publish_device_birth(device_id, payload).await,
            DeviceMessage::DData => self.client.publish_device_data(device_id, payload).await,
            DeviceMessage::DDeath => self.client.publish_device_death(device_id, payload).await,
        };
        result.map_err(|_| {
            let err = PublishError {
                device_id: device_id.to_string(),
                message_type,
            };
            error!("{err} bridge={}", self.name);
            err
        })
    }
}

/// The readable metrics of a payload, in order.
///
/// A missing metric list reads as empty and unreadable entries are skipped, both with a warning.
/// The payload itself is still published unchanged.
fn read_metrics(
    bridge: &str,
    format: &PayloadFormat,
    message_type: DeviceMessage,
    device_id: &str,
    payload: &Payload,
) -> Vec<Metric> {
    let entries = match format.metrics(payload) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Caching {message_type} without metrics: {e}. bridge={bridge} device={device_id}");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(metric) => Some(metric),
            Err(e) => {
                warn!("Skipping {message_type} metric: {e}. bridge={bridge} device={device_id}");
                None
            }
        })
        .collect()
}
