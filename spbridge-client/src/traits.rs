use async_trait::async_trait;
use spbridge_types::payload::Payload;

use crate::Event;

/// The outbound half of a transport client.
///
/// Publish methods yield to the async runtime until the message is accepted by the client.
/// A failure only concerns that single call.
#[async_trait]
pub trait Client {
    /// Disconnects the client.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the disconnection was successful
    /// - `Err(())` if the disconnection failed
    async fn disconnect(&self) -> Result<(), ()>;

    /// Publishes a DBIRTH for a device.
    ///
    /// # Parameters
    ///
    /// - `device_id`: The device the birth certificate is for
    /// - `payload`: The payload to publish
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the message was successfully published
    /// - `Err(())` if the publication failed
    async fn publish_device_birth(&self, device_id: &str, payload: Payload) -> Result<(), ()>;

    /// Publishes a DDATA for a device.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the message was successfully published
    /// - `Err(())` if the publication failed
    async fn publish_device_data(&self, device_id: &str, payload: Payload) -> Result<(), ()>;

    /// Publishes a DDEATH for a device.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the message was successfully published
    /// - `Err(())` if the publication failed
    async fn publish_device_death(&self, device_id: &str, payload: Payload) -> Result<(), ()>;
}

pub type DynClient = dyn Client + Send + Sync;

/// The inbound half of a transport client.
///
/// All transport callbacks are delivered through `poll` so that a single consumer
/// processes them one at a time.
#[async_trait]
pub trait EventLoop {
    /// Wait for the next transport event.
    ///
    /// Returns `None` once the transport will not produce any more events.
    async fn poll(&mut self) -> Option<Event>;
}

pub type DynEventLoop = dyn EventLoop + Send;
