//! Part of spbridge, a bridge between an internal message flow and a [Sparkplug](https://sparkplug.eclipse.org/) network.
//!
//! This library forwards device BIRTH/DATA/DEATH messages to a Sparkplug transport, optionally
//! caching each device's metrics so the bridge can answer rebirth requests on the devices' behalf.
//!
//! See [BridgeBuilder] on how to create a [Bridge].

mod bridge;
mod builder;
mod cache;
mod config;
mod coordinator;
mod error;
mod events;

pub use bridge::{Bridge, BridgeHandle, Downstream};
pub use builder::BridgeBuilder;
pub use cache::DeviceCache;
pub use config::BridgeConfig;
pub use error::*;
pub use events::*;
