//! Part of spbridge, a bridge between an internal message flow and a [Sparkplug](https://sparkplug.eclipse.org/) network.
//!
//! This library defines the metric, payload and topic types shared by the bridge and its transport clients.

pub mod constants;

mod metric;
pub mod payload;
pub mod topic;
pub mod utils;
mod version;

pub use metric::Metric;
pub use version::{PayloadFormat, ProtocolVersion, UnknownVersion};

/// Identifies a device attached to the bridge
pub type DeviceId = String;
