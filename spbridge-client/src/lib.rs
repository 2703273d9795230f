//! Part of spbridge, a bridge between an internal message flow and a [Sparkplug](https://sparkplug.eclipse.org/) network.
//!
//! This library defines the traits and types a transport client implements to carry a bridge's
//! device messages to and from the Sparkplug network.
//!
//! # Feature Flags
//!
//! - `channel-client`: Enables the channel based [EventLoop] and [Client] implementation. Disabled by default.
//!

mod traits;
mod types;

pub use traits::{Client, DynClient, DynEventLoop, EventLoop};
pub use types::*;

/// A basic [EventLoop] and [Client] implementation based on channels
///
/// Useful for writing tests where it is not appropriate to be running a real MQTT client and broker setup
#[cfg(any(feature = "channel-client", doc))]
pub mod channel;
