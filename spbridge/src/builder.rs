use std::sync::Arc;

use spbridge_client::{Client, DynClient, DynEventLoop, EventLoop};
use spbridge_types::ProtocolVersion;

use crate::{Bridge, BridgeConfig, BridgeHandle, BuildError, Downstream};

/// A builder for creating and configuring [Bridge] instances.
pub struct BridgeBuilder {
    pub(crate) eventloop_client: (Box<DynEventLoop>, Arc<DynClient>),
    config: BridgeConfig,
    version_name: Option<String>,
}

impl BridgeBuilder {
    /// Creates a new builder with the specified event loop and client.
    ///
    /// Initializes a builder with the default [BridgeConfig].
    pub fn new<E: EventLoop + Send + 'static, C: Client + Send + Sync + 'static>(
        eventloop: E,
        client: C,
    ) -> Self {
        Self {
            eventloop_client: (Box::new(eventloop), Arc::new(client)),
            config: BridgeConfig::default(),
            version_name: None,
        }
    }

    /// Replace all settings with the provided configuration.
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self.version_name = None;
        self
    }

    /// Sets the name used to identify the bridge in logs.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.name = name.into();
        self
    }

    /// Enable or disable device metric caching.
    ///
    /// When enabled, device births are replayed from the cache on a rebirth request. When disabled,
    /// rebirth requests are passed to the downstream consumer.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.config.version = version;
        self.version_name = None;
        self
    }

    /// Sets the protocol version from its name, `A` or `spBv1.0`.
    ///
    /// An unknown name makes [BridgeBuilder::build] fail.
    pub fn with_version_name<S: Into<String>>(mut self, version: S) -> Self {
        self.version_name = Some(version.into());
        self
    }

    pub(crate) fn resolve_config(&self) -> Result<BridgeConfig, BuildError> {
        let mut config = self.config.clone();
        if let Some(name) = &self.version_name {
            config.version = name.parse()?;
        }
        Ok(config)
    }

    /// Builds the Bridge instance with the configured settings.
    ///
    /// Returns the bridge, a handle used to feed it input and the receiver for downstream messages.
    /// This method will return an error if the configuration is invalid.
    pub fn build(self) -> Result<(Bridge, BridgeHandle, Downstream), BuildError> {
        Bridge::new_from_builder(self)
    }
}
