use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{error, info, warn};
use spbridge_client::{DynClient, DynEventLoop};
use tokio::{
    select,
    sync::{mpsc, watch},
};

use crate::{
    coordinator::Coordinator, BridgeBuilder, BridgeConfig, BuildError, ConnectionStatus,
    DownstreamMessage, HandleError, InputError, InputMessage,
};

struct BridgeState {
    name: String,
    running: AtomicBool,
    stopped: AtomicBool,
}

#[derive(Debug)]
struct BridgeShutdown;

/// A handle for interacting with a running [Bridge].
///
/// `BridgeHandle` is how the inbound router feeds device messages to the bridge. It also exposes
/// the transport connectivity and lets the bridge be stopped.
#[derive(Clone)]
pub struct BridgeHandle {
    state: Arc<BridgeState>,
    input_tx: mpsc::UnboundedSender<InputMessage>,
    stop_tx: mpsc::Sender<BridgeShutdown>,
    status_rx: watch::Receiver<ConnectionStatus>,
}

impl BridgeHandle {
    /// Queue a device message for processing.
    ///
    /// Returns [HandleError::Stopped] once the bridge has been cancelled or has stopped running.
    pub fn input(&self, message: InputMessage) -> Result<(), HandleError> {
        if self.state.stopped.load(Ordering::SeqCst) {
            return Err(HandleError::Stopped);
        }
        self.input_tx
            .send(message)
            .map_err(|_| HandleError::Stopped)
    }

    /// A receiver that is notified every time the transport connectivity changes
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    pub fn current_status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// Stop accepting input and disconnect the transport.
    ///
    /// This will cancel [Bridge::run()]
    pub async fn cancel(&self) {
        if self.state.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Bridge stopping. bridge={}", self.state.name);
        _ = self.stop_tx.send(BridgeShutdown).await;
    }
}

/// Receives messages produced by a [Bridge] for downstream consumers.
pub struct Downstream {
    rx: mpsc::UnboundedReceiver<DownstreamMessage>,
}

impl Downstream {
    /// Wait for the next message.
    ///
    /// Returns `None` once the bridge has been dropped.
    pub async fn recv(&mut self) -> Option<DownstreamMessage> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<DownstreamMessage> {
        self.rx.try_recv().ok()
    }
}

/// Structure that represents a bridge between the inbound router and a Sparkplug transport.
///
/// See [BridgeBuilder] on how to create a [Bridge] instance.
pub struct Bridge {
    eventloop: Box<DynEventLoop>,
    client: Arc<DynClient>,
    coordinator: Coordinator,
    state: Arc<BridgeState>,
    input_rx: mpsc::UnboundedReceiver<InputMessage>,
    stop_rx: mpsc::Receiver<BridgeShutdown>,
}

impl Bridge {
    pub(crate) fn new_from_builder(
        builder: BridgeBuilder,
    ) -> Result<(Self, BridgeHandle, Downstream), BuildError> {
        let config = builder.resolve_config()?;
        config.validate()?;
        let (eventloop, client) = builder.eventloop_client;
        Ok(Self::new(config, eventloop, client))
    }

    fn new(
        config: BridgeConfig,
        eventloop: Box<DynEventLoop>,
        client: Arc<DynClient>,
    ) -> (Self, BridgeHandle, Downstream) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (downstream_tx, downstream_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);

        let state = Arc::new(BridgeState {
            name: config.name.clone(),
            running: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        });

        info!(
            "Bridge created. bridge={} cache_enabled={} version={}",
            config.name, config.cache_enabled, config.version
        );

        let bridge = Self {
            eventloop,
            coordinator: Coordinator::new(&config, client.clone(), downstream_tx, status_tx),
            client,
            state: state.clone(),
            input_rx,
            stop_rx,
        };
        let handle = BridgeHandle {
            state,
            input_tx,
            stop_tx,
            status_rx,
        };
        (bridge, handle, Downstream { rx: downstream_rx })
    }

    async fn handle_input(&mut self, message: InputMessage) {
        if let Err(e) = self.coordinator.handle_input(message).await {
            match &e {
                InputError::UnsupportedMessageType(_) => {
                    warn!("Dropping input: {e}. bridge={}", self.state.name)
                }
                _ => error!("Dropping input: {e}. bridge={}", self.state.name),
            }
        }
    }

    /// Stop taking input and disconnect the transport. Returns the number of queued input
    /// messages that were dropped.
    async fn shutdown(&mut self) -> usize {
        self.state.stopped.store(true, Ordering::SeqCst);
        self.input_rx.close();
        let mut dropped = 0;
        while self.input_rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            warn!(
                "Dropped queued input on shutdown. bridge={} dropped={dropped}",
                self.state.name
            );
        }
        if self.client.disconnect().await.is_err() {
            error!("Transport disconnect failed. bridge={}", self.state.name);
        }
        dropped
    }

    /// Run the bridge
    ///
    /// Transport events and input messages are handled one at a time, neither source takes
    /// priority over the other. Runs until [BridgeHandle::cancel()] is called or the transport stops producing events.
    pub async fn run(mut self) {
        info!("Bridge running. bridge={}", self.state.name);
        self.state.running.store(true, Ordering::SeqCst);

        loop {
            select! {
                Some(_) = self.stop_rx.recv() => break,
                maybe_event = self.eventloop.poll() => match maybe_event {
                    Some(event) => self.coordinator.handle_event(event).await,
                    None => {
                        warn!("Transport closed its event stream. bridge={}", self.state.name);
                        break;
                    }
                },
                Some(message) = self.input_rx.recv() => self.handle_input(message).await,
            }
        }

        self.shutdown().await;
        self.state.running.store(false, Ordering::SeqCst);
        info!("Bridge stopped. bridge={}", self.state.name);
    }
}
