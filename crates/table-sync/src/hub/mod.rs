//! # Broadcast Hub
//!
//! Fans table changes out to every connected dashboard. The hub is an actor of its own: it
//! owns the set of open channels and handles `Connect`, `Disconnect` and `Broadcast` one at a
//! time, so membership changes never race with a fan-out.
//!
//! Delivery is best effort. Each dashboard gets a bounded queue; a dashboard whose queue is
//! full misses that event, and a dashboard that went away is dropped from the set on the next
//! broadcast. Neither case is ever reported to the caller of [`HubClient::broadcast`].

pub mod event;

pub use event::TableEvent;

use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Identifies one open dashboard channel.
pub type ChannelId = u64;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HubError {
    #[error("Broadcast hub is closed")]
    Closed,
}

/// Messages handled by [`HubActor`].
#[derive(Debug)]
pub enum HubRequest {
    Connect {
        respond_to: oneshot::Sender<ChannelHandle>,
    },
    Disconnect {
        channel: ChannelId,
    },
    Broadcast {
        event: TableEvent,
        respond_to: oneshot::Sender<usize>,
    },
    Connected {
        respond_to: oneshot::Sender<usize>,
    },
}

/// Receiving end of one dashboard connection.
#[derive(Debug)]
pub struct ChannelHandle {
    id: ChannelId,
    receiver: mpsc::Receiver<TableEvent>,
}

impl ChannelHandle {
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Next event, or `None` once the hub has shut down.
    pub async fn recv(&mut self) -> Option<TableEvent> {
        self.receiver.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<TableEvent> {
        self.receiver.try_recv().ok()
    }
}

pub struct HubActor {
    receiver: mpsc::Receiver<HubRequest>,
    channels: HashMap<ChannelId, mpsc::Sender<TableEvent>>,
    next_id: ChannelId,
    client_buffer: usize,
}

impl HubActor {
    /// `buffer_size` bounds the request queue; `client_buffer` bounds each dashboard's queue.
    pub fn new(buffer_size: usize, client_buffer: usize) -> (Self, HubClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            channels: HashMap::new(),
            next_id: 1,
            client_buffer,
        };
        (actor, HubClient { sender })
    }

    pub async fn run(mut self) {
        info!(client_buffer = self.client_buffer, "Hub started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                HubRequest::Connect { respond_to } => {
                    let handle = self.connect();
                    info!(channel = handle.id, connected = self.channels.len(), "Connected");
                    if respond_to.send(handle).is_err() {
                        debug!("Connect caller went away before the handle arrived");
                    }
                }
                HubRequest::Disconnect { channel } => {
                    let removed = self.channels.remove(&channel).is_some();
                    info!(channel, removed, connected = self.channels.len(), "Disconnected");
                }
                HubRequest::Broadcast { event, respond_to } => {
                    let delivered = self.broadcast(&event);
                    debug!(
                        event = event.name(),
                        id = %event.table_id(),
                        delivered,
                        "Broadcast"
                    );
                    let _ = respond_to.send(delivered);
                }
                HubRequest::Connected { respond_to } => {
                    let _ = respond_to.send(self.channels.len());
                }
            }
        }

        info!(connected = self.channels.len(), "Hub shutdown");
    }

    fn connect(&mut self) -> ChannelHandle {
        let (sender, receiver) = mpsc::channel(self.client_buffer);
        let id = self.next_id;
        self.next_id += 1;
        self.channels.insert(id, sender);
        ChannelHandle { id, receiver }
    }

    fn broadcast(&mut self, event: &TableEvent) -> usize {
        let mut delivered = 0;
        self.channels
            .retain(|channel, sender| match sender.try_send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    warn!(channel, event = event.name(), "Dashboard lagging, event dropped");
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(channel, "Dashboard gone, removing channel");
                    false
                }
            });
        delivered
    }
}

/// Cloneable handle to the hub.
#[derive(Clone)]
pub struct HubClient {
    sender: mpsc::Sender<HubRequest>,
}

impl HubClient {
    /// Opens a new dashboard channel.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<ChannelHandle, HubError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HubRequest::Connect { respond_to })
            .await
            .map_err(|_| HubError::Closed)?;
        response.await.map_err(|_| HubError::Closed)
    }

    /// Closes a dashboard channel. Closing twice, or after shutdown, is a no-op.
    #[instrument(skip(self, handle), fields(channel = handle.id))]
    pub async fn disconnect(&self, handle: ChannelHandle) {
        let channel = handle.id;
        drop(handle);
        if self.sender.send(HubRequest::Disconnect { channel }).await.is_err() {
            debug!("Hub already closed");
        }
    }

    /// Sends `event` to every open channel and returns how many accepted it.
    ///
    /// Never fails: a closed hub counts as zero deliveries.
    ///
    /// Each channel queues at most `hub.client_buffer` events (64 by default). A dashboard
    /// whose queue is full misses this event and is not told, so receivers must drain promptly.
    pub async fn broadcast(&self, event: TableEvent) -> usize {
        let (respond_to, response) = oneshot::channel();
        if self
            .sender
            .send(HubRequest::Broadcast { event, respond_to })
            .await
            .is_err()
        {
            warn!("Hub closed, event not broadcast");
            return 0;
        }
        response.await.unwrap_or(0)
    }

    /// Number of open channels.
    pub async fn connected(&self) -> Result<usize, HubError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HubRequest::Connected { respond_to })
            .await
            .map_err(|_| HubError::Closed)?;
        response.await.map_err(|_| HubError::Closed)
    }
}
