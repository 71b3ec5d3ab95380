//! The transport seam between a synchronizer and the remote diagram service.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use serde_json::Value;

use crate::error::ChannelError;
use crate::protocol::{ActionMessage, DIAGRAM_ACCEPT_NOTIFICATION, Notification};

/// Outbound half of a duplex notification channel.
///
/// Inbound traffic is delivered separately as a stream of [`ChannelEvent`]s so the owner decides
/// when each one is processed.
pub trait MessageChannel {
    fn send_notification(&mut self, method: &str, params: Value) -> Result<(), ChannelError>;
}

impl<T: MessageChannel + ?Sized> MessageChannel for Box<T> {
    fn send_notification(&mut self, method: &str, params: Value) -> Result<(), ChannelError> {
        (**self).send_notification(method, params)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Notification(Notification),
    /// The transport went away without an explicit disconnect.
    Closed,
}

/// Inbound half of an in-memory channel.
pub type EventStream = UnboundedReceiver<ChannelEvent>;

/// Client side of an in-memory channel created by [`local_channel`].
#[derive(Debug, Clone)]
pub struct LocalChannel {
    outbound: UnboundedSender<Notification>,
}

impl MessageChannel for LocalChannel {
    fn send_notification(&mut self, method: &str, params: Value) -> Result<(), ChannelError> {
        self.outbound
            .unbounded_send(Notification::new(method, params))
            .map_err(|_| ChannelError::Closed)
    }
}

/// The far end of an in-memory channel: pushes events to the client and collects what the
/// client sent.
#[derive(Debug)]
pub struct RemoteEndpoint {
    sent_by_client: UnboundedReceiver<Notification>,
    to_client: UnboundedSender<ChannelEvent>,
}

impl RemoteEndpoint {
    pub fn notify(&self, method: &str, params: Value) -> Result<(), ChannelError> {
        self.to_client
            .unbounded_send(ChannelEvent::Notification(Notification::new(method, params)))
            .map_err(|_| ChannelError::Closed)
    }

    pub fn accept(&self, message: &ActionMessage) -> Result<(), ChannelError> {
        let params =
            serde_json::to_value(message).map_err(|e| ChannelError::Transport(e.to_string()))?;
        self.notify(DIAGRAM_ACCEPT_NOTIFICATION, params)
    }

    /// Reports an unexpected close to the client.
    pub fn close(&self) {
        let _ = self.to_client.unbounded_send(ChannelEvent::Closed);
        self.to_client.close_channel();
    }

    /// Next notification the client sent, if one is already queued.
    #[allow(deprecated)]
    pub fn try_next_sent(&mut self) -> Option<Notification> {
        self.sent_by_client.try_next().ok().flatten()
    }

    pub fn drain_sent(&mut self) -> Vec<Notification> {
        std::iter::from_fn(|| self.try_next_sent()).collect()
    }
}

/// Builds an in-memory duplex channel: the client's outbound half, the client's inbound event
/// stream, and the remote endpoint driving both.
pub fn local_channel() -> (LocalChannel, EventStream, RemoteEndpoint) {
    let (outbound, sent_by_client) = mpsc::unbounded();
    let (to_client, inbound) = mpsc::unbounded();
    (
        LocalChannel { outbound },
        inbound,
        RemoteEndpoint {
            sent_by_client,
            to_client,
        },
    )
}
