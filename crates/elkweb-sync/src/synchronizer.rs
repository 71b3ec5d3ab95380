//! Live diagram synchronizer.
//!
//! Binds a [`MessageChannel`] to a [`RenderPipeline`]. Inbound `diagram/accept` notifications are
//! handed to the pipeline one at a time in arrival order. Local actions whose kind is registered
//! for forwarding (by default only `versionChange`) go to the remote side instead of the
//! pipeline.
//!
//! Outbound sends are fire-and-forget. While no channel is bound they are dropped and logged at
//! `debug` level; a failing send unbinds the channel.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use rustc_hash::FxHashSet;
use serde_json::Value;

use elkweb_core::EditorConfig;

use crate::channel::{ChannelEvent, MessageChannel};
use crate::error::{Result, SyncError};
use crate::protocol::{
    Action, ActionMessage, ChangeLayoutVersionAction, DIAGRAM_ACCEPT_NOTIFICATION,
    DID_CLOSE_NOTIFICATION, Notification, TypedAction,
};

/// Consumer of the synchronized diagram model.
pub trait RenderPipeline {
    /// A message accepted from the remote side, unmodified.
    fn accept(&mut self, message: ActionMessage);

    /// A local action that is not forwarded to the remote side.
    fn dispatch(&mut self, action: Action) {
        let _ = action;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Disconnected,
    Listening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Connected,
    /// The first model of a connection arrived.
    ModelReady,
    LayoutVersionChanged {
        version: Option<String>,
    },
    PayloadRejected {
        reason: String,
    },
    /// `expected` is false when the transport went away on its own.
    Disconnected {
        expected: bool,
    },
}

pub struct DiagramSynchronizer<C, P> {
    client_id: String,
    channel: Option<C>,
    pipeline: P,
    forwarded_kinds: FxHashSet<String>,
    model_ready: bool,
    subscribers: Vec<UnboundedSender<SyncEvent>>,
}

impl<C: MessageChannel, P: RenderPipeline> DiagramSynchronizer<C, P> {
    pub fn new(client_id: impl Into<String>, pipeline: P) -> Self {
        let mut forwarded_kinds = FxHashSet::default();
        forwarded_kinds.insert(ChangeLayoutVersionAction::KIND.to_string());
        Self {
            client_id: client_id.into(),
            channel: None,
            pipeline,
            forwarded_kinds,
            model_ready: false,
            subscribers: Vec::new(),
        }
    }

    pub fn from_config(config: &EditorConfig, pipeline: P) -> Self {
        Self::new(config.client_id(), pipeline)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn state(&self) -> SyncState {
        if self.channel.is_some() {
            SyncState::Listening
        } else {
            SyncState::Disconnected
        }
    }

    pub fn is_listening(&self) -> bool {
        self.channel.is_some()
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Routes local actions of `kind` to the remote side instead of the pipeline.
    pub fn forward_kind(&mut self, kind: impl Into<String>) {
        self.forwarded_kinds.insert(kind.into());
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<SyncEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Binds `channel`. A channel that is already bound is disconnected first.
    pub fn listen(&mut self, channel: C) {
        if self.channel.is_some() {
            self.disconnect();
        }
        self.channel = Some(channel);
        self.model_ready = false;
        tracing::info!(client_id = %self.client_id, "diagram channel bound");
        self.emit(SyncEvent::Connected);
    }

    /// Sends `diagram/didClose` and releases the channel. No-op when already disconnected.
    pub fn disconnect(&mut self) {
        let Some(mut channel) = self.channel.take() else {
            return;
        };
        let client_id = Value::String(self.client_id.clone());
        if let Err(err) = channel.send_notification(DID_CLOSE_NOTIFICATION, client_id) {
            tracing::warn!(client_id = %self.client_id, error = %err, "failed to send didClose");
        }
        tracing::info!(client_id = %self.client_id, "diagram channel released");
        self.emit(SyncEvent::Disconnected { expected: true });
    }

    pub fn try_send_message(&mut self, message: &ActionMessage) -> Result<()> {
        let Some(channel) = self.channel.as_mut() else {
            return Err(SyncError::ChannelUnavailable);
        };
        let params =
            serde_json::to_value(message).map_err(|source| SyncError::MalformedPayload {
                method: DIAGRAM_ACCEPT_NOTIFICATION.to_string(),
                source,
            })?;
        if let Err(err) = channel.send_notification(DIAGRAM_ACCEPT_NOTIFICATION, params) {
            self.connection_lost();
            return Err(err.into());
        }
        Ok(())
    }

    /// Sends `message` if a channel is bound. Never fails; the outcome is reported as
    /// [`Delivery`].
    pub fn send_message(&mut self, message: ActionMessage) -> Delivery {
        match self.try_send_message(&message) {
            Ok(()) => Delivery::Sent,
            Err(SyncError::ChannelUnavailable) => {
                tracing::debug!(kind = %message.action.kind, "dropped message: not connected");
                Delivery::Dropped
            }
            Err(err) => {
                tracing::warn!(kind = %message.action.kind, error = %err, "dropped message");
                Delivery::Dropped
            }
        }
    }

    /// Runs a local action through the action pipeline.
    pub fn dispatch(&mut self, action: Action) -> Delivery {
        if !self.forwarded_kinds.contains(&action.kind) {
            self.pipeline.dispatch(action);
            return Delivery::Sent;
        }
        let version_change = match action.to_typed::<ChangeLayoutVersionAction>() {
            Ok(change) => change,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed versionChange");
                None
            }
        };
        let message = ActionMessage::new(self.client_id.clone(), action);
        let delivery = self.send_message(message);
        if let (Delivery::Sent, Some(change)) = (delivery, version_change) {
            self.emit(SyncEvent::LayoutVersionChanged {
                version: change.version,
            });
        }
        delivery
    }

    pub fn handle_event(&mut self, event: ChannelEvent) {
        if self.channel.is_none() {
            tracing::debug!("ignoring channel event while disconnected");
            return;
        }
        match event {
            ChannelEvent::Notification(notification) => self.handle_notification(notification),
            ChannelEvent::Closed => self.connection_lost(),
        }
    }

    /// Processes `events` one at a time until the channel is released or the stream ends. The
    /// end of the stream counts as an unexpected close.
    pub async fn run<S>(&mut self, mut events: S)
    where
        S: Stream<Item = ChannelEvent> + Unpin,
    {
        while self.is_listening() {
            match events.next().await {
                Some(event) => self.handle_event(event),
                None => self.connection_lost(),
            }
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        if notification.method != DIAGRAM_ACCEPT_NOTIFICATION {
            tracing::debug!(method = %notification.method, "ignoring notification");
            return;
        }
        let message = match decode_accept(notification.params) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, "rejected diagram/accept payload");
                self.emit(SyncEvent::PayloadRejected {
                    reason: err.to_string(),
                });
                return;
            }
        };
        if let Some(client_id) = message.client_id.as_deref() {
            if client_id != self.client_id {
                tracing::debug!(client_id, "ignoring message addressed to another client");
                return;
            }
        }

        let version_change = message
            .action
            .to_typed::<ChangeLayoutVersionAction>()
            .ok()
            .flatten();
        self.pipeline.accept(message);
        if let Some(change) = version_change {
            self.emit(SyncEvent::LayoutVersionChanged {
                version: change.version,
            });
        }
        if !self.model_ready {
            self.model_ready = true;
            self.emit(SyncEvent::ModelReady);
        }
    }

    fn connection_lost(&mut self) {
        if self.channel.take().is_none() {
            return;
        }
        tracing::warn!(client_id = %self.client_id, "diagram channel closed unexpectedly");
        self.emit(SyncEvent::Disconnected { expected: false });
    }

    fn emit(&mut self, event: SyncEvent) {
        self.subscribers
            .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }
}

fn decode_accept(params: Value) -> Result<ActionMessage> {
    serde_json::from_value(params).map_err(|source| SyncError::MalformedPayload {
        method: DIAGRAM_ACCEPT_NOTIFICATION.to_string(),
        source,
    })
}
