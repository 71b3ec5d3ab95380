#![forbid(unsafe_code)]

//! Keeps a live diagram view in step with a remote layout service.
//!
//! - [`DiagramSynchronizer`]: binds a notification channel to a render pipeline
//! - [`LayoutSession`]: the editor loop (parse, size, lay out, transform) over pluggable
//!   [`LayoutEngine`] versions
//!
//! Nothing here spawns tasks or depends on a specific async runtime; callers drive the futures.

pub mod channel;
pub mod error;
pub mod protocol;
pub mod session;
pub mod synchronizer;

#[cfg(test)]
mod tests;

pub use channel::{
    ChannelEvent, EventStream, LocalChannel, MessageChannel, RemoteEndpoint, local_channel,
};
pub use error::{ChannelError, LayoutError, Result, SessionError, SyncError};
pub use protocol::{
    Action, ActionMessage, ChangeLayoutVersionAction, DIAGRAM_ACCEPT_NOTIFICATION,
    DID_CLOSE_NOTIFICATION, Notification, SetModelAction, TypedAction, UpdateModelAction,
};
pub use session::{LayoutEngine, LayoutSession, LayoutVersionRegistry};
pub use synchronizer::{Delivery, DiagramSynchronizer, RenderPipeline, SyncEvent, SyncState};
