//! Bidirectional message transport.
//!
//! A [`Transport`] sends messages without blocking and fans every inbound
//! message out to all registered handlers, in the order the peer sent them.
//! Failures never surface at the call site; they go to the transport's own
//! error channel.

mod channel;
mod dedup;

use thiserror::Error;
use uuid::Uuid;

use crate::message::Message;

pub use channel::{ChannelTransport, TransactionSubscription};
pub use dedup::SeenMessages;

/// Callback invoked for every inbound message.
pub type Handler = Box<dyn Fn(&Message) + Send + Sync>;

pub trait Transport: Send + Sync {
    /// Queue a message for the peer. Never blocks.
    fn send(&self, message: Message);

    /// Register a handler. All handlers run for every inbound message.
    fn receive(&self, handler: Handler);
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Transport peer disconnected, dropped message {id}")]
    Disconnected { id: Uuid },

    #[error("Transport buffer full, dropped message {id}")]
    Full { id: Uuid },

    #[error("Failed to encode message {id}: {reason}")]
    Encode { id: Uuid, reason: String },

    #[error("Failed to decode inbound frame: {reason}")]
    Decode { reason: String },
}
