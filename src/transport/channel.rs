use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::message::{self, CodecError, Message};

use super::{Handler, Transport, TransportError};

const ERROR_BUFFER: usize = 32;

/// In-process transport endpoint.
///
/// Messages cross the channel as encoded JSON frames, the same text a socket
/// or IPC pipe would carry. Create both ends with [`ChannelTransport::pair`]
/// and drive each end with [`ChannelTransport::run`].
#[derive(Clone)]
pub struct ChannelTransport {
    inner: Arc<Inner>,
}

struct Inner {
    label: &'static str,
    outbound: mpsc::Sender<String>,
    inbound: Mutex<Option<mpsc::Receiver<String>>>,
    handlers: RwLock<Vec<Handler>>,
    transactions: Mutex<HashMap<Uuid, mpsc::UnboundedSender<Message>>>,
    errors: broadcast::Sender<TransportError>,
}

impl ChannelTransport {
    /// Connected `(renderer, host)` endpoints with `buffer` frames of capacity each way.
    pub fn pair(buffer: usize) -> (Self, Self) {
        let (to_host, from_renderer) = mpsc::channel(buffer.max(1));
        let (to_renderer, from_host) = mpsc::channel(buffer.max(1));
        (
            Self::new("renderer", to_host, from_host),
            Self::new("host", to_renderer, from_renderer),
        )
    }

    fn new(
        label: &'static str,
        outbound: mpsc::Sender<String>,
        inbound: mpsc::Receiver<String>,
    ) -> Self {
        let (errors, _) = broadcast::channel(ERROR_BUFFER);
        Self {
            inner: Arc::new(Inner {
                label,
                outbound,
                inbound: Mutex::new(Some(inbound)),
                handlers: RwLock::new(Vec::new()),
                transactions: Mutex::new(HashMap::new()),
                errors,
            }),
        }
    }

    /// Subscribe to send and decode failures.
    pub fn errors(&self) -> broadcast::Receiver<TransportError> {
        self.inner.errors.subscribe()
    }

    /// Route every inbound message of `transaction` to the returned
    /// subscription instead of the registered handlers.
    ///
    /// The route is removed when the subscription is dropped.
    pub fn transaction(&self, transaction: Uuid) -> TransactionSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.inner.transactions.lock().insert(transaction, sender);
        TransactionSubscription {
            transaction,
            receiver,
            transport: Arc::downgrade(&self.inner),
        }
    }

    /// Pump inbound frames until the peer goes away.
    pub async fn run(&self) {
        let Some(mut inbound) = self.inner.inbound.lock().take() else {
            tracing::warn!(transport = self.inner.label, "Transport is already running");
            return;
        };

        while let Some(frame) = inbound.recv().await {
            match message::decode(&frame) {
                Ok(message) => self.inner.dispatch(message),
                Err(CodecError::UnknownType(kind)) => {
                    tracing::debug!(
                        transport = self.inner.label,
                        kind = %kind,
                        "Ignoring message of unknown type"
                    );
                }
                Err(err) => self.inner.report(TransportError::Decode {
                    reason: err.to_string(),
                }),
            }
        }

        tracing::debug!(transport = self.inner.label, "Transport peer closed");
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: Message) {
        let frame = match message::encode(&message) {
            Ok(frame) => frame,
            Err(err) => {
                self.inner.report(TransportError::Encode {
                    id: message.id,
                    reason: err.to_string(),
                });
                return;
            }
        };

        match self.inner.outbound.try_send(frame) {
            Ok(()) => {
                tracing::trace!(
                    transport = self.inner.label,
                    id = %message.id,
                    kind = ?message.message_type(),
                    "Sent message"
                );
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.inner.report(TransportError::Full { id: message.id });
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.inner
                    .report(TransportError::Disconnected { id: message.id });
            }
        }
    }

    fn receive(&self, handler: Handler) {
        self.inner.handlers.write().push(handler);
    }
}

impl Inner {
    fn dispatch(&self, message: Message) {
        let Some(message) = self.forward_to_transaction(message) else {
            return;
        };

        let handlers = self.handlers.read();
        for handler in handlers.iter() {
            handler(&message);
        }
    }

    /// Hand the message to its transaction subscriber; gives it back when there is none.
    fn forward_to_transaction(&self, message: Message) -> Option<Message> {
        let Some(transaction) = message.transaction else {
            return Some(message);
        };

        let mut transactions = self.transactions.lock();
        let Some(subscriber) = transactions.get(&transaction) else {
            return Some(message);
        };
        match subscriber.send(message) {
            Ok(()) => None,
            Err(mpsc::error::SendError(message)) => {
                transactions.remove(&transaction);
                Some(message)
            }
        }
    }

    fn report(&self, error: TransportError) {
        tracing::warn!(transport = self.label, error = %error, "Transport error");
        if self.errors.send(error).is_err() {
            tracing::trace!(transport = self.label, "No transport error subscribers");
        }
    }
}

/// Responses of one transaction, in arrival order.
pub struct TransactionSubscription {
    transaction: Uuid,
    receiver: mpsc::UnboundedReceiver<Message>,
    transport: Weak<Inner>,
}

impl TransactionSubscription {
    pub fn transaction(&self) -> Uuid {
        self.transaction
    }

    pub async fn next(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for TransactionSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.transport.upgrade() {
            inner.transactions.lock().remove(&self.transaction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageBody;

    fn recorder(transport: &ChannelTransport) -> Arc<Mutex<Vec<Message>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        transport.receive(Box::new(move |message| sink.lock().push(message.clone())));
        seen
    }

    #[tokio::test]
    async fn all_handlers_see_messages_in_order() {
        let (renderer, host) = ChannelTransport::pair(8);
        let first = recorder(&renderer);
        let second = recorder(&renderer);

        let undo = Message::new(MessageBody::Undo);
        let redo = Message::new(MessageBody::Redo);
        host.send(undo.clone());
        host.send(redo.clone());
        drop(host);
        renderer.run().await;

        assert_eq!(*first.lock(), vec![undo.clone(), redo.clone()]);
        assert_eq!(*second.lock(), vec![undo, redo]);
    }

    #[tokio::test]
    async fn unknown_frames_are_skipped() {
        let (renderer, host) = ChannelTransport::pair(8);
        let seen = recorder(&renderer);

        host.inner
            .outbound
            .try_send(format!(
                r#"{{"id":"{}","type":"Teleport","payload":null}}"#,
                Uuid::new_v4()
            ))
            .expect("frame");
        host.send(Message::new(MessageBody::Copy));
        drop(host);
        renderer.run().await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].body, MessageBody::Copy);
    }

    #[tokio::test]
    async fn transaction_responses_reach_only_the_subscriber() {
        let (renderer, host) = ChannelTransport::pair(8);
        let seen = recorder(&renderer);
        let transaction = Uuid::new_v4();
        let mut subscription = renderer.transaction(transaction);

        host.send(Message::new(MessageBody::OpenFileRequest).with_transaction(transaction));
        host.send(Message::new(MessageBody::Paste));
        drop(host);
        renderer.run().await;

        let routed = subscription.try_next().expect("transaction response");
        assert_eq!(routed.body, MessageBody::OpenFileRequest);
        assert!(subscription.try_next().is_none());
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0].body, MessageBody::Paste);
    }

    #[tokio::test]
    async fn dropped_subscription_falls_back_to_handlers() {
        let (renderer, host) = ChannelTransport::pair(8);
        let seen = recorder(&renderer);
        let transaction = Uuid::new_v4();
        drop(renderer.transaction(transaction));

        host.send(Message::new(MessageBody::Undo).with_transaction(transaction));
        drop(host);
        renderer.run().await;

        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn send_to_closed_peer_reports_error() {
        let (renderer, host) = ChannelTransport::pair(8);
        let mut errors = host.errors();
        drop(renderer);

        let message = Message::new(MessageBody::Undo);
        host.send(message.clone());

        match errors.try_recv() {
            Ok(TransportError::Disconnected { id }) => assert_eq!(id, message.id),
            other => panic!("expected disconnect, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn full_buffer_reports_error() {
        let (_renderer, host) = ChannelTransport::pair(1);
        let mut errors = host.errors();

        host.send(Message::new(MessageBody::Undo));
        host.send(Message::new(MessageBody::Redo));

        assert!(matches!(errors.try_recv(), Ok(TransportError::Full { .. })));
    }

    #[tokio::test]
    async fn second_run_returns_immediately() {
        let (renderer, host) = ChannelTransport::pair(1);
        drop(host);
        renderer.run().await;
        renderer.run().await;
    }
}
