use std::collections::{HashSet, VecDeque};

use uuid::Uuid;

use crate::message::{Message, MessageType};

/// Bounded memory of delivered messages.
///
/// Keyed by id and type: a response may echo its request's id.
#[derive(Debug)]
pub struct SeenMessages {
    order: VecDeque<(Uuid, MessageType)>,
    seen: HashSet<(Uuid, MessageType)>,
    capacity: usize,
}

impl SeenMessages {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record `message`; `false` when it was already seen.
    pub fn insert(&mut self, message: &Message) -> bool {
        let key = (message.id, message.message_type());
        if !self.seen.insert(key) {
            return false;
        }
        self.order.push_back(key);
        if self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.seen.remove(&evicted);
            }
        }
        true
    }
}
