//! Event streaming Relay backed by an unbounded channel.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Typed event channel feeding an Actor's processing loop.
///
/// Cloning a Relay clones the sending side; every clone feeds the same
/// receiver.
///
/// ```rust
/// let (map_requested_relay, mut map_requested_stream) = relay::<MapActivation>();
/// map_requested_relay.send(MapActivation::default());
/// ```
#[derive(Debug)]
pub struct Relay<T> {
    sender: UnboundedSender<T>,
}

impl<T> Clone for Relay<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Relay<T> {
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (Relay { sender }, receiver)
    }

    /// Sends an event; it is silently discarded when nobody listens anymore.
    pub fn send(&self, value: T) {
        let _ = self.sender.unbounded_send(value);
    }
}

pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>) {
    Relay::new()
}
