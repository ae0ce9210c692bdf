//! Typed publish/subscribe channels.
//!
//! Every emitter in the engine owns one [`EventEmitter`] for its own event
//! enum. Subscribers receive an unbounded receiver; dropping it unsubscribes
//! and the sender is pruned on the next emission.

use tokio::sync::mpsc;

/// Fan-out of one event type to any number of subscribers.
#[derive(Debug)]
pub struct EventEmitter<E> {
    subscribers: Vec<mpsc::UnboundedSender<E>>,
}

impl<E: Clone> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Registers a new subscriber, delivered after all existing ones.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends the event to every live subscriber in subscription order.
    pub fn emit(&mut self, event: &E) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of subscribers still registered.
    ///
    /// Receivers dropped since the last emission are still counted.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E: Clone> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}
