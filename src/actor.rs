//! Message passing between the layout thread and its collaborators.
//!
//! Each message carries the `tracing` span it was sent from so the receiving
//! side can log under the sender's context.

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::Span;

pub mod edge_flip;
pub mod reactor;

pub struct Sender<Event>(UnboundedSender<(Span, Event)>);
pub type Receiver<Event> = UnboundedReceiver<(Span, Event)>;

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded_channel();
    (Sender(tx), rx)
}

/// Takes everything currently queued without blocking.
pub fn drain<Event>(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok((_, event)) = rx.try_recv() {
        events.push(event);
    }
    events
}

impl<Event> Sender<Event> {
    /// Fire-and-forget. A closed receiver only means the other side has
    /// shut down, so the error is dropped.
    pub fn send(&self, event: Event) { _ = self.try_send(event) }

    pub fn try_send(&self, event: Event) -> Result<(), SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> std::fmt::Debug for Sender<Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("actor::Sender(...)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_queued_messages_in_order() {
        let (tx, mut rx) = channel();
        tx.send(1);
        tx.send(2);
        tx.clone().send(3);
        assert_eq!(drain(&mut rx), vec![1, 2, 3]);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn sending_after_receiver_drop_is_silent() {
        let (tx, rx) = channel::<u8>();
        drop(rx);
        tx.send(1);
        assert!(tx.try_send(2).is_err());
    }
}
