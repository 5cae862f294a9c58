use super::Observer;
use crate::model::RingEvent;
use tokio::sync::mpsc;

/// Forwards events to an unbounded channel.
///
/// Sending never waits. Once the receiver is dropped, events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<RingEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RingEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Observer for ChannelObserver {
    fn notify(&self, event: RingEvent) {
        let _ = self.sender.send(event);
    }
}
