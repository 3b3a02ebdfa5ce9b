//! Record activation: asking the host to open a record's detail view.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::model::search_state::RecordRef;

/// Host collaborator that navigates to a record, replacing the current view.
pub trait RecordActivator: Send {
    fn activate(&mut self, target: RecordRef);
}

/// Forwards activations to the host's event loop.
#[derive(Debug, Clone)]
pub struct ChannelActivator {
    tx: mpsc::UnboundedSender<RecordRef>,
}

impl ChannelActivator {
    pub fn new(tx: mpsc::UnboundedSender<RecordRef>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RecordRef>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl RecordActivator for ChannelActivator {
    fn activate(&mut self, target: RecordRef) {
        debug!(
            "Activating record {}#{}",
            target.model_key, target.record_id
        );
        if let Err(e) = self.tx.send(target) {
            warn!("Failed to deliver record activation: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_to_receiver() {
        let (mut activator, mut rx) = ChannelActivator::channel();
        activator.activate(RecordRef::new("res.partner", 5));
        assert_eq!(rx.try_recv().ok(), Some(RecordRef::new("res.partner", 5)));
    }

    #[test]
    fn closed_receiver_is_not_fatal() {
        let (mut activator, rx) = ChannelActivator::channel();
        drop(rx);
        activator.activate(RecordRef::new("sale.order", 3));
    }
}
