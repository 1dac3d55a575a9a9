use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::message::Message;

/// Default channel buffer size for adapter → dispatcher messaging.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// The bus connecting chat adapters to the dispatcher.
///
/// Adapters clone `dispatcher_tx`; exactly one consumer takes the receiver,
/// so events are handled one at a time in arrival order.
pub struct EventBus {
    pub dispatcher_tx: mpsc::Sender<Message>,
    pub dispatcher_rx: Option<mpsc::Receiver<Message>>,
}

impl EventBus {
    /// Create a new bus with the default buffer size.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new bus with a custom buffer size.
    pub fn with_buffer_size(buffer: usize) -> Self {
        let (dispatcher_tx, dispatcher_rx) = mpsc::channel(buffer);

        info!(buffer_size = buffer, "EventBus initialized");

        Self {
            dispatcher_tx,
            dispatcher_rx: Some(dispatcher_rx),
        }
    }

    /// Take the dispatcher receiver (can only be called once).
    pub fn take_dispatcher_rx(&mut self) -> Option<mpsc::Receiver<Message>> {
        debug!("Dispatcher receiver taken");
        self.dispatcher_rx.take()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
