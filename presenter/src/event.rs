use tokio::sync::{mpsc, Mutex};

/// Transient notifications kept apart from screen state so that
/// re-subscribing to the state never replays them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowMessage(String),
}

/// Queue whose events are each handed out at most once.
pub struct EventQueue<E> {
    sender: mpsc::UnboundedSender<E>,
    receiver: Mutex<mpsc::UnboundedReceiver<E>>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    pub fn push(&self, event: E) {
        // 受信側は self が保持しているので送信は失敗しない
        let _ = self.sender.send(event);
    }

    /// Waits for the next event.
    pub async fn next(&self) -> Option<E> {
        self.receiver.lock().await.recv().await
    }

    /// Takes the next event if one is already queued. Returns `None` while
    /// another consumer is waiting in [`EventQueue::next`].
    pub fn try_next(&self) -> Option<E> {
        self.receiver.try_lock().ok()?.try_recv().ok()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
