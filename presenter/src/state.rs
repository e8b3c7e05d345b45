use tokio::sync::watch;

/// What a list screen can be showing at any moment.
#[derive(Debug, Clone, PartialEq)]
pub enum UiLoadState<T> {
    Loading,
    /// The store answered but had nothing recorded. Distinct from
    /// `Success` with an empty collection.
    Empty,
    Success(T),
    Error(String),
}

impl<T> UiLoadState<T> {
    pub fn as_success(&self) -> Option<&T> {
        match self {
            UiLoadState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiLoadState::Loading)
    }
}

/// Latest-value observable. Publishing replaces the current value and wakes
/// every subscriber; late subscribers only ever see the latest value.
pub struct StateHolder<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn publish(&self, value: T) {
        // 購読者がいなくても値は保持する
        self.sender.send_replace(value);
    }

    pub fn current(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}
