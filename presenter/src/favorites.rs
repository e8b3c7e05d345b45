use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kernel::{
    model::id::{DestinationId, UserId},
    repository::favorite::FavoriteRepository,
};
use tokio::sync::watch;

use crate::{
    event::{EventQueue, UiEvent},
    model::UiDestination,
    state::{StateHolder, UiLoadState},
};

pub type FavoritesState = UiLoadState<Vec<UiDestination>>;

/// Holds one user's favorite list for a screen and keeps it in step with
/// the favorite store.
///
/// Calls are expected to come from a single owner, one at a time. Toggles
/// are applied to the published list before the store confirms them and
/// are reverted when the store rejects them.
pub struct FavoritesController {
    repository: Arc<dyn FavoriteRepository>,
    state: StateHolder<FavoritesState>,
    events: EventQueue<UiEvent>,
    // 反映待ちの楽観的更新がある間だけ、更新前の一覧を保持する
    pending_baseline: Mutex<Option<Vec<UiDestination>>>,
}

impl FavoritesController {
    pub fn new(repository: Arc<dyn FavoriteRepository>) -> Self {
        Self {
            repository,
            state: StateHolder::new(UiLoadState::Loading),
            events: EventQueue::new(),
            pending_baseline: Mutex::new(None),
        }
    }

    pub fn state(&self) -> FavoritesState {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    pub fn events(&self) -> &EventQueue<UiEvent> {
        &self.events
    }

    pub fn has_pending_mutation(&self) -> bool {
        self.pending().is_some()
    }

    // ロックは await をまたがないので、毒化していても中身はそのまま使える
    fn pending(&self) -> MutexGuard<'_, Option<Vec<UiDestination>>> {
        self.pending_baseline
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn load_favorite_destinations(&self, user_id: UserId) {
        self.state.publish(UiLoadState::Loading);

        let next = match self.repository.find_favorites(user_id).await {
            Ok(Some(destinations)) => UiLoadState::Success(
                destinations
                    .into_iter()
                    .map(|d| UiDestination::new(d, true))
                    .collect(),
            ),
            Ok(None) => UiLoadState::Empty,
            Err(e) => {
                tracing::warn!(%user_id, error.message = %e, "failed to load favorites");
                UiLoadState::Error(e.to_string())
            }
        };
        self.state.publish(next);
    }

    pub async fn toggle_favorite(
        &self,
        user_id: UserId,
        destination_id: DestinationId,
        is_currently_favorite: bool,
    ) {
        let current_list = match self.state.current() {
            UiLoadState::Success(list) if list.iter().any(|d| d.id() == destination_id) => list,
            _ => {
                tracing::debug!(%destination_id, "nothing to toggle");
                return;
            }
        };

        let optimistic_list: Vec<UiDestination> = current_list
            .iter()
            .map(|d| {
                if d.id() == destination_id {
                    d.with_favorite(!d.is_favorite)
                } else {
                    d.clone()
                }
            })
            .collect();

        *self.pending() = Some(current_list.clone());
        self.state.publish(UiLoadState::Success(optimistic_list));

        let result = self
            .repository
            .set_favorite_status(user_id, destination_id, !is_currently_favorite)
            .await;

        {
            let mut pending = self.pending();
            // 後続の更新が基準を差し替えていれば、そちらに任せる
            if pending.as_ref() == Some(&current_list) {
                *pending = None;
            }
        }

        if let Err(e) = result {
            tracing::warn!(
                %user_id,
                %destination_id,
                error.message = %e,
                "failed to update favorite, rolling back"
            );
            self.state.publish(UiLoadState::Success(current_list));
            self.events.push(UiEvent::ShowMessage(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use kernel::model::destination::Destination;
    use shared::error::{AppError, AppResult};
    use tokio::sync::{oneshot, Notify};

    use super::*;

    fn destination(name: &str) -> Destination {
        Destination {
            id: DestinationId::new(),
            place_id: None,
            name: name.into(),
            address: format!("{name} street"),
            category: "park".into(),
            latitude: Some(-6.9),
            longitude: Some(107.6),
            rating: 4.5,
            user_ratings_total: 10,
            photos: vec![format!("https://example.com/{name}.jpg")],
            opening_hours: None,
            phone_number: None,
            reviews: vec![],
            facilities: BTreeSet::new(),
        }
    }

    enum Favorites {
        Found(Vec<Destination>),
        Nothing,
        Fails(String),
    }

    type HeldUpdate = oneshot::Receiver<Result<(), String>>;

    struct StubFavoriteRepository {
        favorites: Favorites,
        load_gate: Option<Arc<Notify>>,
        // 登録された順に、テスト側が結果を送るまで書き込みの応答を保留する
        held_updates: std::sync::Mutex<VecDeque<HeldUpdate>>,
        update_calls: AtomicUsize,
    }

    impl StubFavoriteRepository {
        fn with(favorites: Favorites) -> Self {
            Self {
                favorites,
                load_gate: None,
                held_updates: std::sync::Mutex::new(VecDeque::new()),
                update_calls: AtomicUsize::new(0),
            }
        }

        fn gated_loads(mut self, gate: Arc<Notify>) -> Self {
            self.load_gate = Some(gate);
            self
        }

        fn hold_next_update(&self) -> oneshot::Sender<Result<(), String>> {
            let (tx, rx) = oneshot::channel();
            self.held_updates.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl FavoriteRepository for StubFavoriteRepository {
        async fn find_favorites(&self, _user_id: UserId) -> AppResult<Option<Vec<Destination>>> {
            if let Some(gate) = &self.load_gate {
                gate.notified().await;
            }
            match &self.favorites {
                Favorites::Found(list) => Ok(Some(list.clone())),
                Favorites::Nothing => Ok(None),
                Favorites::Fails(message) => Err(AppError::ExternalServiceError(message.clone())),
            }
        }

        async fn set_favorite_status(
            &self,
            _user_id: UserId,
            _destination_id: DestinationId,
            _should_be_favorite: bool,
        ) -> AppResult<()> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            let held = self.held_updates.lock().unwrap().pop_front();
            match held {
                Some(rx) => rx
                    .await
                    .map_err(|_| AppError::ExternalServiceError("response dropped".into()))?
                    .map_err(AppError::ExternalServiceError),
                None => Ok(()),
            }
        }

        async fn find_favorite_ids(&self, _user_id: UserId) -> AppResult<BTreeSet<DestinationId>> {
            match &self.favorites {
                Favorites::Found(list) => Ok(list.iter().map(|d| d.id).collect()),
                _ => Ok(BTreeSet::new()),
            }
        }
    }

    fn flags(state: &FavoritesState) -> Vec<(String, bool)> {
        state
            .as_success()
            .map(|list| {
                list.iter()
                    .map(|d| (d.destination.name.clone(), d.is_favorite))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn named(pairs: &[(&str, bool)]) -> Vec<(String, bool)> {
        pairs.iter().map(|(n, f)| (n.to_string(), *f)).collect()
    }

    #[tokio::test]
    async fn load_publishes_favorites_flagged_true() {
        let (a, b) = (destination("A"), destination("B"));
        let repo = StubFavoriteRepository::with(Favorites::Found(vec![a, b]));
        let controller = FavoritesController::new(Arc::new(repo));

        controller.load_favorite_destinations(UserId::new()).await;

        assert_eq!(
            flags(&controller.state()),
            named(&[("A", true), ("B", true)])
        );
    }

    #[tokio::test]
    async fn load_distinguishes_empty_from_error_and_empty_list() {
        let user_id = UserId::new();

        let nothing = FavoritesController::new(Arc::new(StubFavoriteRepository::with(
            Favorites::Nothing,
        )));
        nothing.load_favorite_destinations(user_id).await;

        let empty_list = FavoritesController::new(Arc::new(StubFavoriteRepository::with(
            Favorites::Found(vec![]),
        )));
        empty_list.load_favorite_destinations(user_id).await;

        let failing = FavoritesController::new(Arc::new(StubFavoriteRepository::with(
            Favorites::Fails("permission denied".into()),
        )));
        failing.load_favorite_destinations(user_id).await;

        assert_eq!(nothing.state(), UiLoadState::Empty);
        assert_eq!(empty_list.state(), UiLoadState::Success(vec![]));
        assert_eq!(
            failing.state(),
            UiLoadState::Error("permission denied".into())
        );
    }

    #[tokio::test]
    async fn load_publishes_loading_while_store_is_busy() -> anyhow::Result<()> {
        let gate = Arc::new(Notify::new());
        let repo = StubFavoriteRepository::with(Favorites::Found(vec![destination("A")]))
            .gated_loads(gate.clone());
        let controller = Arc::new(FavoritesController::new(Arc::new(repo)));
        controller.state.publish(UiLoadState::Empty);

        let mut rx = controller.subscribe();
        rx.borrow_and_update();
        let c = controller.clone();
        let handle =
            tokio::spawn(async move { c.load_favorite_destinations(UserId::new()).await });

        rx.changed().await?;
        assert!(rx.borrow_and_update().is_loading());

        gate.notify_one();
        handle.await?;
        assert_eq!(flags(&controller.state()), named(&[("A", true)]));
        Ok(())
    }

    #[tokio::test]
    async fn reloading_same_data_yields_identical_state() {
        let repo = StubFavoriteRepository::with(Favorites::Found(vec![
            destination("A"),
            destination("B"),
        ]));
        let controller = FavoritesController::new(Arc::new(repo));
        let user_id = UserId::new();

        controller.load_favorite_destinations(user_id).await;
        let first = controller.state();
        controller.load_favorite_destinations(user_id).await;
        let second = controller.state();

        assert!(matches!(first, UiLoadState::Success(_)));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn toggle_is_visible_before_store_confirms() -> anyhow::Result<()> {
        let (a, b) = (destination("A"), destination("B"));
        let b_id = b.id;
        let repo = StubFavoriteRepository::with(Favorites::Found(vec![a, b]));
        let release = repo.hold_next_update();
        let controller = Arc::new(FavoritesController::new(Arc::new(repo)));
        let user_id = UserId::new();
        controller.load_favorite_destinations(user_id).await;

        let mut rx = controller.subscribe();
        rx.borrow_and_update();

        let c = controller.clone();
        let handle = tokio::spawn(async move { c.toggle_favorite(user_id, b_id, true).await });

        rx.changed().await?;
        assert_eq!(
            flags(&rx.borrow_and_update()),
            named(&[("A", true), ("B", false)])
        );
        assert!(controller.has_pending_mutation());

        let _ = release.send(Ok(()));
        handle.await?;

        assert_eq!(
            flags(&controller.state()),
            named(&[("A", true), ("B", false)])
        );
        assert!(!controller.has_pending_mutation());
        assert_eq!(controller.events().try_next(), None);
        Ok(())
    }

    #[tokio::test]
    async fn failed_toggle_rolls_back_and_reports_once() -> anyhow::Result<()> {
        let (a, b) = (destination("A"), destination("B"));
        let b_id = b.id;
        let repo = StubFavoriteRepository::with(Favorites::Found(vec![a, b]));
        let release = repo.hold_next_update();
        let controller = Arc::new(FavoritesController::new(Arc::new(repo)));
        let user_id = UserId::new();
        controller.load_favorite_destinations(user_id).await;
        let before = controller.state();

        let mut rx = controller.subscribe();
        rx.borrow_and_update();
        let c = controller.clone();
        let handle = tokio::spawn(async move { c.toggle_favorite(user_id, b_id, true).await });

        rx.changed().await?;
        assert_eq!(
            flags(&rx.borrow_and_update()),
            named(&[("A", true), ("B", false)])
        );

        let _ = release.send(Err("network down".into()));
        handle.await?;

        assert_eq!(controller.state(), before);
        assert_eq!(
            flags(&controller.state()),
            named(&[("A", true), ("B", true)])
        );
        match controller.events().try_next() {
            Some(UiEvent::ShowMessage(text)) => assert!(text.contains("network down")),
            None => panic!("expected a message event"),
        }
        assert_eq!(controller.events().try_next(), None);
        assert!(!controller.has_pending_mutation());
        Ok(())
    }

    #[tokio::test]
    async fn toggling_unknown_destination_does_nothing() {
        let repo = Arc::new(StubFavoriteRepository::with(Favorites::Found(vec![
            destination("A"),
        ])));
        let controller = FavoritesController::new(repo.clone());
        let user_id = UserId::new();
        controller.load_favorite_destinations(user_id).await;
        let before = controller.state();

        controller
            .toggle_favorite(user_id, DestinationId::new(), false)
            .await;

        assert_eq!(controller.state(), before);
        assert_eq!(flags(&before), named(&[("A", true)]));
        assert_eq!(controller.events().try_next(), None);
        assert_eq!(repo.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn toggling_before_load_does_nothing() {
        let a = destination("A");
        let a_id = a.id;
        let repo = Arc::new(StubFavoriteRepository::with(Favorites::Found(vec![a])));
        let controller = FavoritesController::new(repo.clone());

        controller.toggle_favorite(UserId::new(), a_id, true).await;

        assert_eq!(controller.state(), UiLoadState::Loading);
        assert_eq!(controller.events().try_next(), None);
        assert_eq!(repo.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn toggle_preserves_order_and_other_entries() {
        let list = vec![destination("A"), destination("B"), destination("C")];
        let c_id = list[2].id;
        let repo = StubFavoriteRepository::with(Favorites::Found(list));
        let controller = FavoritesController::new(Arc::new(repo));
        let user_id = UserId::new();
        controller.load_favorite_destinations(user_id).await;

        controller.toggle_favorite(user_id, c_id, true).await;
        assert_eq!(
            flags(&controller.state()),
            named(&[("A", true), ("B", true), ("C", false)])
        );

        controller.toggle_favorite(user_id, c_id, false).await;
        assert_eq!(
            flags(&controller.state()),
            named(&[("A", true), ("B", true), ("C", true)])
        );
    }

    // 同じ ID への更新が重なった場合、ロールバック先は直前に公開された一覧になる
    #[tokio::test]
    async fn overlapping_toggles_roll_back_to_latest_published() -> anyhow::Result<()> {
        let a = destination("A");
        let a_id = a.id;
        let repo = StubFavoriteRepository::with(Favorites::Found(vec![a]));
        let release_first = repo.hold_next_update();
        let release_second = repo.hold_next_update();
        let controller = Arc::new(FavoritesController::new(Arc::new(repo)));
        let user_id = UserId::new();
        controller.load_favorite_destinations(user_id).await;

        let mut rx = controller.subscribe();
        rx.borrow_and_update();

        let c = controller.clone();
        let first = tokio::spawn(async move { c.toggle_favorite(user_id, a_id, true).await });
        rx.changed().await?;
        assert_eq!(flags(&rx.borrow_and_update()), named(&[("A", false)]));

        let c = controller.clone();
        let second = tokio::spawn(async move { c.toggle_favorite(user_id, a_id, false).await });
        rx.changed().await?;
        assert_eq!(flags(&rx.borrow_and_update()), named(&[("A", true)]));

        let _ = release_first.send(Err("timeout".into()));
        first.await?;
        assert_eq!(flags(&controller.state()), named(&[("A", true)]));
        assert!(controller.has_pending_mutation());

        let _ = release_second.send(Err("timeout".into()));
        second.await?;
        assert_eq!(flags(&controller.state()), named(&[("A", false)]));
        assert!(!controller.has_pending_mutation());

        let mut messages = 0;
        while let Some(UiEvent::ShowMessage(text)) = controller.events().try_next() {
            assert_eq!(text, "timeout");
            messages += 1;
        }
        assert_eq!(messages, 2);
        Ok(())
    }
}
