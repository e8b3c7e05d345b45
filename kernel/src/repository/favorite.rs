use std::collections::BTreeSet;

use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    destination::Destination,
    id::{DestinationId, UserId},
};

/// Per-user favorite membership. The store is the source of truth for
/// which destinations a user has favorited.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// `Ok(None)` means the user has no favorites recorded at all, which is
    /// reported separately from a successful load of an empty list.
    async fn find_favorites(&self, user_id: UserId) -> AppResult<Option<Vec<Destination>>>;
    async fn set_favorite_status(
        &self,
        user_id: UserId,
        destination_id: DestinationId,
        should_be_favorite: bool,
    ) -> AppResult<()>;
    async fn find_favorite_ids(&self, user_id: UserId) -> AppResult<BTreeSet<DestinationId>>;
}
