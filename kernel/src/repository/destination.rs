use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    destination::{
        event::{CreateDestination, CreateReview, DeleteDestination, UpdateDestination},
        Destination, DestinationListOptions, ImportedDestination,
    },
    id::DestinationId,
    list::PaginatedList,
};

#[async_trait]
pub trait DestinationRepository: Send + Sync {
    async fn create(&self, event: CreateDestination) -> AppResult<DestinationId>;
    // 検索条件に合う観光地を評価の高い順に取得する
    async fn find_all(&self, options: DestinationListOptions)
        -> AppResult<PaginatedList<Destination>>;
    async fn find_by_id(&self, destination_id: DestinationId) -> AppResult<Option<Destination>>;
    // place_id が登録済みなら API 由来の項目を更新し、設備情報は残す
    async fn import(&self, event: CreateDestination) -> AppResult<ImportedDestination>;
    async fn update(&self, event: UpdateDestination) -> AppResult<()>;
    async fn delete(&self, event: DeleteDestination) -> AppResult<()>;
    // レビューを追加し、評価の平均と件数を再計算する
    async fn add_review(&self, event: CreateReview) -> AppResult<()>;
}
