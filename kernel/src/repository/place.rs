use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{destination::event::CreateDestination, place::PlacePhoto};

// 外部の施設情報 API から観光地データを取得する
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn fetch_place(&self, place_id: &str) -> AppResult<CreateDestination>;
    // API キーはサーバー側に留め、写真は中継して返す
    async fn fetch_photo(&self, photo_reference: &str) -> AppResult<PlacePhoto>;
}
