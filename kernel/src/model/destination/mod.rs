use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::model::{
    facility::Facility,
    id::{DestinationId, ReviewId},
};

pub mod event;

#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: DestinationId,
    pub place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: f64,
    pub user_ratings_total: i32,
    pub photos: Vec<String>,
    pub opening_hours: Option<String>,
    pub phone_number: Option<String>,
    pub reviews: Vec<Review>,
    pub facilities: BTreeSet<Facility>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: ReviewId,
    pub author_name: String,
    pub rating: f64,
    pub text: String,
    pub reviewed_at: DateTime<Utc>,
}

// 検索条件。query は名前または住所への部分一致
#[derive(Debug, Default)]
pub struct DestinationListOptions {
    pub query: Option<String>,
    pub category: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

// 取り込みの結果。新規登録か既存データの更新かで応答を変える
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportedDestination {
    Created(DestinationId),
    Refreshed(DestinationId),
}

impl ImportedDestination {
    pub fn id(&self) -> DestinationId {
        match self {
            Self::Created(id) | Self::Refreshed(id) => *id,
        }
    }
}
