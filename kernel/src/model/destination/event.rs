use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::{
    facility::Facility,
    id::{DestinationId, UserId},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateDestination {
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
    pub reviews: Vec<CreateReviewContent>,
    pub facilities: BTreeSet<Facility>,
}

// 取り込み時に外部 API から渡されるレビュー
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReviewContent {
    pub author_name: String,
    pub rating: f64,
    pub text: String,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct UpdateDestination {
    pub destination_id: DestinationId,
    pub name: String,
    pub address: String,
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photos: Vec<String>,
    pub opening_hours: Option<String>,
    pub phone_number: Option<String>,
    pub facilities: BTreeSet<Facility>,
    pub requested_user: UserId,
}

#[derive(Debug)]
pub struct DeleteDestination {
    pub destination_id: DestinationId,
    pub requested_user: UserId,
}

#[derive(new, Debug)]
pub struct CreateReview {
    pub destination_id: DestinationId,
    pub reviewed_by: UserId,
    pub rating: f64,
    pub text: String,
}
