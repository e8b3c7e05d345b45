use std::collections::BTreeSet;

use chrono::DateTime;
use kernel::model::destination::event::{CreateDestination, CreateReviewContent};
use serde::Deserialize;
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    pub result: Option<PlaceDetails>,
    pub error_message: Option<String>,
}

impl PlaceDetailsResponse {
    pub fn into_details(self) -> AppResult<PlaceDetails> {
        let PlaceDetailsResponse {
            status,
            result,
            error_message,
        } = self;
        match (status.as_str(), result) {
            ("OK", Some(details)) => Ok(details),
            (status, _) => Err(AppError::ExternalServiceError(format!(
                "places API returned {status}: {}",
                error_message.unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    pub opening_hours: Option<OpeningHours>,
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceReview {
    pub author_name: String,
    pub rating: f64,
    #[serde(default)]
    pub text: String,
    // UNIX 時間（秒）
    pub time: i64,
}

impl PlaceDetails {
    pub fn into_create_destination(self, photo_url: impl Fn(&str) -> String) -> CreateDestination {
        let PlaceDetails {
            place_id,
            name,
            formatted_address,
            geometry,
            rating,
            user_ratings_total,
            photos,
            opening_hours,
            formatted_phone_number,
            reviews,
            types,
        } = self;

        let opening_hours = opening_hours
            .map(|h| h.weekday_text.join("\n"))
            .filter(|text| !text.is_empty());

        CreateDestination {
            place_id: Some(place_id),
            name,
            address: formatted_address.unwrap_or_default(),
            category: types.into_iter().next().unwrap_or_else(|| "other".into()),
            latitude: geometry.as_ref().map(|g| g.location.lat),
            longitude: geometry.as_ref().map(|g| g.location.lng),
            rating: rating.unwrap_or_default().clamp(0.0, 5.0),
            user_ratings_total: user_ratings_total.unwrap_or_default().max(0),
            photos: photos
                .iter()
                .map(|p| photo_url(&p.photo_reference))
                .collect(),
            opening_hours,
            phone_number: formatted_phone_number,
            reviews: reviews
                .into_iter()
                .map(|r| CreateReviewContent {
                    author_name: r.author_name,
                    rating: r.rating.clamp(0.0, 5.0),
                    text: r.text,
                    reviewed_at: DateTime::from_timestamp(r.time, 0).unwrap_or_default(),
                })
                .collect(),
            // 設備情報は API からは得られないので、管理者が後から登録する
            facilities: BTreeSet::new(),
        }
    }
}
