use std::{collections::BTreeSet, str::FromStr};

use chrono::{DateTime, Utc};
use kernel::model::{
    destination::{Destination, Review},
    facility::Facility,
    id::{DestinationId, ReviewId},
};
use shared::error::{AppError, AppResult};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct DestinationRow {
    pub destination_id: DestinationId,
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
    pub facilities: Vec<String>,
}

// From トレイトの代わりに、レビュー一覧を引数にとって Destination に変換する
impl DestinationRow {
    pub fn into_destination(self, reviews: Vec<Review>) -> AppResult<Destination> {
        let DestinationRow {
            destination_id,
            place_id,
            name,
            address,
            category,
            latitude,
            longitude,
            rating,
            user_ratings_total,
            photos,
            opening_hours,
            phone_number,
            facilities,
        } = self;
        Ok(Destination {
            id: destination_id,
            place_id,
            name,
            address,
            category,
            latitude,
            longitude,
            rating,
            user_ratings_total,
            photos,
            opening_hours,
            phone_number,
            reviews,
            facilities: parse_facilities(&facilities)?,
        })
    }
}

pub fn parse_facilities(tags: &[String]) -> AppResult<BTreeSet<Facility>> {
    tags.iter()
        .map(|tag| {
            Facility::from_str(tag)
                .map_err(|_| AppError::ConversionEntityError(format!("unknown facility: {tag}")))
        })
        .collect()
}

pub fn facility_tags(facilities: &BTreeSet<Facility>) -> Vec<String> {
    facilities.iter().map(|f| f.to_string()).collect()
}

// ページネーション用の adapter 内部の型
#[derive(FromRow)]
pub struct PaginatedDestinationRow {
    pub total: i64,
    pub destination_id: DestinationId,
}

#[derive(FromRow)]
pub struct ReviewRow {
    pub review_id: ReviewId,
    pub destination_id: DestinationId,
    pub author_name: String,
    pub rating: f64,
    pub text: String,
    pub reviewed_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        let ReviewRow {
            review_id,
            destination_id: _,
            author_name,
            rating,
            text,
            reviewed_at,
        } = value;
        Review {
            review_id,
            author_name,
            rating,
            text,
            reviewed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(facilities: Vec<&str>) -> DestinationRow {
        DestinationRow {
            destination_id: DestinationId::new(),
            place_id: Some("ChIJ-tangkuban".into()),
            name: "Tangkuban Perahu".into(),
            address: "Lembang, Bandung Barat".into(),
            category: "natural_feature".into(),
            latitude: Some(-6.759),
            longitude: Some(107.609),
            rating: 4.6,
            user_ratings_total: 1200,
            photos: vec!["https://example.com/crater.jpg".into()],
            opening_hours: Some("Monday: 7:00 AM – 5:00 PM".into()),
            phone_number: None,
            facilities: facilities.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn row_becomes_destination_with_reviews() -> anyhow::Result<()> {
        let review = Review {
            review_id: ReviewId::new(),
            author_name: "Dewi".into(),
            rating: 5.0,
            text: "Beautiful crater".into(),
            reviewed_at: Utc::now(),
        };
        let d = row(vec!["parking", "prayer-room"]).into_destination(vec![review.clone()])?;

        assert_eq!(d.name, "Tangkuban Perahu");
        assert_eq!(d.reviews, vec![review]);
        assert_eq!(
            d.facilities,
            BTreeSet::from([Facility::Parking, Facility::PrayerRoom])
        );
        Ok(())
    }

    #[test]
    fn unknown_facility_tag_is_a_conversion_error() {
        let res = row(vec!["parking", "helipad"]).into_destination(vec![]);
        assert!(matches!(res, Err(AppError::ConversionEntityError(_))));
    }

    #[test]
    fn facility_tags_roundtrip() -> anyhow::Result<()> {
        let set = BTreeSet::from([Facility::Wifi, Facility::Toilet]);
        assert_eq!(parse_facilities(&facility_tags(&set))?, set);
        Ok(())
    }
}
