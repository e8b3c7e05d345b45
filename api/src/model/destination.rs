use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    destination::{
        event::{CreateDestination, CreateReview, UpdateDestination},
        Destination, DestinationListOptions, Review,
    },
    facility::Facility,
    id::{DestinationId, ReviewId, UserId},
    list::PaginatedList,
};
use presenter::UiDestination;
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 20;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

// 平均評価は丸めずに保存し、返すときに小数第一位にそろえる
fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DestinationListQuery {
    #[garde(length(min = 1))]
    pub q: Option<String>,
    #[garde(length(min = 1))]
    pub category: Option<String>,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

impl From<DestinationListQuery> for DestinationListOptions {
    fn from(value: DestinationListQuery) -> Self {
        let DestinationListQuery {
            q,
            category,
            limit,
            offset,
        } = value;
        Self {
            query: q,
            category,
            limit,
            offset,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestinationRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[garde(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[garde(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: f64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub user_ratings_total: i32,
    #[garde(skip)]
    #[serde(default)]
    pub photos: Vec<String>,
    #[garde(skip)]
    pub opening_hours: Option<String>,
    #[garde(skip)]
    pub phone_number: Option<String>,
    #[garde(skip)]
    #[serde(default)]
    pub facilities: BTreeSet<Facility>,
}

impl From<CreateDestinationRequest> for CreateDestination {
    fn from(value: CreateDestinationRequest) -> Self {
        let CreateDestinationRequest {
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
        } = value;
        CreateDestination {
            place_id: None,
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
            reviews: vec![],
            facilities,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestinationRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(length(min = 1))]
    pub category: String,
    #[garde(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[garde(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[garde(skip)]
    #[serde(default)]
    pub photos: Vec<String>,
    #[garde(skip)]
    pub opening_hours: Option<String>,
    #[garde(skip)]
    pub phone_number: Option<String>,
    #[garde(skip)]
    #[serde(default)]
    pub facilities: BTreeSet<Facility>,
}

#[derive(new)]
pub struct UpdateDestinationRequestWithIds(DestinationId, UserId, UpdateDestinationRequest);
impl From<UpdateDestinationRequestWithIds> for UpdateDestination {
    fn from(value: UpdateDestinationRequestWithIds) -> Self {
        let UpdateDestinationRequestWithIds(
            destination_id,
            requested_user,
            UpdateDestinationRequest {
                name,
                address,
                category,
                latitude,
                longitude,
                photos,
                opening_hours,
                phone_number,
                facilities,
            },
        ) = value;
        UpdateDestination {
            destination_id,
            name,
            address,
            category,
            latitude,
            longitude,
            photos,
            opening_hours,
            phone_number,
            facilities,
            requested_user,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImportDestinationRequest {
    #[garde(length(min = 1))]
    pub place_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[garde(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[garde(length(min = 1))]
    pub text: String,
}

#[derive(new)]
pub struct CreateReviewRequestWithIds(DestinationId, UserId, CreateReviewRequest);
impl From<CreateReviewRequestWithIds> for CreateReview {
    fn from(value: CreateReviewRequestWithIds) -> Self {
        let CreateReviewRequestWithIds(destination_id, reviewed_by, CreateReviewRequest { rating, text }) =
            value;
        CreateReview::new(destination_id, reviewed_by, rating, text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationIdResponse {
    pub id: DestinationId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationResponse {
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
    pub reviews: Vec<ReviewResponse>,
    pub facilities: Vec<Facility>,
    pub is_favorite: bool,
}

impl From<UiDestination> for DestinationResponse {
    fn from(value: UiDestination) -> Self {
        let UiDestination {
            destination,
            is_favorite,
        } = value;
        let Destination {
            id,
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
            facilities,
        } = destination;
        Self {
            id,
            place_id,
            name,
            address,
            category,
            latitude,
            longitude,
            rating: round_rating(rating),
            user_ratings_total,
            photos,
            opening_hours,
            phone_number,
            reviews: reviews.into_iter().map(ReviewResponse::from).collect(),
            facilities: facilities.into_iter().collect(),
            is_favorite,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: ReviewId,
    pub author_name: String,
    pub rating: f64,
    pub text: String,
    pub reviewed_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        let Review {
            review_id,
            author_name,
            rating,
            text,
            reviewed_at,
        } = value;
        Self {
            review_id,
            author_name,
            rating,
            text,
            reviewed_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationsResponse {
    pub items: Vec<DestinationResponse>,
}

impl From<Vec<UiDestination>> for DestinationsResponse {
    fn from(value: Vec<UiDestination>) -> Self {
        Self {
            items: value.into_iter().map(DestinationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDestinationResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<DestinationResponse>,
}

#[derive(new)]
pub struct PaginatedDestinationsWithFavorites(PaginatedList<Destination>, BTreeSet<DestinationId>);
impl From<PaginatedDestinationsWithFavorites> for PaginatedDestinationResponse {
    fn from(value: PaginatedDestinationsWithFavorites) -> Self {
        let PaginatedDestinationsWithFavorites(
            PaginatedList {
                total,
                limit,
                offset,
                items,
            },
            favorite_ids,
        ) = value;
        Self {
            total,
            limit,
            offset,
            items: UiDestination::project(items, &favorite_ids)
                .into_iter()
                .map(DestinationResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(name: &str) -> Destination {
        Destination {
            id: DestinationId::new(),
            place_id: None,
            name: name.into(),
            address: "Jl. Asia Afrika, Bandung".into(),
            category: "museum".into(),
            latitude: None,
            longitude: None,
            rating: 4.2,
            user_ratings_total: 3,
            photos: vec![],
            opening_hours: None,
            phone_number: None,
            reviews: vec![],
            facilities: BTreeSet::from([Facility::Toilet, Facility::Parking]),
        }
    }

    #[test]
    fn paginated_response_marks_favorites() {
        let (a, b) = (destination("A"), destination("B"));
        let favorite_ids = BTreeSet::from([b.id]);
        let list = PaginatedList {
            total: 2,
            limit: 20,
            offset: 0,
            items: vec![a, b],
        };

        let res: PaginatedDestinationResponse =
            PaginatedDestinationsWithFavorites::new(list, favorite_ids).into();

        let flags: Vec<(&str, bool)> = res
            .items
            .iter()
            .map(|d| (d.name.as_str(), d.is_favorite))
            .collect();
        assert_eq!(flags, vec![("A", false), ("B", true)]);
        assert_eq!(res.total, 2);
    }

    #[test]
    fn response_serializes_facilities_as_tags() -> anyhow::Result<()> {
        let res = DestinationResponse::from(UiDestination::new(destination("Gedung Sate"), true));
        let json = serde_json::to_value(&res)?;
        assert_eq!(json["facilities"], serde_json::json!(["parking", "toilet"]));
        assert_eq!(json["isFavorite"], true);
        assert_eq!(json["userRatingsTotal"], 3);
        Ok(())
    }

    #[test]
    fn response_rounds_the_stored_average() -> anyhow::Result<()> {
        let mut d = destination("Situ Patenggang");
        d.rating = 13.0 / 3.0;
        let res = DestinationResponse::from(UiDestination::new(d, false));
        assert_eq!(res.rating, 4.3);

        let json = serde_json::to_value(&res)?;
        assert_eq!(json["rating"], 4.3);
        Ok(())
    }

    #[test]
    fn list_query_defaults_and_bounds() -> anyhow::Result<()> {
        let query: DestinationListQuery = serde_json::from_str(r#"{ "q": "kawah" }"#)?;
        assert!(query.validate(&()).is_ok());
        let options = DestinationListOptions::from(query);
        assert_eq!(options.limit, DEFAULT_LIMIT);
        assert_eq!(options.offset, 0);
        assert_eq!(options.query.as_deref(), Some("kawah"));

        let too_many: DestinationListQuery = serde_json::from_str(r#"{ "limit": 1000 }"#)?;
        assert!(too_many.validate(&()).is_err());
        Ok(())
    }

    #[test]
    fn create_request_rejects_out_of_range_rating_and_unknown_facility() -> anyhow::Result<()> {
        let req: CreateDestinationRequest = serde_json::from_str(
            r#"{ "name": "Curug", "address": "Lembang", "category": "waterfall", "rating": 7.5 }"#,
        )?;
        assert!(req.validate(&()).is_err());

        let unknown = serde_json::from_str::<CreateDestinationRequest>(
            r#"{ "name": "Curug", "address": "Lembang", "category": "waterfall", "facilities": ["helipad"] }"#,
        );
        assert!(unknown.is_err());
        Ok(())
    }
}
