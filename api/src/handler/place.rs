use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::place::PlacePhotoQuery;

// 画像タグから直接参照されるため認証は求めない
pub async fn show_place_photo(
    Query(query): Query<PlacePhotoQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<impl IntoResponse> {
    query.validate(&())?;

    let photo = registry
        .place_repository()
        .fetch_photo(&query.reference)
        .await?;
    Ok(([(CONTENT_TYPE, photo.content_type)], photo.data))
}
