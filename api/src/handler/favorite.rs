use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kernel::model::{destination::Destination, id::DestinationId};
use presenter::UiDestination;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{extractor::AuthorizedUser, model::destination::DestinationsResponse};

pub async fn show_favorite_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Response> {
    registry
        .favorite_repository()
        .find_favorites(user.id())
        .await
        .map(favorites_response)
}

// お気に入りが一件も登録されていない場合は 204 を返す
fn favorites_response(favorites: Option<Vec<Destination>>) -> Response {
    match favorites {
        Some(destinations) => {
            let items: Vec<UiDestination> = destinations
                .into_iter()
                .map(|d| UiDestination::new(d, true))
                .collect();
            Json(DestinationsResponse::from(items)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn add_favorite(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .favorite_repository()
        .set_favorite_status(user.id(), destination_id, true)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn remove_favorite(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .favorite_repository()
        .set_favorite_status(user.id(), destination_id, false)
        .await
        .map(|_| StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn destination(name: &str) -> Destination {
        Destination {
            id: DestinationId::new(),
            place_id: None,
            name: name.into(),
            address: "Ciwidey, Bandung".into(),
            category: "lake".into(),
            latitude: None,
            longitude: None,
            rating: 4.4,
            user_ratings_total: 12,
            photos: vec![],
            opening_hours: None,
            phone_number: None,
            reviews: vec![],
            facilities: BTreeSet::new(),
        }
    }

    #[test]
    fn no_favorites_answers_no_content() {
        assert_eq!(favorites_response(None).status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn favorites_answer_ok_even_when_the_list_is_empty() {
        let res = favorites_response(Some(vec![destination("Situ Patenggang")]));
        assert_eq!(res.status(), StatusCode::OK);

        // 登録済みだが一覧が空の場合は 204 ではなく空の一覧を返す
        assert_eq!(favorites_response(Some(vec![])).status(), StatusCode::OK);
    }
}
