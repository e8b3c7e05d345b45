use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    destination::{event::DeleteDestination, ImportedDestination},
    id::DestinationId,
};
use presenter::UiDestination;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::destination::{
        CreateDestinationRequest, CreateReviewRequest, CreateReviewRequestWithIds,
        DestinationIdResponse, DestinationListQuery, DestinationResponse,
        ImportDestinationRequest, PaginatedDestinationResponse,
        PaginatedDestinationsWithFavorites, UpdateDestinationRequest,
        UpdateDestinationRequestWithIds,
    },
};

pub async fn show_destination_list(
    user: AuthorizedUser,
    Query(query): Query<DestinationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedDestinationResponse>> {
    query.validate(&())?;

    let list = registry
        .destination_repository()
        .find_all(query.into())
        .await?;
    let favorite_ids = registry
        .favorite_repository()
        .find_favorite_ids(user.id())
        .await?;

    Ok(Json(
        PaginatedDestinationsWithFavorites::new(list, favorite_ids).into(),
    ))
}

pub async fn show_destination(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DestinationResponse>> {
    let destination = registry
        .destination_repository()
        .find_by_id(destination_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("not found".into()))?;
    let favorite_ids = registry
        .favorite_repository()
        .find_favorite_ids(user.id())
        .await?;

    let is_favorite = favorite_ids.contains(&destination_id);
    Ok(Json(UiDestination::new(destination, is_favorite).into()))
}

pub async fn register_destination(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateDestinationRequest>,
) -> AppResult<(StatusCode, Json<DestinationIdResponse>)> {
    user.ensure_admin()?;
    req.validate(&())?;

    let id = registry.destination_repository().create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(DestinationIdResponse { id })))
}

// 外部 API の place_id から観光地を取り込む。登録済みなら内容を更新する
pub async fn import_destination(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<ImportDestinationRequest>,
) -> AppResult<(StatusCode, Json<DestinationIdResponse>)> {
    user.ensure_admin()?;
    req.validate(&())?;

    let fetched = registry.place_repository().fetch_place(&req.place_id).await?;
    let imported = registry.destination_repository().import(fetched).await?;

    tracing::info!(place_id = %req.place_id, ?imported, "destination imported");

    Ok((
        import_status(&imported),
        Json(DestinationIdResponse { id: imported.id() }),
    ))
}

fn import_status(imported: &ImportedDestination) -> StatusCode {
    match imported {
        ImportedDestination::Created(_) => StatusCode::CREATED,
        ImportedDestination::Refreshed(_) => StatusCode::OK,
    }
}

pub async fn update_destination(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateDestinationRequest>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;
    req.validate(&())?;

    let update_destination = UpdateDestinationRequestWithIds::new(destination_id, user.id(), req);
    registry
        .destination_repository()
        .update(update_destination.into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_destination(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    let delete_destination = DeleteDestination {
        destination_id,
        requested_user: user.id(),
    };
    registry
        .destination_repository()
        .delete(delete_destination)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn add_review(
    user: AuthorizedUser,
    Path(destination_id): Path<DestinationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    registry
        .destination_repository()
        .add_review(CreateReviewRequestWithIds::new(destination_id, user.id(), req).into())
        .await
        .map(|_| StatusCode::CREATED)
}
