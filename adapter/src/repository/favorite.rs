use std::collections::BTreeSet;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    destination::Destination,
    id::{DestinationId, UserId},
};
use kernel::repository::favorite::FavoriteRepository;
use shared::error::{AppError, AppResult};

use crate::{
    database::{model::destination::DestinationRow, ConnectionPool},
    repository::destination::{attach_reviews, DESTINATION_COLUMNS},
};

#[derive(new)]
pub struct FavoriteRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl FavoriteRepository for FavoriteRepositoryImpl {
    async fn find_favorites(&self, user_id: UserId) -> AppResult<Option<Vec<Destination>>> {
        // 新しくお気に入りにしたものから順に並べる
        let sql = format!(
            r#"
                SELECT {DESTINATION_COLUMNS}
                FROM favorites AS f
                INNER JOIN destinations AS d ON f.destination_id = d.destination_id
                WHERE f.user_id = $1
                ORDER BY f.favorited_at DESC
            "#
        );
        let rows: Vec<DestinationRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if rows.is_empty() {
            return Ok(None);
        }

        attach_reviews(&self.db, rows).await.map(Some)
    }

    async fn set_favorite_status(
        &self,
        user_id: UserId,
        destination_id: DestinationId,
        should_be_favorite: bool,
    ) -> AppResult<()> {
        if !should_be_favorite {
            // 登録されていなくてもエラーにはしない
            sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND destination_id = $2")
                .bind(user_id)
                .bind(destination_id)
                .execute(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
            return Ok(());
        }

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM destinations WHERE destination_id = $1")
                .bind(destination_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "観光地（{}）が見つかりませんでした。",
                destination_id
            )));
        }

        sqlx::query(
            r#"
                INSERT INTO favorites (user_id, destination_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, destination_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(destination_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn find_favorite_ids(&self, user_id: UserId) -> AppResult<BTreeSet<DestinationId>> {
        let ids: Vec<DestinationId> =
            sqlx::query_scalar("SELECT destination_id FROM favorites WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        Ok(ids.into_iter().collect())
    }
}
