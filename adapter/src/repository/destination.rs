use std::collections::HashMap;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    destination::{
        event::{
            CreateDestination, CreateReview, CreateReviewContent, DeleteDestination,
            UpdateDestination,
        },
        Destination, DestinationListOptions, ImportedDestination, Review,
    },
    id::{DestinationId, ReviewId},
    list::PaginatedList,
};
use kernel::repository::destination::DestinationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::destination::{
        facility_tags, DestinationRow, PaginatedDestinationRow, ReviewRow,
    },
    ConnectionPool,
};

pub(crate) const DESTINATION_COLUMNS: &str = r#"
    d.destination_id,
    d.place_id,
    d.name,
    d.address,
    d.category,
    d.latitude,
    d.longitude,
    d.rating,
    d.user_ratings_total,
    d.photos,
    d.opening_hours,
    d.phone_number,
    d.facilities
"#;

// 取り込み時に外部 API の値で上書きする列。facilities は管理者が登録するので含めない
const IMPORT_REFRESHED_COLUMNS: [&str; 10] = [
    "name",
    "address",
    "category",
    "latitude",
    "longitude",
    "rating",
    "user_ratings_total",
    "photos",
    "opening_hours",
    "phone_number",
];

fn import_refresh_assignments() -> String {
    IMPORT_REFRESHED_COLUMNS
        .iter()
        .map(|col| format!("{col} = EXCLUDED.{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ILIKE のワイルドカードを文字として検索できるようにする
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// 外部 API から取り込んだレビューはユーザーに紐づかない
async fn insert_place_reviews(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    destination_id: DestinationId,
    reviews: Vec<CreateReviewContent>,
) -> AppResult<()> {
    for review in reviews {
        sqlx::query(
            r#"
                INSERT INTO destination_reviews
                (review_id, destination_id, author_name, rating, text, reviewed_at)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(ReviewId::new())
        .bind(destination_id)
        .bind(review.author_name)
        .bind(review.rating)
        .bind(review.text)
        .bind(review.reviewed_at)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
    }
    Ok(())
}

#[derive(new)]
pub struct DestinationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl DestinationRepository for DestinationRepositoryImpl {
    async fn create(&self, event: CreateDestination) -> AppResult<DestinationId> {
        let mut tx = self.db.begin().await?;

        let destination_id = DestinationId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO destinations
                (destination_id, place_id, name, address, category,
                latitude, longitude, rating, user_ratings_total,
                photos, opening_hours, phone_number, facilities)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(destination_id)
        .bind(&event.place_id)
        .bind(&event.name)
        .bind(&event.address)
        .bind(&event.category)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.rating)
        .bind(event.user_ratings_total)
        .bind(&event.photos)
        .bind(&event.opening_hours)
        .bind(&event.phone_number)
        .bind(facility_tags(&event.facilities))
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No destination record has been created".into(),
            ));
        }

        insert_place_reviews(&mut tx, destination_id, event.reviews).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(destination_id)
    }

    async fn find_all(
        &self,
        options: DestinationListOptions,
    ) -> AppResult<PaginatedList<Destination>> {
        let DestinationListOptions {
            query,
            category,
            limit,
            offset,
        } = options;

        // まず条件に合う ID と総件数だけを取得する
        let rows: Vec<PaginatedDestinationRow> = sqlx::query_as(
            r#"
                SELECT
                    COUNT(*) OVER() AS total,
                    d.destination_id
                FROM destinations AS d
                WHERE ($1::TEXT IS NULL
                        OR d.name ILIKE '%' || $1 || '%' ESCAPE '\'
                        OR d.address ILIKE '%' || $1 || '%' ESCAPE '\')
                  AND ($2::TEXT IS NULL OR d.category = $2)
                ORDER BY d.rating DESC, d.name ASC
                LIMIT $3
                OFFSET $4
            "#,
        )
        .bind(query.as_deref().map(escape_like))
        .bind(category)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let total = rows.first().map(|r| r.total).unwrap_or_default();
        let ids: Vec<uuid::Uuid> = rows.into_iter().map(|r| r.destination_id.raw()).collect();

        let sql = format!(
            r#"
                SELECT {DESTINATION_COLUMNS}
                FROM destinations AS d
                WHERE d.destination_id = ANY($1)
                ORDER BY d.rating DESC, d.name ASC
            "#
        );
        let rows: Vec<DestinationRow> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        let items = attach_reviews(&self.db, rows).await?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items,
        })
    }

    async fn find_by_id(&self, destination_id: DestinationId) -> AppResult<Option<Destination>> {
        let sql = format!(
            r#"
                SELECT {DESTINATION_COLUMNS}
                FROM destinations AS d
                WHERE d.destination_id = $1
            "#
        );
        let row: Option<DestinationRow> = sqlx::query_as(&sql)
            .bind(destination_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Ok(attach_reviews(&self.db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn import(&self, event: CreateDestination) -> AppResult<ImportedDestination> {
        let Some(place_id) = event.place_id.as_deref() else {
            return Err(AppError::UnprocessableEntity(
                "place_id is required to import a destination".into(),
            ));
        };

        let mut tx = self.db.begin().await?;

        // 同じ place_id の取り込みが並行しても一意制約違反にならないよう upsert する
        let sql = format!(
            r#"
                INSERT INTO destinations
                (destination_id, place_id, name, address, category,
                latitude, longitude, rating, user_ratings_total,
                photos, opening_hours, phone_number, facilities)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (place_id) DO UPDATE SET {}
                RETURNING destination_id, (xmax = 0) AS inserted
            "#,
            import_refresh_assignments()
        );
        let (destination_id, inserted): (DestinationId, bool) = sqlx::query_as(&sql)
            .bind(DestinationId::new())
            .bind(place_id)
            .bind(&event.name)
            .bind(&event.address)
            .bind(&event.category)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(event.rating)
            .bind(event.user_ratings_total)
            .bind(&event.photos)
            .bind(&event.opening_hours)
            .bind(&event.phone_number)
            .bind(facility_tags(&event.facilities))
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        // 以前に取り込んだ API 由来のレビューだけを差し替え、利用者のレビューは残す
        if !inserted {
            sqlx::query(
                "DELETE FROM destination_reviews WHERE destination_id = $1 AND user_id IS NULL",
            )
            .bind(destination_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }
        insert_place_reviews(&mut tx, destination_id, event.reviews).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(if inserted {
            ImportedDestination::Created(destination_id)
        } else {
            ImportedDestination::Refreshed(destination_id)
        })
    }

    async fn update(&self, event: UpdateDestination) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE destinations
                SET
                    name = $1,
                    address = $2,
                    category = $3,
                    latitude = $4,
                    longitude = $5,
                    photos = $6,
                    opening_hours = $7,
                    phone_number = $8,
                    facilities = $9
                WHERE destination_id = $10
            "#,
        )
        .bind(&event.name)
        .bind(&event.address)
        .bind(&event.category)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(&event.photos)
        .bind(&event.opening_hours)
        .bind(&event.phone_number)
        .bind(facility_tags(&event.facilities))
        .bind(event.destination_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified destination not found".into(),
            ));
        }

        tracing::info!(
            destination_id = %event.destination_id,
            requested_user = %event.requested_user,
            "destination updated"
        );
        Ok(())
    }

    async fn delete(&self, event: DeleteDestination) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // お気に入りとレビューを先に削除してから観光地本体を削除する
        sqlx::query("DELETE FROM favorites WHERE destination_id = $1")
            .bind(event.destination_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        sqlx::query("DELETE FROM destination_reviews WHERE destination_id = $1")
            .bind(event.destination_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM destinations WHERE destination_id = $1")
            .bind(event.destination_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified destination not found".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            destination_id = %event.destination_id,
            requested_user = %event.requested_user,
            "destination deleted"
        );
        Ok(())
    }

    async fn add_review(&self, event: CreateReview) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // 評価の再計算が並行する書き込みと混ざらないようにする
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let author_name: Option<String> =
            sqlx::query_scalar("SELECT user_name FROM users WHERE user_id = $1")
                .bind(event.reviewed_by)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        let Some(author_name) = author_name else {
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{}）が見つかりませんでした。",
                event.reviewed_by
            )));
        };

        let res = sqlx::query(
            r#"
                UPDATE destinations
                SET
                    rating = (rating * user_ratings_total + $2) / (user_ratings_total + 1),
                    user_ratings_total = user_ratings_total + 1
                WHERE destination_id = $1
            "#,
        )
        .bind(event.destination_id)
        .bind(event.rating)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "観光地（{}）が見つかりませんでした。",
                event.destination_id
            )));
        }

        sqlx::query(
            r#"
                INSERT INTO destination_reviews
                (review_id, destination_id, user_id, author_name, rating, text)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(ReviewId::new())
        .bind(event.destination_id)
        .bind(event.reviewed_by)
        .bind(author_name)
        .bind(event.rating)
        .bind(event.text)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

// 取得した観光地の行にレビューを付けて、行の順序のまま Destination に変換する
pub(crate) async fn attach_reviews(
    db: &ConnectionPool,
    rows: Vec<DestinationRow>,
) -> AppResult<Vec<Destination>> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<uuid::Uuid> = rows.iter().map(|r| r.destination_id.raw()).collect();
    let review_rows: Vec<ReviewRow> = sqlx::query_as(
        r#"
            SELECT
                review_id,
                destination_id,
                author_name,
                rating,
                text,
                reviewed_at
            FROM destination_reviews
            WHERE destination_id = ANY($1)
            ORDER BY reviewed_at DESC
        "#,
    )
    .bind(ids)
    .fetch_all(db.inner_ref())
    .await
    .map_err(AppError::SpecificOperationError)?;

    let mut reviews: HashMap<DestinationId, Vec<Review>> = HashMap::new();
    for row in review_rows {
        reviews
            .entry(row.destination_id)
            .or_default()
            .push(Review::from(row));
    }

    rows.into_iter()
        .map(|row| {
            let r = reviews.remove(&row.destination_id).unwrap_or_default();
            row.into_destination(r)
        })
        .collect()
}
