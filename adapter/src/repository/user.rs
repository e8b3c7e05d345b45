use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{DestinationId, UserId},
    role::Role,
    user::{
        event::{CreateUser, DeleteUser, UpdateUserPassword, UpdateUserRole},
        User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::user::{FavoriteIdRow, UserRow},
    ConnectionPool,
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, user_name, email, role_name
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let favorites: Vec<DestinationId> =
            sqlx::query_scalar("SELECT destination_id FROM favorites WHERE user_id = $1")
                .bind(current_user_id)
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        row.into_user(favorites.into_iter().collect()).map(Some)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
                SELECT user_id, user_name, email, role_name
                FROM users
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let favorite_rows: Vec<FavoriteIdRow> =
            sqlx::query_as("SELECT user_id, destination_id FROM favorites")
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        let mut favorites: HashMap<UserId, BTreeSet<DestinationId>> = HashMap::new();
        for FavoriteIdRow {
            user_id,
            destination_id,
        } in favorite_rows
        {
            favorites.entry(user_id).or_default().insert(destination_id);
        }

        rows.into_iter()
            .map(|row| {
                let f = favorites.remove(&row.user_id).unwrap_or_default();
                row.into_user(f)
            })
            .collect()
    }

    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed_password = hash_password(&event.password)?;
        let role = Role::User;

        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, user_name, email, password_hash, role_name)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(hashed_password)
        .bind(role.to_string())
        .execute(self.db.inner_ref())
        .await
        .map_err(map_create_user_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            user_name: event.user_name,
            email: event.email,
            role,
            favorite_destinations: BTreeSet::new(),
        })
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let original_password_hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE user_id = $1")
                .bind(event.user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        let original_password_hash = original_password_hash
            .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))?;

        // 現在のパスワードが正しいか確認する
        verify_password(&event.current_password, &original_password_hash)?;

        let new_password_hash = hash_password(&event.new_password)?;
        sqlx::query("UPDATE users SET password_hash = $2 WHERE user_id = $1")
            .bind(event.user_id)
            .bind(new_password_hash)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()> {
        let res = sqlx::query("UPDATE users SET role_name = $2 WHERE user_id = $1")
            .bind(event.user_id)
            .bind(event.role.to_string())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }

        Ok(())
    }

    async fn delete(&self, event: DeleteUser) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(event.user_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }

        Ok(())
    }
}

// メールアドレスの重複は利用者側の誤りとして 422 を返す
fn map_create_user_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::UnprocessableEntity("email address is already registered".into())
        }
        e => AppError::SpecificOperationError(e),
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(AppError::from)
}

pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let valid = bcrypt::verify(password, hash)?;
    if !valid {
        return Err(AppError::UnauthenticatedError);
    }
    Ok(())
}
