use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use sqlx::FromRow;

use crate::{
    database::ConnectionPool,
    redis::{
        model::{AuthorizationKey, AuthorizedUserId},
        RedisClient,
    },
    repository::user::verify_password,
};

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[derive(FromRow)]
struct UserCredentialRow {
    user_id: UserId,
    password_hash: String,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key: AuthorizationKey = access_token.into();
        self.kv
            .get(&key)
            .await
            .map(|x| x.map(AuthorizedUserId::into_inner))
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let user_item: Option<UserCredentialRow> =
            sqlx::query_as("SELECT user_id, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        let Some(user_item) = user_item else {
            return Err(AppError::UnauthenticatedError);
        };

        verify_password(password, &user_item.password_hash)?;

        Ok(user_item.user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let (key, value) = from(event);
        self.kv.set_ex(&key, &value, self.ttl).await?;
        Ok(AccessToken(key.into_token()))
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        let key: AuthorizationKey = access_token.into();
        self.kv.delete(&key).await
    }
}

fn from(event: CreateToken) -> (AuthorizationKey, AuthorizedUserId) {
    (
        AuthorizationKey::from(AccessToken(event.access_token)),
        AuthorizedUserId::from(event.user_id),
    )
}
