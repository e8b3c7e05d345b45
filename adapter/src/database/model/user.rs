use std::{collections::BTreeSet, str::FromStr};

use kernel::model::{
    id::{DestinationId, UserId},
    role::Role,
    user::User,
};
use shared::error::{AppError, AppResult};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role_name: String,
}

impl UserRow {
    pub fn into_user(self, favorite_destinations: BTreeSet<DestinationId>) -> AppResult<User> {
        let UserRow {
            user_id,
            user_name,
            email,
            role_name,
        } = self;
        let role = Role::from_str(&role_name)
            .map_err(|e| AppError::ConversionEntityError(format!("{role_name}: {e}")))?;
        Ok(User {
            user_id,
            user_name,
            email,
            role,
            favorite_destinations,
        })
    }
}

#[derive(FromRow)]
pub struct FavoriteIdRow {
    pub user_id: UserId,
    pub destination_id: DestinationId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_admin_role_becomes_admin() -> anyhow::Result<()> {
        let favorite = DestinationId::new();
        let user = UserRow {
            user_id: UserId::new(),
            user_name: "admin".into(),
            email: "admin@example.com".into(),
            role_name: "admin".into(),
        }
        .into_user(BTreeSet::from([favorite]))?;

        assert_eq!(user.role, Role::Admin);
        assert!(user.is_favorite(&favorite));
        Ok(())
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res = UserRow {
            user_id: UserId::new(),
            user_name: "x".into(),
            email: "x@example.com".into(),
            role_name: "owner".into(),
        }
        .into_user(BTreeSet::new());
        assert!(matches!(res, Err(AppError::ConversionEntityError(_))));
    }
}
