use kernel::model::{auth::AccessToken, id::UserId};
use shared::error::AppError;

pub trait RedisKey {
    type Value: RedisValue + TryFrom<String, Error = AppError>;
    fn inner(&self) -> String;
}

pub trait RedisValue {
    fn inner(&self) -> String;
}

pub struct AuthorizationKey(String);
pub struct AuthorizedUserId(UserId);

impl From<&AccessToken> for AuthorizationKey {
    fn from(token: &AccessToken) -> Self {
        Self(token.0.clone())
    }
}

impl From<AccessToken> for AuthorizationKey {
    fn from(token: AccessToken) -> Self {
        Self(token.0)
    }
}

impl AuthorizationKey {
    pub fn into_token(self) -> String {
        self.0
    }
}

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedUserId;

    fn inner(&self) -> String {
        format!("access_token:{}", self.0)
    }
}

impl From<UserId> for AuthorizedUserId {
    fn from(user_id: UserId) -> Self {
        Self(user_id)
    }
}

impl AuthorizedUserId {
    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl RedisValue for AuthorizedUserId {
    fn inner(&self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<String> for AuthorizedUserId {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self(UserId::try_from(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefixed_token() {
        let key = AuthorizationKey::from(AccessToken("abc123".into()));
        assert_eq!(key.inner(), "access_token:abc123");
    }

    #[test]
    fn stored_user_id_roundtrips() -> anyhow::Result<()> {
        let user_id = UserId::new();
        let value = AuthorizedUserId::from(user_id);
        let restored = AuthorizedUserId::try_from(value.inner())?;
        assert_eq!(restored.into_inner(), user_id);
        Ok(())
    }

    #[test]
    fn garbage_value_is_rejected() {
        assert!(AuthorizedUserId::try_from("not-a-user".to_string()).is_err());
    }
}
