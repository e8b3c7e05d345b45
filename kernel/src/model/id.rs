use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::str::FromStr;

macro_rules! define_id {
    ($id_type: ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Serialize,
            Deserialize,
            sqlx::Type,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
        )]
        #[serde(into = "String")]
        #[sqlx(transparent)]
        pub struct $id_type(uuid::Uuid);

        impl $id_type {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn raw(self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $id_type {
            fn default() -> Self {
                $id_type::new()
            }
        }

        impl From<uuid::Uuid> for $id_type {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $id_type {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }

        impl TryFrom<String> for $id_type {
            type Error = AppError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $id_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$id_type> for String {
            fn from(value: $id_type) -> Self {
                value.0.to_string()
            }
        }
    };
}

define_id!(UserId);
define_id!(DestinationId);
define_id!(ReviewId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrips_through_string() -> anyhow::Result<()> {
        let id = DestinationId::new();
        let parsed: DestinationId = id.to_string().parse()?;
        assert_eq!(parsed, id);
        Ok(())
    }

    #[test]
    fn invalid_id_is_rejected() {
        let res = UserId::try_from("not-a-uuid".to_string());
        assert!(matches!(res, Err(AppError::ConvertToUuidError(_))));
    }
}
