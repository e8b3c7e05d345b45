use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{DestinationId, UserId},
    role::Role,
    user::{
        event::{CreateUser, UpdateUserPassword, UpdateUserRole},
        User,
    },
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoleName {
    Admin,
    User,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Admin => Self::Admin,
            RoleName::User => Self::User,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

impl From<Vec<User>> for UsersResponse {
    fn from(value: Vec<User>) -> Self {
        Self {
            items: value.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: RoleName,
    pub favorite_destinations: Vec<DestinationId>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            user_name,
            email,
            role,
            favorite_destinations,
        } = value;
        Self {
            user_id,
            user_name,
            email,
            role: RoleName::from(role),
            favorite_destinations: favorite_destinations.into_iter().collect(),
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPasswordRequest {
    #[garde(length(min = 1))]
    current_password: String,
    #[garde(length(min = 8))]
    new_password: String,
}

#[derive(new)]
pub struct UpdateUserPasswordRequestWithUserId(UserId, UpdateUserPasswordRequest);
impl From<UpdateUserPasswordRequestWithUserId> for UpdateUserPassword {
    fn from(value: UpdateUserPasswordRequestWithUserId) -> Self {
        let UpdateUserPasswordRequestWithUserId(
            user_id,
            UpdateUserPasswordRequest {
                current_password,
                new_password,
            },
        ) = value;
        UpdateUserPassword {
            user_id,
            current_password,
            new_password,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(length(min = 1))]
    user_name: String,
    #[garde(email)]
    email: String,
    #[garde(length(min = 8))]
    password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            user_name,
            email,
            password,
        } = value;
        Self {
            user_name,
            email,
            password,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    role: RoleName,
}

#[derive(new)]
pub struct UpdateUserRoleRequestWithUserId(UserId, UpdateUserRoleRequest);
impl From<UpdateUserRoleRequestWithUserId> for UpdateUserRole {
    fn from(value: UpdateUserRoleRequestWithUserId) -> Self {
        let UpdateUserRoleRequestWithUserId(user_id, UpdateUserRoleRequest { role }) = value;
        Self {
            user_id,
            role: Role::from(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn user_response_lists_favorites() -> anyhow::Result<()> {
        let favorite = DestinationId::new();
        let user = User {
            user_id: UserId::new(),
            user_name: "Sari".into(),
            email: "sari@example.com".into(),
            role: Role::Admin,
            favorite_destinations: BTreeSet::from([favorite]),
        };

        let json = serde_json::to_value(UserResponse::from(user))?;
        assert_eq!(json["role"], "admin");
        assert_eq!(json["favoriteDestinations"][0], favorite.to_string());
        Ok(())
    }

    #[test]
    fn role_request_parses_kebab_case() -> anyhow::Result<()> {
        let req: UpdateUserRoleRequest = serde_json::from_str(r#"{ "role": "admin" }"#)?;
        let event: UpdateUserRole = UpdateUserRoleRequestWithUserId::new(UserId::new(), req).into();
        assert_eq!(event.role, Role::Admin);
        assert!(serde_json::from_str::<UpdateUserRoleRequest>(r#"{ "role": "owner" }"#).is_err());
        Ok(())
    }

    #[test]
    fn create_user_request_requires_email_and_long_password() -> anyhow::Result<()> {
        let ok: CreateUserRequest = serde_json::from_str(
            r#"{ "userName": "Sari", "email": "sari@example.com", "password": "correct-horse" }"#,
        )?;
        assert!(ok.validate(&()).is_ok());

        let bad: CreateUserRequest = serde_json::from_str(
            r#"{ "userName": "Sari", "email": "not-an-email", "password": "short" }"#,
        )?;
        assert!(bad.validate(&()).is_err());
        Ok(())
    }
}
