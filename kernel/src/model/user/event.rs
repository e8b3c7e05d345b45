use crate::model::{id::UserId, role::Role};

pub struct CreateUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

pub struct UpdateUserRole {
    pub user_id: UserId,
    pub role: Role,
}

pub struct UpdateUserPassword {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

pub struct DeleteUser {
    pub user_id: UserId,
}
