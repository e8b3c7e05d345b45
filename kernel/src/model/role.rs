use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumString, Display, EnumIter, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}
