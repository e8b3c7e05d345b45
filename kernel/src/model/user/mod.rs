use std::collections::BTreeSet;

use crate::model::{
    id::{DestinationId, UserId},
    role::Role,
};
pub mod event;

#[derive(Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub favorite_destinations: BTreeSet<DestinationId>,
}

impl User {
    pub fn is_favorite(&self, destination_id: &DestinationId) -> bool {
        self.favorite_destinations.contains(destination_id)
    }
}
