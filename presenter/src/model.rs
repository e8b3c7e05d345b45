use std::collections::BTreeSet;

use kernel::model::{destination::Destination, id::DestinationId};

/// A destination as seen by one user, paired with whether that user has it
/// favorited.
#[derive(Debug, Clone, PartialEq)]
pub struct UiDestination {
    pub destination: Destination,
    pub is_favorite: bool,
}

impl UiDestination {
    pub fn new(destination: Destination, is_favorite: bool) -> Self {
        Self {
            destination,
            is_favorite,
        }
    }

    pub fn id(&self) -> DestinationId {
        self.destination.id
    }

    // お気に入り ID 集合から表示用の一覧を組み立てる
    pub fn project(
        destinations: Vec<Destination>,
        favorite_ids: &BTreeSet<DestinationId>,
    ) -> Vec<Self> {
        destinations
            .into_iter()
            .map(|d| {
                let is_favorite = favorite_ids.contains(&d.id);
                Self::new(d, is_favorite)
            })
            .collect()
    }

    pub fn with_favorite(&self, is_favorite: bool) -> Self {
        Self {
            destination: self.destination.clone(),
            is_favorite,
        }
    }
}
