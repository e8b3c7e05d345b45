//! State holders that sit between the directory's stores and whatever
//! renders them.

pub mod event;
pub mod favorites;
pub mod model;
pub mod state;

pub use event::{EventQueue, UiEvent};
pub use favorites::FavoritesController;
pub use model::UiDestination;
pub use state::{StateHolder, UiLoadState};
