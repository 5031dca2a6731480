pub mod guard;
pub mod health;
pub mod sessions;
pub mod status;
pub mod types;
pub mod users;

pub use self::types::{CurrentUser, UserResponse};
