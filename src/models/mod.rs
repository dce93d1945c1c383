pub mod enums;
pub mod message;
pub mod user;

pub use enums::*;
pub use message::{ChatMessage, MessageRole};
pub use user::UserProfile;
