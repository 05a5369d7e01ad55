//! Data models for stylemate entities.

mod message;
mod preference;
pub(crate) mod session;

pub use message::{Message, MessageRole};
pub use preference::StylePreference;
pub use session::{Session, DEFAULT_TITLE, WELCOME_TITLE};
