pub mod identity;
pub mod session_store;

pub use identity::CurrentUser;
pub use session_store::{FileSessionStore, SessionStore};
