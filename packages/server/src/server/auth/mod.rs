// Session-based authentication
pub mod session;

pub use session::{Session, SessionStore};
