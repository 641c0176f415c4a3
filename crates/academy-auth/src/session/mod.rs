//! Single-session-per-account lifecycle.

pub mod cookie;
pub mod manager;

pub use cookie::SessionCookie;
pub use manager::{IssuedSession, SessionManager};
