//! Session lifecycle: load at startup, persist on login, clear on logout.

pub mod model;
pub mod store;
pub mod validation;

pub use model::Session;
pub use store::{SessionState, SessionStore};
