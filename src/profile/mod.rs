//! Profile cache: the authenticated user's profile, rebuilt from the backend
//! each session.

pub mod cache;
pub mod model;

pub use cache::ProfileCache;
pub use model::{Profile, ProfileUpdate};
