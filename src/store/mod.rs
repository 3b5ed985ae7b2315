//! Durable client-side storage for the session credential and the last roadmap.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, load_json, save_json, storage_keys};
