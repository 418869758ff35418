//! Persistence for stories: one JSON array kept under a single key-value
//! slot, read and rewritten whole by every mutation.

pub mod config;
pub mod error;
pub mod slot;
pub mod store;

pub use config::{load_settings, prepare_database_url, StoreSettings};
pub use error::StoreError;
pub use slot::{KeyValueSlot, MemorySlot, SqliteSlot};
pub use store::{Clock, StoryStore, SystemClock, STORIES_KEY};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
