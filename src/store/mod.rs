//! Local persistence: four named keys, each holding one JSON document.
//!
//! The keys are kept verbatim from the original deployment so an exported
//! data directory stays readable. There is no header, version, or checksum;
//! a key either parses or it is treated as absent by the readers upstream.

use thiserror::Error;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Collection keys.
pub const CLUBS: &str = "unihub_clubs";
pub const EVENTS: &str = "unihub_events";
pub const NOTIFICATIONS: &str = "unihub_notifications";
/// First-visit flag, a bare boolean rather than an array.
pub const VISITED: &str = "unihub_visited";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The storage boundary the repository is injected with. Backends only
/// promise that a single `put` is atomic from the caller's perspective;
/// coordination across processes is explicitly out of scope.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
