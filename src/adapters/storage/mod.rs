//! Storage Adapters
//!
//! Implementations of the `RecordStore` port behind the local gateway.
//!
//! ## Available Adapters
//!
//! - **JsonFileStore** - One JSON array file per resource kind
//! - **InMemoryRecordStore** - Records in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{JsonFileStore, InMemoryRecordStore};
//!
//! // Production: file-based storage
//! let store = JsonFileStore::new("./data");
//!
//! // Testing: in-memory storage
//! let store = InMemoryRecordStore::new();
//! ```

mod in_memory_store;
mod json_file_store;

pub use in_memory_store::InMemoryRecordStore;
pub use json_file_store::JsonFileStore;
