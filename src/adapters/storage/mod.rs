//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Stores sessions in memory (testing/development)
//! - **FileSessionStore** - Stores sessions as YAML files on disk
//! - **RedisSessionStore** - Stores sessions as JSON in Redis with optional TTL
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionStore, InMemorySessionStore};
//!
//! // Local development: file-based storage
//! let store = FileSessionStore::new("./data/sessions");
//!
//! // Testing: in-memory storage
//! let store = InMemorySessionStore::new();
//! ```

mod file_session_store;
mod in_memory_session_store;
mod redis_session_store;

pub use file_session_store::FileSessionStore;
pub use in_memory_session_store::InMemorySessionStore;
pub use redis_session_store::RedisSessionStore;
