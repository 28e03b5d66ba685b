//! Service layer holding the key-value store.
//! - `store::KeyValueStore` is the operation contract the HTTP layer calls.
//! - `store::memory::InMemoryStore` is the lock-guarded in-memory implementation.

pub mod errors;
pub mod store;
