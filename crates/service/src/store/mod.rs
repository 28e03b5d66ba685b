use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod memory;

pub use memory::InMemoryStore;

/// Operations over a string-to-string mapping.
/// Implementations must be safe to share between concurrent callers; each
/// call is atomic on its own and never creates a key except at construction.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Every current key, in no particular order. Empty when the store is empty.
    async fn list_keys(&self) -> Vec<String>;
    async fn get(&self, key: &str) -> Result<String, StoreError>;
    /// Replace the value of an existing key, returning `{key: value}`.
    /// A missing key is `NotFound`; it is never inserted.
    async fn update(
        &self,
        key: &str,
        value: String,
    ) -> Result<HashMap<String, String>, StoreError>;
    /// Remove an existing key, returning it.
    async fn delete(&self, key: &str) -> Result<String, StoreError>;
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
