use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::KeyValueStore;
use crate::errors::StoreError;

/// In-memory key-value store.
/// Reads share the lock; `update` and `delete` take it exclusively, so the
/// existence check and the mutation happen under the same guard.
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self { inner: Arc::new(RwLock::new(entries.into_iter().collect())) }
    }

    pub async fn list_keys(&self) -> Vec<String> {
        let map = self.inner.read().await;
        map.keys().cloned().collect()
    }

    pub async fn get(&self, key: &str) -> Result<String, StoreError> {
        let map = self.inner.read().await;
        map.get(key).cloned().ok_or(StoreError::NotFound)
    }

    pub async fn update(
        &self,
        key: &str,
        value: String,
    ) -> Result<HashMap<String, String>, StoreError> {
        let mut map = self.inner.write().await;
        let slot = match map.get_mut(key) {
            Some(slot) => slot,
            None => {
                debug!(%key, "update on missing key");
                return Err(StoreError::NotFound);
            }
        };
        slot.clone_from(&value);
        drop(map);
        debug!(%key, "value updated");
        Ok(HashMap::from([(key.to_string(), value)]))
    }

    pub async fn delete(&self, key: &str) -> Result<String, StoreError> {
        let mut map = self.inner.write().await;
        match map.remove_entry(key) {
            Some((removed, _)) => {
                drop(map);
                debug!(%key, "key deleted");
                Ok(removed)
            }
            None => {
                debug!(%key, "delete on missing key");
                Err(StoreError::NotFound)
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn list_keys(&self) -> Vec<String> {
        self.list_keys().await
    }

    async fn get(&self, key: &str) -> Result<String, StoreError> {
        self.get(key).await
    }

    async fn update(
        &self,
        key: &str,
        value: String,
    ) -> Result<HashMap<String, String>, StoreError> {
        self.update(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<String, StoreError> {
        self.delete(key).await
    }

    async fn len(&self) -> usize {
        self.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded(pairs: &[(&str, &str)]) -> InMemoryStore {
        InMemoryStore::with_entries(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    fn abcde() -> InMemoryStore {
        seeded(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D"), ("e", "E")])
    }

    #[tokio::test]
    async fn empty_store_lists_no_keys() {
        let store = InMemoryStore::new();
        assert_eq!(store.list_keys().await, Vec::<String>::new());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_key_is_not_found_everywhere() {
        let store = abcde();
        assert_eq!(store.get("f").await, Err(StoreError::NotFound));
        assert_eq!(store.update("f", "F".into()).await, Err(StoreError::NotFound));
        assert_eq!(store.delete("f").await, Err(StoreError::NotFound));
        // update must not have created it
        assert_eq!(store.get("f").await, Err(StoreError::NotFound));
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn get_does_not_mutate() -> anyhow::Result<()> {
        let store = abcde();
        assert_eq!(store.get("b").await?, "B");
        assert_eq!(store.get("b").await?, "B");
        assert_eq!(store.len().await, 5);
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_existing_value() -> anyhow::Result<()> {
        let store = abcde();
        let updated = store.update("b", "b".into()).await?;
        assert_eq!(updated, HashMap::from([("b".to_string(), "b".to_string())]));
        assert_eq!(store.get("b").await?, "b");
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_key() -> anyhow::Result<()> {
        let store = abcde();
        assert_eq!(store.delete("c").await?, "c");
        assert_eq!(store.get("c").await, Err(StoreError::NotFound));
        assert_eq!(store.delete("c").await, Err(StoreError::NotFound));
        assert_eq!(store.len().await, 4);
        Ok(())
    }

    #[tokio::test]
    async fn seeded_scenario() -> anyhow::Result<()> {
        let store = seeded(&[("a", "A"), ("b", "B"), ("c", "C")]);

        let keys: HashSet<String> = store.list_keys().await.into_iter().collect();
        let expected: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(keys, expected);

        assert_eq!(store.get("b").await?, "B");
        assert_eq!(store.update("b", "b".into()).await?.get("b").map(String::as_str), Some("b"));
        assert_eq!(store.get("b").await?, "b");
        assert_eq!(store.delete("c").await?, "c");
        assert_eq!(store.get("c").await, Err(StoreError::NotFound));
        assert_eq!(store.update("f", "F".into()).await, Err(StoreError::NotFound));
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_the_same_map() -> anyhow::Result<()> {
        let store = seeded(&[("k", "v1")]);
        let other = store.clone();
        other.update("k", "v2".into()).await?;
        assert_eq!(store.get("k").await?, "v2");
        Ok(())
    }

    #[tokio::test]
    async fn works_through_trait_object() -> anyhow::Result<()> {
        let store: Arc<dyn KeyValueStore> = Arc::new(seeded(&[("x", "1")]));
        assert_eq!(store.get("x").await?, "1");
        assert!(!store.is_empty().await);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_gets_see_seeded_values() {
        let store = abcde();
        let mut handles = Vec::new();
        for (k, v) in [("a", "A"), ("d", "D"), ("e", "E")] {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..200 {
                    assert_eq!(store.get(k).await.as_deref(), Ok(v));
                }
            }));
        }
        for h in handles {
            h.await.expect("reader task");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_never_observe_torn_values() {
        // Every committed value is a run of one repeated character; a torn
        // read would show a mix.
        let initial = "a".repeat(64);
        let store = seeded(&[("k", initial.as_str()), ("other", "x")]);

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..500u32 {
                    let c = char::from(b'a' + (i % 26) as u8);
                    store.update("k", c.to_string().repeat(64)).await.expect("key present");
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..500 {
                    let v = store.get("k").await.expect("key present");
                    let first = v.chars().next().expect("non-empty");
                    assert_eq!(v.len(), 64);
                    assert!(v.chars().all(|c| c == first), "torn value: {v}");

                    let keys = store.list_keys().await;
                    assert_eq!(keys.len(), 2);
                }
            }));
        }

        writer.await.expect("writer task");
        for r in readers {
            r.await.expect("reader task");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deletes_succeed_exactly_once() {
        let store = seeded(&[("gone", "soon")]);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.delete("gone").await.is_ok() }));
        }
        let mut wins = 0;
        for h in handles {
            if h.await.expect("delete task") {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert!(store.is_empty().await);
    }
}
