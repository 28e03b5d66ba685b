use serde::Serialize;

/// Body of `GET /health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    /// Number of entries currently held by the store.
    pub keys: usize,
}
