use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key was absent at the moment of the check.
    #[error("Key does not exist")]
    NotFound,
}
