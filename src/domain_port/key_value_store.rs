#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt storage: {0}")]
    Corrupt(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Profile-scoped string storage.
///
/// Reads are synchronous and cheap. Batched writes and removals must be
/// applied as a unit: a concurrent `get` sees either all of a batch or none
/// of it.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;
    /// Removing keys that are not present is not an error.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_all(&[(key, value)])
    }
}
