use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub const ACCESS_TOKEN_KEY: &str = "access";
pub const REFRESH_TOKEN_KEY: &str = "refresh";

/// Persistence for the credential pair under its two well-known keys.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn save(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        self.storage.set_all(&[
            (ACCESS_TOKEN_KEY, pair.access.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh.as_str()),
        ])
    }

    /// Replaces the access token and leaves the refresh token alone.
    pub fn save_access(&self, access: &AccessToken) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, access.as_str())
    }

    pub fn read(&self) -> Result<StoredCredentials, StorageError> {
        Ok(StoredCredentials {
            access: self.access_token()?,
            refresh: self.storage.get(REFRESH_TOKEN_KEY)?.map(RefreshToken),
        })
    }

    pub fn access_token(&self) -> Result<Option<AccessToken>, StorageError> {
        Ok(self.storage.get(ACCESS_TOKEN_KEY)?.map(AccessToken))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_all(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryStore;

    fn store() -> (TokenStore, Arc<MemoryStore>) {
        let memory = Arc::new(MemoryStore::new());
        (TokenStore::new(memory.clone()), memory)
    }

    #[test]
    fn save_then_read() {
        let (tokens, _) = store();
        tokens.save(&CredentialPair::new("a1", "r1")).unwrap();

        let read = tokens.read().unwrap();
        assert_eq!(read.access, Some(AccessToken("a1".into())));
        assert_eq!(read.refresh, Some(RefreshToken("r1".into())));
    }

    #[test]
    fn read_reports_halves_independently() {
        let (tokens, memory) = store();
        memory.set(REFRESH_TOKEN_KEY, "r1").unwrap();

        let read = tokens.read().unwrap();
        assert_eq!(read.access, None);
        assert_eq!(read.refresh, Some(RefreshToken("r1".into())));
    }

    #[test]
    fn save_access_keeps_refresh() {
        let (tokens, _) = store();
        tokens.save(&CredentialPair::new("a1", "r1")).unwrap();
        tokens.save_access(&AccessToken("a2".into())).unwrap();

        let read = tokens.read().unwrap();
        assert_eq!(read.access, Some(AccessToken("a2".into())));
        assert_eq!(read.refresh, Some(RefreshToken("r1".into())));
    }

    #[test]
    fn clear_is_idempotent() {
        let (tokens, memory) = store();
        tokens.clear().unwrap();

        tokens.save(&CredentialPair::new("a1", "r1")).unwrap();
        memory.set("theme", "dark").unwrap();
        tokens.clear().unwrap();
        tokens.clear().unwrap();

        assert!(tokens.read().unwrap().is_empty());
        assert_eq!(memory.get("theme").unwrap().as_deref(), Some("dark"));
    }
}
