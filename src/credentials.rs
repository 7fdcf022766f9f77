//! Persistence for the Gemini API key.

use crate::models::Config;
use crate::store::KeyValueStore;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Store,
}

pub struct CredentialStore {
    store: KeyValueStore,
}

impl CredentialStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_store(KeyValueStore::open(dir)?))
    }

    pub fn from_store(store: KeyValueStore) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(CREDENTIAL_KEY)?
            .filter(|key| !key.trim().is_empty()))
    }

    pub fn set(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidInput("API key cannot be empty".to_string()));
        }
        self.store.set(CREDENTIAL_KEY, key)?;
        info!("Saved API key to {}", self.store.path().display());
        Ok(())
    }

    /// Returns whether a key was stored.
    pub fn clear(&self) -> Result<bool> {
        self.store.remove(CREDENTIAL_KEY)
    }

    /// Configured key first, then the stored one. There is no built-in fallback.
    pub fn resolve(&self, config: &Config) -> Result<(String, CredentialSource)> {
        if let Some(key) = config
            .gemini_api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
        {
            debug!("Using API key from environment");
            return Ok((key.trim().to_string(), CredentialSource::Environment));
        }

        match self.get()? {
            Some(key) => {
                debug!("Using API key from local store");
                Ok((key, CredentialSource::Store))
            }
            None => Err(Error::Config(
                "no Gemini API key found; set GEMINI_API_KEY or run `aiworx key set <KEY>`"
                    .to_string(),
            )),
        }
    }
}

/// Show only the ends of a key, e.g. `AIza…9xQw`.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_key(key: Option<&str>, dir: &Path) -> Config {
        let key = key.map(str::to_string);
        let data_dir = dir.to_string_lossy().to_string();
        Config::from_lookup(move |name| match name {
            "GEMINI_API_KEY" => key.clone(),
            "AIWORX_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_set_get_clear() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();

        assert_eq!(store.get().unwrap(), None);
        store.set("  stored-key ").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("stored-key"));

        assert!(store.clear().unwrap());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_set_rejects_empty_key() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        assert!(matches!(store.set("   "), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_key_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        CredentialStore::open(dir.path())
            .unwrap()
            .set("persisted")
            .unwrap();

        let reopened = CredentialStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get().unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_resolve_prefers_environment() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        store.set("stored").unwrap();

        let config = config_with_key(Some("from-env"), dir.path());
        assert_eq!(
            store.resolve(&config).unwrap(),
            ("from-env".to_string(), CredentialSource::Environment)
        );

        let config = config_with_key(None, dir.path());
        assert_eq!(
            store.resolve(&config).unwrap(),
            ("stored".to_string(), CredentialSource::Store)
        );
    }

    #[test]
    fn test_resolve_without_any_key_is_config_error() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open(dir.path()).unwrap();
        let config = config_with_key(None, dir.path());
        assert!(matches!(store.resolve(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("AIzaSyExample1234"), "AIza…1234");
    }
}
