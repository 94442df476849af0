use serde::Serialize;
use tracing::{debug, info};

use crate::auth::Unlocked;
use crate::config::Config;
use crate::crypto::{Cipher, KeyManager};
use crate::db::RecordStore;
use crate::error::VaultError;

/// Widest `site`/`user` value accepted.
pub const MAX_FIELD_CHARS: usize = 100;

/// A decrypted lookup result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Entry {
    pub site: String,
    pub user: String,
    pub password: String,
}

/// Controller layer: validates input, passes passwords through the cipher,
/// and drives the record store.
#[derive(Clone)]
pub struct VaultOps {
    store: RecordStore,
    cipher: Cipher,
}

impl VaultOps {
    /// Load the key, build the cipher and open the store. Consumes the gate's
    /// `Unlocked` token, so nothing below is reachable before authentication.
    pub async fn open(_unlocked: Unlocked, cfg: &Config) -> Result<Self, VaultError> {
        let key = KeyManager::obtain_key(&cfg.key_file)?;
        let cipher = Cipher::new(&key);
        let store = RecordStore::connect(&cfg.database_url).await?;
        info!(key_file = %cfg.key_file.display(), "vault opened");
        Ok(Self { store, cipher })
    }

    pub fn with_parts(_unlocked: Unlocked, store: RecordStore, cipher: Cipher) -> Self {
        Self { store, cipher }
    }

    pub async fn add_entry(&self, site: &str, user: &str, password: &str) -> Result<(), VaultError> {
        require_field(site)?;
        require_field(user)?;
        require_field(password)?;
        require_width("site", site)?;
        require_width("user", user)?;

        let token = self.cipher.encrypt(password)?;
        let id = self.store.create(site, user, &token).await?;
        debug!(id, "entry added");
        Ok(())
    }

    pub async fn search_entry(&self, site: &str) -> Result<Entry, VaultError> {
        require_field(site)?;
        let record = self
            .store
            .find_by_site(site)
            .await?
            .ok_or_else(|| VaultError::NotFound(site.to_string()))?;
        let password = self.cipher.decrypt(&record.password)?;
        Ok(Entry {
            site: record.site,
            user: record.user,
            password,
        })
    }

    pub async fn update_entry(&self, site: &str, new_password: &str) -> Result<(), VaultError> {
        require_field(site)?;
        require_field(new_password)?;

        let token = self.cipher.encrypt(new_password)?;
        if !self.store.update_password(site, &token).await? {
            return Err(VaultError::NotFound(site.to_string()));
        }
        debug!("entry password updated");
        Ok(())
    }

    pub async fn delete_entry(&self, site: &str) -> Result<(), VaultError> {
        require_field(site)?;
        if !self.store.delete(site).await? {
            return Err(VaultError::NotFound(site.to_string()));
        }
        debug!("entry deleted");
        Ok(())
    }

    pub async fn entry_count(&self) -> Result<i64, VaultError> {
        self.store.count().await
    }
}

fn require_field(value: &str) -> Result<(), VaultError> {
    if value.trim().is_empty() {
        return Err(VaultError::blank_field());
    }
    Ok(())
}

fn require_width(name: &str, value: &str) -> Result<(), VaultError> {
    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(VaultError::Validation(format!(
            "{name} must be at most {MAX_FIELD_CHARS} characters."
        )));
    }
    Ok(())
}
