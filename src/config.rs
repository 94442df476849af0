use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::VaultError;

pub const ENV_PREFIX: &str = "STRONGBOX_";

/// Runtime configuration, built once in `main` and passed down explicitly.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub key_file: PathBuf,
    /// Startup secret checked by the auth gate and the HTTP key check.
    pub master_key: String,
    pub listen_addr: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://strongbox.db".to_string(),
            key_file: PathBuf::from("encrypt_key.key"),
            master_key: String::new(),
            listen_addr: "127.0.0.1:8300".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("key_file", &self.key_file)
            .field("master_key", &"<redacted>")
            .field("listen_addr", &self.listen_addr)
            .field("loglevel", &self.loglevel)
            .finish()
    }
}

impl Config {
    /// Defaults overlaid with `STRONGBOX_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, VaultError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, VaultError> {
        let cfg: Config = figment.extract()?;
        if cfg.master_key.is_empty() {
            return Err(VaultError::Validation(format!(
                "{ENV_PREFIX}MASTER_KEY must be set to a non-empty value"
            )));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("STRONGBOX_MASTER_KEY", "hunter2");
            jail.set_env("STRONGBOX_DATABASE_URL", "sqlite://elsewhere.db");

            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.master_key, "hunter2");
            assert_eq!(cfg.database_url, "sqlite://elsewhere.db");
            assert_eq!(cfg.key_file, PathBuf::from("encrypt_key.key"));
            assert_eq!(cfg.listen_addr, "127.0.0.1:8300");
            Ok(())
        });
    }

    #[test]
    fn missing_master_key_is_rejected() {
        Jail::expect_with(|_jail| {
            let err = Config::load().unwrap_err();
            assert!(matches!(err, VaultError::Validation(_)));
            Ok(())
        });
    }

    #[test]
    fn debug_output_redacts_master_key() {
        let cfg = Config {
            master_key: "super-secret".to_string(),
            ..Config::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
