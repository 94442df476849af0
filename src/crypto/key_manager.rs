use chrono::Utc;
use rand::RngCore;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::VaultError;

/// Key length required by XChaCha20-Poly1305 (256-bit).
pub const KEY_LEN: usize = 32;

/// The vault's symmetric key. Wiped from memory on drop.
pub struct MasterKey(Zeroizing<[u8; KEY_LEN]>);

impl MasterKey {
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        Self(bytes)
    }

    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.len() != KEY_LEN {
            return None;
        }
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(raw);
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// What was found at the key path.
enum KeyFile {
    Absent,
    Valid(MasterKey),
    Corrupt(usize),
}

pub struct KeyManager;

impl KeyManager {
    /// Load the key at `path`, creating it on first run.
    ///
    /// A file of the wrong length, or one that exists but cannot be read, is
    /// moved aside to `<path>.corrupt-<ts>` and replaced. I/O failures fall back to a fresh key persisted once more;
    /// only a failure of that second write is returned.
    pub fn obtain_key(path: &Path) -> Result<MasterKey, VaultError> {
        match Self::read_key_file(path) {
            Ok(KeyFile::Valid(key)) => {
                debug!(path = %path.display(), "existing encryption key loaded");
                Ok(key)
            }
            Ok(KeyFile::Absent) => {
                info!(path = %path.display(), "no encryption key found; creating a new one");
                Self::generate_and_persist(path)
            }
            Ok(KeyFile::Corrupt(len)) => {
                let backup = Self::quarantine(path);
                warn!(
                    path = %path.display(),
                    len,
                    backup = %backup.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<none>".to_string()),
                    "encryption key file has the wrong length; generating a new key, previously stored passwords will be unreadable"
                );
                Self::generate_and_persist(path)
            }
            Err(e) => {
                // a file we cannot read may still hold the only copy of the key
                let backup = fs::symlink_metadata(path)
                    .is_ok_and(|m| !m.is_dir())
                    .then(|| Self::quarantine(path))
                    .flatten();
                warn!(
                    path = %path.display(),
                    error = %e,
                    backup = %backup.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<none>".to_string()),
                    "unable to load encryption key; generating a new key, previously stored passwords will be unreadable"
                );
                Self::generate_and_persist(path)
            }
        }
    }

    fn read_key_file(path: &Path) -> io::Result<KeyFile> {
        let raw = match fs::read(path) {
            Ok(raw) => Zeroizing::new(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(KeyFile::Absent),
            Err(e) => return Err(e),
        };
        Ok(match MasterKey::from_bytes(&raw) {
            Some(key) => KeyFile::Valid(key),
            None => KeyFile::Corrupt(raw.len()),
        })
    }

    fn generate_and_persist(path: &Path) -> Result<MasterKey, VaultError> {
        let key = MasterKey::generate();
        if let Err(first) = Self::write_key_file(path, &key) {
            warn!(path = %path.display(), error = %first, "failed to persist encryption key; retrying");
            let key = MasterKey::generate();
            Self::write_key_file(path, &key).map_err(VaultError::KeyIo)?;
            info!(path = %path.display(), "new encryption key created");
            return Ok(key);
        }
        info!(path = %path.display(), "new encryption key created");
        Ok(key)
    }

    /// Atomic write: temp file, fsync, rename. The temp file is owner-only
    /// from creation and removed if any step fails.
    fn write_key_file(path: &Path, key: &MasterKey) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = Self::sibling(path, ".tmp");
        let result = Self::write_private(&tmp_path, key).and_then(|()| fs::rename(&tmp_path, path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn write_private(tmp_path: &Path, key: &MasterKey) -> io::Result<()> {
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
        }
        let mut file = opts.open(tmp_path)?;

        // mode() only applies on creation; a stale temp file keeps its old bits
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(key.as_bytes())?;
        file.sync_all()
    }

    fn quarantine(path: &Path) -> Option<PathBuf> {
        let backup = Self::sibling(path, &format!(".corrupt-{}", Utc::now().timestamp()));
        match fs::rename(path, &backup) {
            Ok(()) => Some(backup),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to back up key file");
                None
            }
        }
    }

    fn sibling(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}
