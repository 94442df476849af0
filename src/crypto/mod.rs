//! Key lifecycle and authenticated encryption of stored passwords.
//!
//! - `key_manager.rs`: load-or-generate the key file
//! - `cipher.rs`: XChaCha20-Poly1305 bound to one key, producing text tokens

pub mod cipher;
pub mod key_manager;

pub use cipher::Cipher;
pub use key_manager::{KEY_LEN, KeyManager, MasterKey};
