use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};
use rand::RngCore;
use zeroize::Zeroizing;

use super::MasterKey;
use crate::error::VaultError;

/// Token format version, also bound as associated data.
const TOKEN_VERSION: u8 = 1;

/// Nonce length for XChaCha20-Poly1305.
const NONCE_LEN: usize = 24;

/// Poly1305 tag length.
const TAG_LEN: usize = 16;

/// Authenticated encryption bound to a single `MasterKey`.
///
/// Tokens are `base64url(version || nonce || ciphertext+tag)`, safe to store
/// in a text column.
#[derive(Clone)]
pub struct Cipher {
    aead: XChaCha20Poly1305,
}

impl Cipher {
    pub fn new(key: &MasterKey) -> Self {
        Self {
            aead: XChaCha20Poly1305::new(key.as_bytes().into()),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .aead
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &[TOKEN_VERSION],
                },
            )
            .map_err(|_| VaultError::Validation("password is too long to encrypt".to_string()))?;

        let mut token = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        token.push(TOKEN_VERSION);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    pub fn decrypt(&self, token: &str) -> Result<String, VaultError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| VaultError::Decryption)?;
        if raw.len() < 1 + NONCE_LEN + TAG_LEN || raw[0] != TOKEN_VERSION {
            return Err(VaultError::Decryption);
        }

        let (nonce, ciphertext) = raw[1..].split_at(NONCE_LEN);
        let plaintext = Zeroizing::new(
            self.aead
                .decrypt(
                    XNonce::from_slice(nonce),
                    Payload {
                        msg: ciphertext,
                        aad: &[TOKEN_VERSION],
                    },
                )
                .map_err(|_| VaultError::Decryption)?,
        );

        std::str::from_utf8(&plaintext)
            .map(str::to_owned)
            .map_err(|_| VaultError::Decryption)
    }
}
