//! Symmetric encryption at rest for sensitive documents (patient data, scratch
//! exports).
//!
//! One key file per vault: loaded when present, generated and written
//! otherwise. Tokens are Fernet strings, so a vault can decrypt only what it
//! (or another holder of the same key file) encrypted.

use std::path::{Path, PathBuf};

use fernet::Fernet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("key file {path}: {source}")]
    KeyIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("key file {0} does not contain a valid key")]
    InvalidKey(PathBuf),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("token cannot be decrypted with this vault's key")]
    Decrypt,
    #[error("decrypted data is not valid UTF-8")]
    NotText,
}

/// A vault bound to one key file.
pub struct Vault {
    cipher: Fernet,
}

impl Vault {
    /// Opens the vault at `key_path`, generating and persisting a fresh key
    /// when the file does not exist yet.
    pub fn open(key_path: impl AsRef<Path>) -> Result<Self, VaultError> {
        let key_path = key_path.as_ref();
        let key = if key_path.exists() {
            std::fs::read_to_string(key_path).map_err(|source| VaultError::KeyIo {
                path: key_path.to_path_buf(),
                source,
            })?
        } else {
            let key = Fernet::generate_key();
            std::fs::write(key_path, &key).map_err(|source| VaultError::KeyIo {
                path: key_path.to_path_buf(),
                source,
            })?;
            key
        };
        let cipher = Fernet::new(key.trim())
            .ok_or_else(|| VaultError::InvalidKey(key_path.to_path_buf()))?;
        Ok(Self { cipher })
    }

    /// Encrypts a string, returning the token.
    pub fn lock(&self, data: &str) -> String {
        self.cipher.encrypt(data.as_bytes())
    }

    /// Decrypts a token produced by [`Vault::lock`].
    pub fn unlock(&self, token: &str) -> Result<String, VaultError> {
        let bytes = self.cipher.decrypt(token).map_err(|_| VaultError::Decrypt)?;
        String::from_utf8(bytes).map_err(|_| VaultError::NotText)
    }

    /// Encrypts `input` and writes the token to `output`.
    pub fn lock_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), VaultError> {
        let plain = std::fs::read(input)?;
        let token = self.cipher.encrypt(&plain);
        std::fs::write(output, token)?;
        Ok(())
    }

    /// Decrypts a token file written by [`Vault::lock_file`].
    pub fn unlock_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), VaultError> {
        let token = std::fs::read_to_string(input)?;
        let plain = self
            .cipher
            .decrypt(token.trim())
            .map_err(|_| VaultError::Decrypt)?;
        std::fs::write(output, plain)?;
        Ok(())
    }
}
