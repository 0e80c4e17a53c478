//! Persistent symmetric key for the sealed cipher variant.

use chacha20poly1305::aead::{KeyInit, OsRng};
use chacha20poly1305::XChaCha20Poly1305;
use log::{error, info};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

pub const KEY_LEN: usize = 32;

#[derive(Clone)]
pub struct CipherKey([u8; KEY_LEN]);

impl CipherKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn generate() -> Self {
        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(key.as_slice());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Load the key at `path`, generating and persisting one if the file is absent.
    ///
    /// An unreadable or malformed key file is left untouched and an ephemeral key is used for
    /// this run, so a transient fault never overwrites the key earlier broadcasts depend on.
    pub fn load_or_generate(path: &Path) -> Self {
        if path.exists() {
            match fs::read(path) {
                Ok(bytes) if bytes.len() == KEY_LEN => {
                    let mut key = [0u8; KEY_LEN];
                    key.copy_from_slice(&bytes);
                    info!("🔑 Loaded cipher key from {}", path.display());
                    return Self(key);
                }
                Ok(bytes) => error!(
                    "❌ Cipher key at {} has {} bytes (expected {KEY_LEN}); using an ephemeral key",
                    path.display(),
                    bytes.len()
                ),
                Err(e) => error!(
                    "❌ Failed to read cipher key at {}: {e}; using an ephemeral key",
                    path.display()
                ),
            }
            return Self::generate();
        }

        let key = Self::generate();
        match persist_key(path, key.as_bytes()) {
            Ok(()) => info!("🔑 Generated new cipher key at {}", path.display()),
            Err(e) => error!("❌ Failed to persist cipher key to {}: {e}", path.display()),
        }
        key
    }
}

/// Write to a sibling temp file readable only by the owner, then rename over `path`
fn persist_key(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let written = options
        .open(&tmp)
        .and_then(|mut file| file.write_all(bytes).and_then(|()| file.sync_all()))
        .and_then(|()| fs::rename(&tmp, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}
