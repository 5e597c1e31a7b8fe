//! AES-256-GCM sealing and opening
//!
//! Sealed format:
//! ```text
//! [N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No associated data is bound; the nonce is carried separately by the blob.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use crate::error::{PasslockError, PasslockResult};
use crate::kdf::DerivedKey;
use crate::NONCE_SIZE;

/// Draw a fresh 96-bit nonce from the OS random source.
pub fn random_nonce() -> PasslockResult<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.try_fill_bytes(&mut nonce)?;
    Ok(nonce)
}

/// Encrypt `plaintext` with AES-256-GCM.
///
/// Returns: `[ciphertext][16-byte tag]`
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> PasslockResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    // only fails when the plaintext exceeds the GCM length limit
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| PasslockError::InvalidInput("plaintext too large for AES-GCM"))
}

/// Decrypt and verify `[ciphertext][16-byte tag]` with AES-256-GCM.
///
/// Every failure, including input too short to hold a tag, is reported as
/// [`PasslockError::Authentication`] and yields no plaintext.
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    sealed: &[u8],
) -> PasslockResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| PasslockError::Authentication)
}
