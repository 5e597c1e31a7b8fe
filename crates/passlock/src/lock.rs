//! Top-level password encryption: `encrypt` / `decrypt`

use crate::blob::{self, Blob};
use crate::cipher;
use crate::error::{PasslockError, PasslockResult};
use crate::kdf::{derive_key_with, KdfParams};

/// Encrypt `plaintext` under `password`.
///
/// A fresh salt and nonce are generated for every call, so encrypting the
/// same input twice yields different blobs.
///
/// Returns: `[12-byte nonce][ciphertext][16-byte tag][32-byte salt]`
pub fn encrypt(password: &[u8], plaintext: &[u8]) -> PasslockResult<Vec<u8>> {
    encrypt_with(&KdfParams::STANDARD, password, plaintext)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// Never returns plaintext unless the authentication tag verifies.
pub fn decrypt(password: &[u8], blob: &[u8]) -> PasslockResult<Vec<u8>> {
    decrypt_with(&KdfParams::STANDARD, password, blob)
}

pub(crate) fn encrypt_with(
    params: &KdfParams,
    password: &[u8],
    plaintext: &[u8],
) -> PasslockResult<Vec<u8>> {
    if password.is_empty() {
        return Err(PasslockError::InvalidInput("password is empty"));
    }
    if plaintext.is_empty() {
        return Err(PasslockError::InvalidInput("plaintext is empty"));
    }

    let (key, salt) = derive_key_with(params, password, None)?;
    let nonce = cipher::random_nonce()?;
    let sealed = cipher::seal(&key, &nonce, plaintext)?;
    let out = blob::encode(&nonce, &sealed, &salt);

    tracing::debug!(
        plaintext_len = plaintext.len(),
        blob_len = out.len(),
        "encrypted blob"
    );
    Ok(out)
}

pub(crate) fn decrypt_with(
    params: &KdfParams,
    password: &[u8],
    blob: &[u8],
) -> PasslockResult<Vec<u8>> {
    if password.is_empty() {
        return Err(PasslockError::InvalidInput("password is empty"));
    }
    if blob.is_empty() {
        return Err(PasslockError::InvalidInput("blob is empty"));
    }

    let parsed = Blob::parse(blob)?;
    let (key, _) = derive_key_with(params, password, Some(parsed.salt()))?;

    match cipher::open(&key, parsed.nonce(), parsed.sealed()) {
        Ok(plaintext) => {
            tracing::debug!(blob_len = blob.len(), "decrypted blob");
            Ok(plaintext)
        }
        Err(e) => {
            tracing::debug!(blob_len = blob.len(), "blob failed authentication");
            Err(e)
        }
    }
}
