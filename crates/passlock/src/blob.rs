//! Blob codec: fixed-position framing of nonce, sealed ciphertext, and salt
//!
//! ```text
//! offset 0        12                 12+N        12+N+16      end
//!        [ nonce ][ ciphertext (N)  ][ GCM tag  ][ scrypt salt (32) ]
//! ```
//!
//! There are no length prefixes: the nonce and salt have fixed sizes at the
//! two ends and everything between them is ciphertext followed by its tag.

use crate::error::{PasslockError, PasslockResult};
use crate::{BLOB_OVERHEAD, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// A decoded view over a blob. Borrows the input; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob<'a> {
    nonce: &'a [u8; NONCE_SIZE],
    sealed: &'a [u8],
    salt: &'a [u8; SALT_SIZE],
}

impl<'a> Blob<'a> {
    /// Split a blob into its fields.
    ///
    /// Fails with [`PasslockError::MalformedBlob`] if `bytes` is shorter than
    /// the fixed overhead (nonce + tag + salt).
    pub fn parse(bytes: &'a [u8]) -> PasslockResult<Self> {
        let malformed = || PasslockError::MalformedBlob {
            len: bytes.len(),
            min: BLOB_OVERHEAD,
        };

        if bytes.len() < BLOB_OVERHEAD {
            return Err(malformed());
        }

        let (rest, salt) = bytes.split_at(bytes.len() - SALT_SIZE);
        let (nonce, sealed) = rest.split_at(NONCE_SIZE);

        Ok(Self {
            nonce: nonce.try_into().map_err(|_| malformed())?,
            sealed,
            salt: salt.try_into().map_err(|_| malformed())?,
        })
    }

    pub fn nonce(&self) -> &'a [u8; NONCE_SIZE] {
        self.nonce
    }

    /// Ciphertext with the GCM tag still attached, as `cipher::open` expects.
    pub fn sealed(&self) -> &'a [u8] {
        self.sealed
    }

    pub fn ciphertext(&self) -> &'a [u8] {
        &self.sealed[..self.sealed.len() - TAG_SIZE]
    }

    pub fn tag(&self) -> &'a [u8] {
        &self.sealed[self.sealed.len() - TAG_SIZE..]
    }

    pub fn salt(&self) -> &'a [u8; SALT_SIZE] {
        self.salt
    }

    /// Length of the plaintext this blob decrypts to.
    pub fn plaintext_len(&self) -> usize {
        self.sealed.len() - TAG_SIZE
    }

    /// Total encoded length.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        NONCE_SIZE + self.sealed.len() + SALT_SIZE
    }
}

/// Concatenate `nonce ‖ sealed ‖ salt` into a new blob.
pub fn encode(nonce: &[u8; NONCE_SIZE], sealed: &[u8], salt: &[u8; SALT_SIZE]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len() + SALT_SIZE);
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(sealed);
    blob.extend_from_slice(salt);
    blob
}
