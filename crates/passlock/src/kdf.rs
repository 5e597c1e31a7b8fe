//! Key derivation: scrypt password → 256-bit AES key
//!
//! The cost parameters are part of the blob format: a blob carries no
//! parameter field, so encrypt and decrypt must agree on them at compile time.

use std::time::Instant;

use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use crate::error::{PasslockError, PasslockResult};
use crate::{KEY_SIZE, SALT_SIZE};

/// scrypt CPU/memory cost as a power of two (N = 2^20)
pub const SCRYPT_LOG_N: u8 = 20;

/// scrypt block size
pub const SCRYPT_R: u32 = 8;

/// scrypt parallelism
pub const SCRYPT_P: u32 = 1;

/// A 256-bit key derived from a password via scrypt.
///
/// Zeroized on drop to prevent secrets lingering in memory.
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// scrypt parameters for KDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N
    pub log_n: u8,
    /// Block size r
    pub r: u32,
    /// Parallelism p
    pub p: u32,
}

impl KdfParams {
    /// The only parameters blobs are ever produced or opened with.
    pub const STANDARD: KdfParams = KdfParams {
        log_n: SCRYPT_LOG_N,
        r: SCRYPT_R,
        p: SCRYPT_P,
    };

    /// The cost factor N.
    pub fn cost(&self) -> u64 {
        1u64 << self.log_n
    }

    /// Approximate scrypt working memory in bytes (128 · r · N).
    pub fn memory_bytes(&self) -> u64 {
        128 * u64::from(self.r) * self.cost()
    }
}

/// Fill a fresh salt from the OS random source.
pub fn random_salt() -> PasslockResult<[u8; SALT_SIZE]> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.try_fill_bytes(&mut salt)?;
    Ok(salt)
}

/// Derive a 256-bit key from a password using scrypt with the standard
/// parameters (N = 2^20, r = 8, p = 1).
///
/// When `salt` is `None` a new random salt is generated. The salt actually
/// used is returned next to the key so the caller can store it.
pub fn derive_key(
    password: &[u8],
    salt: Option<&[u8; SALT_SIZE]>,
) -> PasslockResult<(DerivedKey, [u8; SALT_SIZE])> {
    derive_key_with(&KdfParams::STANDARD, password, salt)
}

pub(crate) fn derive_key_with(
    params: &KdfParams,
    password: &[u8],
    salt: Option<&[u8; SALT_SIZE]>,
) -> PasslockResult<(DerivedKey, [u8; SALT_SIZE])> {
    let salt = match salt {
        Some(salt) => *salt,
        None => random_salt()?,
    };

    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_SIZE)
        .map_err(|e| PasslockError::KeyDerivation(format!("invalid scrypt params: {e}")))?;

    let started = Instant::now();
    // scrypt writes straight into the key so Drop wipes the only copy
    let mut key = DerivedKey::from_bytes([0u8; KEY_SIZE]);
    scrypt::scrypt(password, &salt, &scrypt_params, &mut key.bytes)
        .map_err(|e| PasslockError::KeyDerivation(format!("scrypt failed: {e}")))?;

    tracing::debug!(
        log_n = params.log_n,
        r = params.r,
        p = params.p,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "derived key"
    );

    Ok((key, salt))
}
