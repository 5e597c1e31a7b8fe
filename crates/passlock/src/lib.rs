//! passlock: password-based encryption into a single self-contained blob
//!
//! Architecture: scrypt-derived key, AES-256-GCM, everything needed for
//! decryption carried inside the output.
//!
//! Pipeline:
//! ```text
//! encrypt: random salt → scrypt(password, salt) → random nonce → AES-256-GCM seal → nonce ‖ ct ‖ tag ‖ salt
//! decrypt: split salt → scrypt(password, salt) → split nonce → AES-256-GCM open → plaintext
//! ```
//!
//! Blob layout:
//! ```text
//! [12 bytes: nonce][N bytes: ciphertext][16 bytes: GCM tag][32 bytes: scrypt salt]
//! ```
//!
//! The key is fresh for every call (fresh salt), so a random 96-bit nonce can
//! never repeat under the same key.

pub mod blob;
pub mod cipher;
pub mod error;
pub mod kdf;
pub mod lock;

pub use blob::Blob;
pub use error::{PasslockError, PasslockResult};
pub use kdf::{derive_key, DerivedKey};
pub use lock::{decrypt, encrypt};

/// Size of a derived AES key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of the scrypt salt stored at the tail of every blob
pub const SALT_SIZE: usize = 32;

/// Fixed bytes every blob carries on top of the ciphertext
pub const BLOB_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE + SALT_SIZE;

/// Length of the blob produced for a plaintext of `plaintext_len` bytes.
pub const fn encrypted_len(plaintext_len: usize) -> usize {
    plaintext_len + BLOB_OVERHEAD
}
