//! Cryptographic primitives for BIP38.
//!
//! Provides scrypt key derivation, the per-half XOR and AES transform,
//! and the address hash used as salt.

pub mod cipher;
pub mod kdf;

use sha2::{Digest, Sha256};

pub use cipher::{Direction, transform_half};
pub use kdf::{DerivedKey, Kdf, KdfBackend, KdfParams, ScryptKdf};

/// Length of the address salt (4 bytes).
pub const SALT_LEN: usize = 4;
/// Length of one encrypted half (a single AES block).
pub const HALF_LEN: usize = 16;
/// Length of a raw private key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the scrypt output (64 bytes).
pub const DERIVED_LEN: usize = 64;
/// Length of a double-SHA-256 checksum.
pub const CHECKSUM_LEN: usize = 4;

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// Salt derived from the ASCII form of an address.
pub fn address_salt(address: &str) -> [u8; SALT_LEN] {
    let hash = double_sha256(address.as_bytes());
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&hash[..SALT_LEN]);
    salt
}
