//! BIP38 passphrase protection of private keys (non-EC-multiply).
//!
//! ```no_run
//! use bip38crypt::{Bip38, PrivateKey};
//!
//! # fn main() -> bip38crypt::Result<()> {
//! let bip38 = Bip38::new()?;
//! let key = PrivateKey::from_wif("5KN7MzqK5wt2TP1fQCYyHBtDrXdJuXbUzm4A9rKAteGu3Qi5CVR")?;
//! let encrypted = bip38.encrypt(&key, "TestingOneTwoThree")?;
//! let decrypted = bip38.decrypt(&encrypted, "TestingOneTwoThree")?;
//! assert_eq!(decrypted, key);
//! # Ok(())
//! # }
//! ```

pub mod crypto;
mod error;
pub mod format;
mod key;

pub use crate::crypto::{Kdf, KdfBackend, KdfParams, ScryptKdf};
pub use crate::error::{Bip38Error, FormatError, KeyError, Result};
pub use crate::format::EncryptedPayload;
pub use crate::key::{AddressScheme, P2pkhAddress, PrivateKey};

use crate::crypto::{Direction, HALF_LEN, KEY_LEN, address_salt, transform_half};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Encrypts and decrypts private keys with a configured KDF and address
/// scheme.
///
/// Holds no per-call state; key material is derived again on every call.
#[derive(Debug)]
pub struct Bip38 {
    kdf: Box<dyn Kdf>,
    addresses: Box<dyn AddressScheme>,
}

impl Bip38 {
    /// scrypt with the standard cost parameters and mainnet P2PKH addresses.
    pub fn new() -> Result<Self> {
        Self::with_backend(KdfBackend::default(), KdfParams::default())
    }

    pub fn with_backend(backend: KdfBackend, params: KdfParams) -> Result<Self> {
        Ok(Self::with_kdf(backend.build(params)?))
    }

    pub fn with_kdf(kdf: Box<dyn Kdf>) -> Self {
        if !kdf.params().is_standard() {
            warn!(
                backend = kdf.name(),
                "non-standard KDF parameters; output is not interoperable with other BIP38 tools"
            );
        }
        Self {
            kdf,
            addresses: Box::new(P2pkhAddress::default()),
        }
    }

    pub fn with_address_scheme(mut self, addresses: Box<dyn AddressScheme>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn kdf(&self) -> &dyn Kdf {
        self.kdf.as_ref()
    }

    pub fn address(&self, key: &PrivateKey) -> String {
        self.addresses.address(key)
    }

    /// Encrypts `key`, salting with the address derived from it.
    pub fn encrypt(&self, key: &PrivateKey, passphrase: impl AsRef<[u8]>) -> Result<String> {
        let address = self.address(key);
        self.encrypt_with_address(key, &address, passphrase)
    }

    /// Encrypts `key` with a caller-supplied address.
    ///
    /// The address must be the one this instance's address scheme derives
    /// from `key`, otherwise decryption will report a wrong passphrase.
    pub fn encrypt_with_address(
        &self,
        key: &PrivateKey,
        address: &str,
        passphrase: impl AsRef<[u8]>,
    ) -> Result<String> {
        let salt = address_salt(address);
        let derived = self.kdf.derive(passphrase.as_ref(), &salt)?;
        let raw = key.to_bytes();

        let half1 = transform_half(
            &key_half(&raw, 0),
            derived.xor_half(0),
            derived.cipher_key(),
            Direction::Encrypt,
        );
        let half2 = transform_half(
            &key_half(&raw, 1),
            derived.xor_half(1),
            derived.cipher_key(),
            Direction::Encrypt,
        );

        debug!(salt = %hex::encode(salt), "encrypted private key");
        Ok(EncryptedPayload::new(salt, *half1, *half2).to_base58())
    }

    /// Decrypts an encrypted key string.
    ///
    /// # Errors
    ///
    /// - [`Bip38Error::Format`] if the string is not a well-formed
    ///   non-EC-multiply key
    /// - [`Bip38Error::Passphrase`] if the recovered key does not hash to the
    ///   embedded salt
    pub fn decrypt(&self, encrypted: &str, passphrase: impl AsRef<[u8]>) -> Result<PrivateKey> {
        let payload = EncryptedPayload::from_base58(encrypted)?;
        let derived = self.kdf.derive(passphrase.as_ref(), payload.salt())?;

        let half2 = transform_half(
            payload.encrypted_half2(),
            derived.xor_half(1),
            derived.cipher_key(),
            Direction::Decrypt,
        );
        let half1 = transform_half(
            payload.encrypted_half1(),
            derived.xor_half(0),
            derived.cipher_key(),
            Direction::Decrypt,
        );
        drop(derived);

        let mut candidate = Zeroizing::new([0u8; KEY_LEN]);
        candidate[..HALF_LEN].copy_from_slice(&half1[..]);
        candidate[HALF_LEN..].copy_from_slice(&half2[..]);

        let key = PrivateKey::from_bytes(&candidate).map_err(|_| {
            debug!("decrypted scalar is out of range");
            Bip38Error::Passphrase
        })?;

        if address_salt(&self.address(&key)) != *payload.salt() {
            debug!("salt verification failed");
            return Err(Bip38Error::Passphrase);
        }

        Ok(key)
    }
}

fn key_half(raw: &[u8; KEY_LEN], index: usize) -> Zeroizing<[u8; HALF_LEN]> {
    let mut half = Zeroizing::new([0u8; HALF_LEN]);
    half.copy_from_slice(&raw[index * HALF_LEN..(index + 1) * HALF_LEN]);
    half
}

/// Encrypts with the standard parameters.
pub fn encrypt(key: &PrivateKey, passphrase: impl AsRef<[u8]>) -> Result<String> {
    Bip38::new()?.encrypt(key, passphrase)
}

/// Decrypts with the standard parameters.
pub fn decrypt(encrypted: &str, passphrase: impl AsRef<[u8]>) -> Result<PrivateKey> {
    Bip38::new()?.decrypt(encrypted, passphrase)
}
