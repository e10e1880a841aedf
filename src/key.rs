//! Private key representation and address derivation.

use std::fmt;

use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;
use crate::error::KeyError;

/// Version byte of a mainnet WIF private key.
pub const WIF_VERSION: u8 = 0x80;
/// Version byte of a mainnet pay-to-pubkey-hash address.
pub const P2PKH_VERSION: u8 = 0x00;

const WIF_COMPRESSED_SUFFIX: u8 = 0x01;

/// A secp256k1 private key.
///
/// The scalar is erased when the key is dropped.
#[derive(PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8; KEY_LEN]) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::OutOfRange)?;
        Ok(Self { secret })
    }

    /// Parses a 64 character hex string.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        hex::decode_to_slice(s.trim(), &mut bytes[..]).map_err(|_| KeyError::Hex)?;
        Self::from_bytes(&bytes)
    }

    /// Parses a mainnet WIF string.
    ///
    /// Both the uncompressed and the compressed form are accepted; the
    /// compression marker is not kept.
    pub fn from_wif(s: &str) -> Result<Self, KeyError> {
        let data = Zeroizing::new(
            bs58::decode(s.trim())
                .with_check(None)
                .into_vec()
                .map_err(|_| KeyError::Wif)?,
        );

        let body = match data.len() {
            33 => &data[1..],
            34 if data[33] == WIF_COMPRESSED_SUFFIX => &data[1..33],
            _ => return Err(KeyError::Wif),
        };
        if data[0] != WIF_VERSION {
            return Err(KeyError::Wif);
        }

        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(body);
        Self::from_bytes(&bytes)
    }

    /// Parses either hex or WIF, picked by the input length.
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        if s.trim().len() == KEY_LEN * 2 {
            Self::from_hex(s)
        } else {
            Self::from_wif(s)
        }
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; KEY_LEN]> {
        Zeroizing::new(self.secret.secret_bytes())
    }

    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// Uncompressed mainnet WIF.
    pub fn to_wif(&self) -> Zeroizing<String> {
        let mut data = Zeroizing::new(Vec::with_capacity(1 + KEY_LEN));
        data.push(WIF_VERSION);
        data.extend_from_slice(self.to_bytes().as_slice());
        Zeroizing::new(bs58::encode(data.as_slice()).with_check().into_string())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key(&Secp256k1::signing_only(), &self.secret)
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// Derives the address whose hash becomes the BIP38 salt.
pub trait AddressScheme: fmt::Debug + Send + Sync {
    fn address(&self, key: &PrivateKey) -> String;
}

/// Base58Check P2PKH address of the uncompressed public key.
///
/// This is the address the 0xC0 flag byte commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P2pkhAddress {
    version: u8,
}

impl P2pkhAddress {
    pub fn new(version: u8) -> Self {
        Self { version }
    }
}

impl Default for P2pkhAddress {
    fn default() -> Self {
        Self::new(P2PKH_VERSION)
    }
}

impl AddressScheme for P2pkhAddress {
    fn address(&self, key: &PrivateKey) -> String {
        let pubkey = key.public_key().serialize_uncompressed();
        let hash = Ripemd160::digest(Sha256::digest(pubkey));

        let mut payload = Vec::with_capacity(1 + hash.len());
        payload.push(self.version);
        payload.extend_from_slice(&hash);
        bs58::encode(payload).with_check().into_string()
    }
}
