use std::fmt;
use std::str::FromStr;

use tracing::debug;
use zeroize::Zeroizing;

use super::{DERIVED_LEN, HALF_LEN, KEY_LEN, SALT_LEN};
use crate::error::{Bip38Error, Result};

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // N = 16384
            log_n: 14,
            r: 8,
            p: 8,
        }
    }
}

impl KdfParams {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self> {
        let params = Self { log_n, r, p };
        params.validate()?;
        Ok(params)
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    /// Whether these are the cost parameters every BIP38 implementation uses.
    pub fn is_standard(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_n < 1 {
            return Err(config_error("scrypt log_n must be >= 1"));
        }
        if self.r < 1 {
            return Err(config_error("scrypt block size must be >= 1"));
        }
        if self.p < 1 {
            return Err(config_error("scrypt parallelism must be >= 1"));
        }
        self.to_scrypt().map(|_| ())
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        scrypt::Params::new(self.log_n, self.r, self.p, DERIVED_LEN).map_err(|e| {
            Bip38Error::Configuration(format!(
                "invalid scrypt parameters (log_n={}, r={}, p={}): {e}",
                self.log_n, self.r, self.p
            ))
        })
    }
}

fn config_error(msg: &str) -> Bip38Error {
    Bip38Error::Configuration(msg.to_string())
}

/// 64 bytes of key material, cleared on drop.
///
/// Bytes 0..32 are XOR material for the two private key halves, bytes 32..64
/// are the AES-256 key.
pub struct DerivedKey {
    xor: Zeroizing<[[u8; HALF_LEN]; 2]>,
    cipher_key: Zeroizing<[u8; KEY_LEN]>,
}

impl DerivedKey {
    fn split(raw: &[u8; DERIVED_LEN]) -> Self {
        let mut xor = Zeroizing::new([[0u8; HALF_LEN]; 2]);
        let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
        xor[0].copy_from_slice(&raw[..HALF_LEN]);
        xor[1].copy_from_slice(&raw[HALF_LEN..KEY_LEN]);
        cipher_key.copy_from_slice(&raw[KEY_LEN..]);
        Self { xor, cipher_key }
    }

    /// XOR material for the first (`0`) or second (`1`) private key half.
    pub fn xor_half(&self, index: usize) -> &[u8; HALF_LEN] {
        &self.xor[index]
    }

    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// A memory-hard passphrase derivation.
///
/// Implementations must be deterministic and produce the same output for the
/// same passphrase, salt and cost parameters.
pub trait Kdf: fmt::Debug + Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &'static str;

    fn params(&self) -> KdfParams;

    fn derive(&self, passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Result<DerivedKey>;
}

/// scrypt from the RustCrypto `scrypt` crate.
#[derive(Debug, Clone)]
pub struct ScryptKdf {
    params: KdfParams,
    scrypt: scrypt::Params,
}

impl ScryptKdf {
    pub fn new(params: KdfParams) -> Result<Self> {
        let scrypt = params.to_scrypt()?;
        Ok(Self { params, scrypt })
    }
}

impl Kdf for ScryptKdf {
    fn name(&self) -> &'static str {
        "scrypt"
    }

    fn params(&self) -> KdfParams {
        self.params
    }

    fn derive(&self, passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Result<DerivedKey> {
        debug!(
            log_n = self.params.log_n,
            r = self.params.r,
            p = self.params.p,
            "deriving key material"
        );

        let mut out = Zeroizing::new([0u8; DERIVED_LEN]);
        scrypt::scrypt(passphrase, salt, &self.scrypt, &mut out[..])
            .map_err(|e| Bip38Error::Configuration(format!("scrypt derivation failed: {e}")))?;

        Ok(DerivedKey::split(&out))
    }
}

/// Selects which [`Kdf`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum KdfBackend {
    #[default]
    Scrypt,
}

impl KdfBackend {
    pub fn build(self, params: KdfParams) -> Result<Box<dyn Kdf>> {
        match self {
            KdfBackend::Scrypt => Ok(Box::new(ScryptKdf::new(params)?)),
        }
    }
}

impl FromStr for KdfBackend {
    type Err = Bip38Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "scrypt" | "rustcrypto" => Ok(KdfBackend::Scrypt),
            other => Err(Bip38Error::Configuration(format!(
                "unknown key derivation backend '{other}'"
            ))),
        }
    }
}
