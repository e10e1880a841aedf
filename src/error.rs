use thiserror::Error;

/// Errors returned by encryption and decryption.
#[derive(Debug, Error)]
pub enum Bip38Error {
    /// The key derivation backend could not be set up.
    #[error("key derivation unavailable: {0}")]
    Configuration(String),

    /// The encrypted key string is malformed.
    #[error("invalid encrypted key: {0}")]
    Format(#[from] FormatError),

    /// Salt verification failed after decryption.
    #[error("incorrect passphrase")]
    Passphrase,

    /// The private key input is malformed.
    #[error("invalid private key: {0}")]
    Key(#[from] KeyError),
}

/// Layout faults detected while decoding an encrypted key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("not valid base58")]
    Base58,
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("unsupported prefix {0:02x}{1:02x}")]
    Prefix(u8, u8),
    #[error("unsupported flag byte 0x{0:02x}")]
    Flag(u8),
    #[error("checksum mismatch")]
    Checksum,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("hex key must be 64 characters")]
    Hex,
    #[error("malformed WIF")]
    Wif,
    #[error("scalar is zero or not below the curve order")]
    OutOfRange,
}

pub type Result<T, E = Bip38Error> = std::result::Result<T, E>;
