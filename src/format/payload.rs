use tracing::trace;

use super::{FLAG_LEN, FLAG_NON_EC, PAYLOAD_LEN, PREFIX_LEN, PREFIX_NON_EC};
use crate::crypto::{HALF_LEN, SALT_LEN};
use crate::error::FormatError;

/// Parsed fields of an encrypted key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    flag: u8,
    salt: [u8; SALT_LEN],
    half1: [u8; HALF_LEN],
    half2: [u8; HALF_LEN],
}

impl EncryptedPayload {
    pub fn new(salt: [u8; SALT_LEN], half1: [u8; HALF_LEN], half2: [u8; HALF_LEN]) -> Self {
        Self {
            flag: FLAG_NON_EC,
            salt,
            half1,
            half2,
        }
    }

    pub fn flag(&self) -> u8 {
        self.flag
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn encrypted_half1(&self) -> &[u8; HALF_LEN] {
        &self.half1
    }

    pub fn encrypted_half2(&self) -> &[u8; HALF_LEN] {
        &self.half2
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PAYLOAD_LEN);

        buf.extend_from_slice(&PREFIX_NON_EC);
        buf.push(self.flag);
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.half1);
        buf.extend_from_slice(&self.half2);

        buf
    }

    /// Parses the 39 byte payload (no checksum).
    ///
    /// # Errors
    ///
    /// Returns an error if the length, prefix or flag byte is wrong.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() != PAYLOAD_LEN {
            return Err(FormatError::Length {
                expected: PAYLOAD_LEN,
                actual: data.len(),
            });
        }

        if data[..PREFIX_LEN] != PREFIX_NON_EC {
            return Err(FormatError::Prefix(data[0], data[1]));
        }

        let mut offset = PREFIX_LEN;
        let flag = data[offset];
        if flag != FLAG_NON_EC {
            return Err(FormatError::Flag(flag));
        }
        offset += FLAG_LEN;

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[offset..offset + SALT_LEN]);
        offset += SALT_LEN;

        let mut half1 = [0u8; HALF_LEN];
        half1.copy_from_slice(&data[offset..offset + HALF_LEN]);
        offset += HALF_LEN;

        let mut half2 = [0u8; HALF_LEN];
        half2.copy_from_slice(&data[offset..offset + HALF_LEN]);

        Ok(Self {
            flag,
            salt,
            half1,
            half2,
        })
    }

    /// Base58 string with the double SHA-256 checksum appended.
    pub fn to_base58(&self) -> String {
        super::encode_base58(&self.to_bytes())
    }

    /// Decodes a Base58 string, verifying the checksum before parsing.
    pub fn from_base58(s: &str) -> Result<Self, FormatError> {
        let data = super::decode_base58(s)?;
        let payload = Self::from_bytes(&data)?;
        trace!(flag = payload.flag, salt = %hex::encode(payload.salt), "parsed encrypted key");
        Ok(payload)
    }
}
