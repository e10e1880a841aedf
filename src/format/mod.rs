//! Wire format of a BIP38 encrypted key.
//!
//! ```text
//! PREFIX (2) | FLAG (1) | SALT (4) | ENCRYPTED_HALF1 (16) | ENCRYPTED_HALF2 (16) | CHECKSUM (4)
//! ```
//!
//! The whole 43 byte sequence is Base58 encoded.

use crate::crypto::{CHECKSUM_LEN, HALF_LEN, SALT_LEN};
use crate::error::FormatError;

pub mod payload;

pub use payload::EncryptedPayload;

/// Prefix of all non-EC-multiply encrypted keys (`0x01 0x42`).
pub const PREFIX_NON_EC: [u8; 2] = [0x01, 0x42];
/// Length of prefix.
pub const PREFIX_LEN: usize = 2;
/// Length of flag byte.
pub const FLAG_LEN: usize = 1;
/// Non-EC-multiply, uncompressed public key.
pub const FLAG_NON_EC: u8 = 0xc0;

/// Length of the payload without its checksum.
pub const PAYLOAD_LEN: usize = PREFIX_LEN + FLAG_LEN + SALT_LEN + 2 * HALF_LEN;
/// Length of the payload including its checksum.
pub const FRAMED_LEN: usize = PAYLOAD_LEN + CHECKSUM_LEN;

/// Base58Check encodes: appends the first four bytes of double SHA-256.
pub fn encode_base58(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Base58 decodes, verifies and strips the checksum.
///
/// # Errors
///
/// Returns an error if:
/// - The string is not Base58
/// - The checksum does not match
/// - The decoded length is not [`FRAMED_LEN`]
pub fn decode_base58(s: &str) -> Result<Vec<u8>, FormatError> {
    let data = bs58::decode(s.trim())
        .with_check(None)
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidChecksum { .. } => FormatError::Checksum,
            _ => FormatError::Base58,
        })?;

    if data.len() != PAYLOAD_LEN {
        return Err(FormatError::Length {
            expected: FRAMED_LEN,
            actual: data.len() + CHECKSUM_LEN,
        });
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lengths() {
        assert_eq!(PAYLOAD_LEN, 39);
        assert_eq!(FRAMED_LEN, 43);
    }

    #[test]
    fn checksum_is_double_sha256_prefix() {
        let payload = [7u8; PAYLOAD_LEN];
        let raw = bs58::decode(encode_base58(&payload)).into_vec().unwrap();

        assert_eq!(raw.len(), FRAMED_LEN);
        assert_eq!(&raw[..PAYLOAD_LEN], &payload[..]);
        assert_eq!(
            &raw[PAYLOAD_LEN..],
            &crate::crypto::double_sha256(&payload)[..CHECKSUM_LEN]
        );
    }

    #[test]
    fn decode_strips_checksum() {
        let payload = [3u8; PAYLOAD_LEN];
        let decoded = decode_base58(&encode_base58(&payload)).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decode_rejects_bad_checksum() {
        let mut framed = vec![3u8; PAYLOAD_LEN];
        framed.extend_from_slice(&[0, 0, 0, 0]);
        let s = bs58::encode(framed).into_string();

        assert_eq!(decode_base58(&s), Err(FormatError::Checksum));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let s = encode_base58(&[1u8; 10]);
        assert_eq!(
            decode_base58(&s),
            Err(FormatError::Length {
                expected: FRAMED_LEN,
                actual: 14
            })
        );
    }

    #[test]
    fn decode_rejects_input_shorter_than_checksum() {
        let s = bs58::encode([1u8, 2, 3]).into_string();
        assert_eq!(decode_base58(&s), Err(FormatError::Base58));
    }

    #[test]
    fn decode_rejects_non_base58() {
        assert_eq!(decode_base58("0OIl"), Err(FormatError::Base58));
    }
}
