use aes::Aes256;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray};
use zeroize::Zeroizing;

use super::{HALF_LEN, KEY_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

fn xor_in_place(block: &mut [u8; HALF_LEN], material: &[u8; HALF_LEN]) {
    for (b, m) in block.iter_mut().zip(material) {
        *b ^= m;
    }
}

/// Transforms one 16-byte half of a private key.
///
/// Encrypting XORs the half with `xor` and then runs one AES-256 block
/// encryption. Decrypting runs one AES-256 block decryption and then XORs.
/// Each half is an independent block; there is no IV or chaining.
///
/// The expanded key schedule and the returned block are wiped on drop.
pub fn transform_half(
    block: &[u8; HALF_LEN],
    xor: &[u8; HALF_LEN],
    key: &[u8; KEY_LEN],
    direction: Direction,
) -> Zeroizing<[u8; HALF_LEN]> {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    let mut buf = Zeroizing::new(*block);

    match direction {
        Direction::Encrypt => {
            xor_in_place(&mut buf, xor);
            cipher.encrypt_block(GenericArray::from_mut_slice(&mut buf[..]));
        }
        Direction::Decrypt => {
            cipher.decrypt_block(GenericArray::from_mut_slice(&mut buf[..]));
            xor_in_place(&mut buf, xor);
        }
    }

    buf
}
