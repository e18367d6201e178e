// OAEP Padding
// EME-OAEP encoding and decoding (RFC 8017, section 7.1) with SHA-256 as
// both the label digest and the MGF1 hash

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::error::{Error, Result};

/// SHA-256 output length in bytes
pub const HASH_LEN: usize = 32;

/// Largest message that fits a `key_size`-byte modulus: k - 2*hLen - 2
pub fn max_message_len(key_size: usize) -> Option<usize> {
    key_size.checked_sub(2 * HASH_LEN + 2)
}

/// MGF1 with SHA-256, XORed into `out`
fn mgf1_xor(out: &mut [u8], seed: &[u8]) {
    for (counter, chunk) in out.chunks_mut(HASH_LEN).enumerate() {
        let mask = Sha256::new()
            .chain_update(seed)
            .chain_update((counter as u32).to_be_bytes())
            .finalize();
        for (byte, m) in chunk.iter_mut().zip(mask.iter()) {
            *byte ^= m;
        }
    }
}

/// Encode `message` into a `key_size`-byte block
/// Format: 0x00 || maskedSeed || maskedDB, DB = lHash || PS || 0x01 || M
pub fn pad_oaep<R: RngCore + ?Sized>(
    rng: &mut R,
    message: &[u8],
    label: &[u8],
    key_size: usize,
) -> Result<Vec<u8>> {
    let max = max_message_len(key_size).ok_or_else(|| {
        Error::EncryptionFailed(format!("{key_size}-byte modulus is too small for OAEP"))
    })?;
    if message.len() > max {
        return Err(Error::EncryptionFailed(format!(
            "payload too large: max {max} bytes, got {}",
            message.len()
        )));
    }

    let mut em = vec![0u8; key_size];
    let (seed, db) = em[1..].split_at_mut(HASH_LEN);
    rng.fill_bytes(seed);

    let db_len = db.len();
    db[..HASH_LEN].copy_from_slice(&Sha256::digest(label));
    db[db_len - message.len() - 1] = 0x01;
    db[db_len - message.len()..].copy_from_slice(message);

    mgf1_xor(db, seed);
    mgf1_xor(seed, db);

    Ok(em)
}

/// Decode a `key_size`-byte block produced by [`pad_oaep`]
///
/// Every structural check is evaluated before the single pass/fail decision
/// so the failure mode does not depend on which check went wrong.
pub fn unpad_oaep(mut em: Vec<u8>, label: &[u8]) -> Result<Vec<u8>> {
    if em.len() < 2 * HASH_LEN + 2 {
        return Err(Error::DecryptionFailed);
    }

    let (y, rest) = em.split_at_mut(1);
    let (seed, db) = rest.split_at_mut(HASH_LEN);
    mgf1_xor(seed, db);
    mgf1_xor(db, seed);

    let l_hash = Sha256::digest(label);
    let leading_zero = y[0].ct_eq(&0u8);
    let hash_matches = db[..HASH_LEN].ct_eq(&l_hash[..]);

    let mut looking = Choice::from(1u8);
    let mut separator = 0u32;
    let mut stray = Choice::from(0u8);
    for (i, byte) in db[HASH_LEN..].iter().enumerate() {
        let is_zero = byte.ct_eq(&0u8);
        let is_one = byte.ct_eq(&1u8);
        separator.conditional_assign(&(i as u32), looking & is_one);
        looking &= !is_one;
        stray |= looking & !is_zero;
    }

    let valid = leading_zero & hash_matches & !stray & !looking;
    if !bool::from(valid) {
        return Err(Error::DecryptionFailed);
    }

    Ok(db[HASH_LEN + separator as usize + 1..].to_vec())
}
