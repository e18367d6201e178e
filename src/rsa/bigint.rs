// RSA Big Integer Operations
// Wrapper around num-bigint for the octet-string conversions of RFC 8017

use num_bigint::BigUint;
use num_traits::Zero;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from bytes (big-endian, OS2IP)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert a big integer to exactly `len` big-endian bytes (I2OSP)
/// Returns None if the value does not fit
pub fn to_bytes_padded(n: &RsaBigInt, len: usize) -> Option<Vec<u8>> {
    let mut out = vec![0u8; len];
    if n.is_zero() {
        return Some(out);
    }

    let raw = n.to_bytes_be();
    if raw.len() > len {
        return None;
    }
    out[len - raw.len()..].copy_from_slice(&raw);
    Some(out)
}

/// Number of bytes needed to hold the modulus
pub fn byte_len(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Modular exponentiation: base^exp mod modulus
/// Caller guarantees a non-zero modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    base.modpow(exp, modulus)
}
