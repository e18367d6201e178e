// RSA Encryption Implementation
// Implements RSA encryption with OAEP (SHA-256) padding

use super::bigint::{from_bytes, mod_pow, to_bytes_padded};
use super::keys::RsaPublicKey;
use super::label::LabelPolicy;
use super::padding::pad_oaep;
use crate::error::{Error, Result};

/// Encrypt bytes using RSA public key under an explicit OAEP label
/// Returns ciphertext exactly `public_key.size()` bytes long
pub fn encrypt_bytes(
    plaintext: &[u8],
    public_key: &RsaPublicKey,
    label: &[u8],
) -> Result<Vec<u8>> {
    let key_bytes = public_key.size();
    let padded = pad_oaep(&mut rand::thread_rng(), plaintext, label, key_bytes)?;

    // The encoded block starts with 0x00, so m < n
    let m = from_bytes(&padded);
    let c = mod_pow(&m, &public_key.e, &public_key.n);

    to_bytes_padded(&c, key_bytes)
        .ok_or_else(|| Error::EncryptionFailed("ciphertext exceeds modulus size".to_string()))
}

/// Encrypt under the policy's current label
pub fn encrypt_oaep(
    plaintext: &[u8],
    public_key: &RsaPublicKey,
    labels: &LabelPolicy,
) -> Result<Vec<u8>> {
    encrypt_bytes(plaintext, public_key, labels.current())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::keys::load_public_key;

    fn alice() -> RsaPublicKey {
        load_public_key(include_bytes!("../../tests/fixtures/alice_public.pem")).unwrap()
    }

    #[test]
    fn test_ciphertext_is_key_sized() {
        let ciphertext = encrypt_oaep(b"hi", &alice(), &LabelPolicy::default()).unwrap();
        assert_eq!(ciphertext.len(), 256); // 2048 bits = 256 bytes
    }

    #[test]
    fn test_encrypt_is_randomized() {
        let key = alice();
        let first = encrypt_bytes(b"Hello, RSA!", &key, b"").unwrap();
        let second = encrypt_bytes(b"Hello, RSA!", &key, b"").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_encrypt_empty() {
        let ciphertext = encrypt_bytes(b"", &alice(), b"").unwrap();
        assert_eq!(ciphertext.len(), 256);
    }

    #[test]
    fn test_encrypt_too_large() {
        let key = alice();
        assert!(encrypt_bytes(&[0u8; 190], &key, b"").is_ok());

        let result = encrypt_bytes(&[0u8; 191], &key, b"");
        assert!(matches!(result, Err(Error::EncryptionFailed(_))));
    }
}
