// RSA Decryption Implementation
// Implements RSA decryption with Chinese Remainder Theorem (CRT) optimization

use super::bigint::{from_bytes, mod_pow, to_bytes_padded, RsaBigInt};
use super::keys::{CrtParams, RsaPrivateKey};
use super::label::LabelPolicy;
use super::padding::unpad_oaep;
use crate::error::{Error, Result};

/// Raw RSA decryption to a key-sized encoded block
/// The exponentiation is variable-time `BigUint::modpow` with no blinding;
/// only the OAEP check after it runs in constant time
fn decrypt_block(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let key_bytes = private_key.size();
    if ciphertext.len() != key_bytes {
        return Err(Error::DecryptionFailed);
    }

    let c = from_bytes(ciphertext);
    if c >= private_key.n {
        return Err(Error::DecryptionFailed);
    }

    let m = match &private_key.crt {
        Some(crt) => decrypt_crt(&c, crt),
        None => mod_pow(&c, &private_key.d, &private_key.n),
    };

    to_bytes_padded(&m, key_bytes).ok_or(Error::DecryptionFailed)
}

/// Decrypt using Chinese Remainder Theorem (CRT)
/// This is faster than regular decryption because we work with smaller numbers
fn decrypt_crt(c: &RsaBigInt, crt: &CrtParams) -> RsaBigInt {
    // m1 = c^d_p mod p
    let m1 = mod_pow(c, &crt.d_p, &crt.p);

    // m2 = c^d_q mod q
    let m2 = mod_pow(c, &crt.d_q, &crt.q);

    // h = (m1 - m2) * q_inv mod p, kept non-negative
    let h = ((m1 + &crt.p - (&m2 % &crt.p)) * &crt.q_inv) % &crt.p;

    // m = m2 + q * h, already below n = p * q
    m2 + &crt.q * h
}

/// Decrypt ciphertext bytes using RSA private key under one OAEP label
pub fn decrypt_bytes(
    ciphertext: &[u8],
    private_key: &RsaPrivateKey,
    label: &[u8],
) -> Result<Vec<u8>> {
    let block = decrypt_block(ciphertext, private_key)?;
    unpad_oaep(block, label)
}

/// Decrypt trying every label the policy accepts
/// All failures collapse to `Error::DecryptionFailed`
pub fn decrypt_oaep(
    ciphertext: &[u8],
    private_key: &RsaPrivateKey,
    labels: &LabelPolicy,
) -> Result<Vec<u8>> {
    let block = decrypt_block(ciphertext, private_key)?;
    labels
        .decrypt_labels()
        .find_map(|label| unpad_oaep(block.clone(), label).ok())
        .ok_or(Error::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::encrypt::{encrypt_bytes, encrypt_oaep};
    use crate::rsa::keys::{load_private_key, load_public_key, RsaPublicKey};

    fn alice() -> (RsaPublicKey, RsaPrivateKey) {
        (
            load_public_key(include_bytes!("../../tests/fixtures/alice_public.pem")).unwrap(),
            load_private_key(include_bytes!("../../tests/fixtures/alice_private.pem")).unwrap(),
        )
    }

    fn bob_private() -> RsaPrivateKey {
        load_private_key(include_bytes!("../../tests/fixtures/bob_private.pem")).unwrap()
    }

    #[test]
    fn test_decrypt_bytes() {
        let (public_key, private_key) = alice();
        let message = b"Hello, RSA!";

        let ciphertext = encrypt_bytes(message, &public_key, b"label").unwrap();
        let decrypted = decrypt_bytes(&ciphertext, &private_key, b"label").unwrap();

        assert_eq!(message.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_crt_matches_plain_exponentiation() {
        let (public_key, private_key) = alice();
        let ciphertext = encrypt_bytes(b"crt", &public_key, b"").unwrap();

        let without_crt = RsaPrivateKey {
            crt: None,
            ..private_key.clone()
        };
        assert_eq!(
            decrypt_block(&ciphertext, &private_key).unwrap(),
            decrypt_block(&ciphertext, &without_crt).unwrap()
        );
    }

    #[test]
    fn test_decrypt_invalid_size() {
        let (_, private_key) = alice();
        let result = decrypt_bytes(&[0u8; 10], &private_key, b"");
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_ciphertext_above_modulus() {
        let (_, private_key) = alice();
        let result = decrypt_bytes(&[0xffu8; 256], &private_key, b"");
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let (public_key, _) = alice();
        let ciphertext = encrypt_oaep(b"Test", &public_key, &LabelPolicy::default()).unwrap();

        let result = decrypt_oaep(&ciphertext, &bob_private(), &LabelPolicy::default());
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_accepted_labels() {
        let (public_key, private_key) = alice();
        let ciphertext = encrypt_bytes(b"legacy", &public_key, b"old label").unwrap();

        let strict = LabelPolicy::default();
        assert!(matches!(
            decrypt_oaep(&ciphertext, &private_key, &strict),
            Err(Error::DecryptionFailed)
        ));

        let lenient = LabelPolicy::default().accept("old label");
        assert_eq!(
            decrypt_oaep(&ciphertext, &private_key, &lenient).unwrap(),
            b"legacy"
        );
    }

    #[test]
    fn test_roundtrip_various_sizes() {
        let (public_key, private_key) = alice();
        let labels = LabelPolicy::default();

        let test_cases: Vec<Vec<u8>> = vec![
            b"A".to_vec(),
            b"Hello, World!".to_vec(),
            vec![0u8; 100],
            vec![255u8; 190],
        ];

        for message in test_cases {
            let ciphertext = encrypt_oaep(&message, &public_key, &labels).unwrap();
            assert_eq!(decrypt_oaep(&ciphertext, &private_key, &labels).unwrap(), message);
        }
    }
}
