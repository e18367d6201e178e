// RSA Keys
// Key structures and PEM loading (PKIX public keys, PKCS#1 private keys)

use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};
use tracing::debug;

use super::bigint::{byte_len, from_bytes, RsaBigInt};
use crate::error::{Error, Result};

/// PEM label of a SubjectPublicKeyInfo block
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
/// PEM label of a PKCS#1 RSAPrivateKey block
pub const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// Chinese Remainder Theorem parameters of a two-prime key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtParams {
    pub p: RsaBigInt,     // First prime factor
    pub q: RsaBigInt,     // Second prime factor
    pub d_p: RsaBigInt,   // d mod (p-1)
    pub d_q: RsaBigInt,   // d mod (q-1)
    pub q_inv: RsaBigInt, // q^(-1) mod p
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub e: RsaBigInt, // Public exponent
    pub d: RsaBigInt, // Private exponent
    /// Absent for multi-prime keys, which decrypt with `d` directly
    pub crt: Option<CrtParams>,
}

impl RsaPublicKey {
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        if n.is_zero() || e.is_zero() {
            return Err(Error::KeyParseFailed(
                "modulus and exponent must be non-zero".to_string(),
            ));
        }
        Ok(Self { n, e })
    }

    /// Modulus length in bytes; every ciphertext has exactly this length
    pub fn size(&self) -> usize {
        byte_len(&self.n)
    }

    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.n)
    }
}

impl RsaPrivateKey {
    pub fn new(
        n: RsaBigInt,
        e: RsaBigInt,
        d: RsaBigInt,
        crt: Option<CrtParams>,
    ) -> Result<Self> {
        if n.is_zero() || d.is_zero() {
            return Err(Error::KeyParseFailed(
                "modulus and private exponent must be non-zero".to_string(),
            ));
        }
        if let Some(crt) = &crt {
            if crt.p <= RsaBigInt::one() || crt.q <= RsaBigInt::one() || &crt.p * &crt.q != n {
                return Err(Error::KeyParseFailed(
                    "prime factors do not match the modulus".to_string(),
                ));
            }
        }
        Ok(Self { n, e, d, crt })
    }

    pub fn size(&self) -> usize {
        byte_len(&self.n)
    }

    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    pub fn to_public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.n)
    }
}

/// First 8 bytes of SHA-256 over the big-endian modulus, hex encoded
fn fingerprint(n: &RsaBigInt) -> String {
    let digest = Sha256::digest(n.to_bytes_be());
    hex::encode(&digest[..8])
}

/// Marker that opens every PEM block
const PEM_BEGIN: &[u8] = b"-----BEGIN ";

/// rsaEncryption, the SubjectPublicKeyInfo algorithm of RSA keys
const RSA_ENCRYPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Return the contents of the first PEM block labelled `label`
/// Blocks are decoded in order; other labels and malformed blocks are skipped,
/// and nothing after the first match is looked at
fn find_pem_block(bytes: &[u8], label: &str) -> Result<Vec<u8>> {
    let starts: Vec<usize> = (0..bytes.len())
        .filter(|&i| bytes[i..].starts_with(PEM_BEGIN))
        .collect();

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(bytes.len());
        match pem::parse(&bytes[start..end]) {
            Ok(block) if block.tag() == label => return Ok(block.into_contents()),
            Ok(block) => debug!(tag = block.tag(), "skipping PEM block"),
            Err(e) => debug!(offset = start, error = %e, "skipping malformed PEM block"),
        }
    }

    Err(Error::NoPemData)
}

fn parse_error(e: impl std::fmt::Display) -> Error {
    Error::KeyParseFailed(e.to_string())
}

/// Load a PKIX ("PUBLIC KEY") RSA public key from PEM bytes
pub fn load_public_key(bytes: &[u8]) -> Result<RsaPublicKey> {
    let der = find_pem_block(bytes, PUBLIC_KEY_LABEL)?;
    let info = SubjectPublicKeyInfoRef::try_from(der.as_slice()).map_err(parse_error)?;

    if info.algorithm.oid != RSA_ENCRYPTION_OID {
        return Err(Error::WrongKeyType);
    }

    let raw = info
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| parse_error("public key bit string has unused bits"))?;
    let key = pkcs1::RsaPublicKey::try_from(raw).map_err(parse_error)?;

    let key = RsaPublicKey::new(
        from_bytes(key.modulus.as_bytes()),
        from_bytes(key.public_exponent.as_bytes()),
    )?;
    debug!(
        bits = key.bit_length(),
        fingerprint = %key.fingerprint(),
        "loaded public key"
    );
    Ok(key)
}

/// Load a PKCS#1 ("RSA PRIVATE KEY") private key from PEM bytes
pub fn load_private_key(bytes: &[u8]) -> Result<RsaPrivateKey> {
    let der = find_pem_block(bytes, PRIVATE_KEY_LABEL)?;
    let key = pkcs1::RsaPrivateKey::try_from(der.as_slice()).map_err(parse_error)?;

    let crt = match key.version() {
        pkcs1::Version::TwoPrime => Some(CrtParams {
            p: from_bytes(key.prime1.as_bytes()),
            q: from_bytes(key.prime2.as_bytes()),
            d_p: from_bytes(key.exponent1.as_bytes()),
            d_q: from_bytes(key.exponent2.as_bytes()),
            q_inv: from_bytes(key.coefficient.as_bytes()),
        }),
        pkcs1::Version::Multi => None,
    };

    let key = RsaPrivateKey::new(
        from_bytes(key.modulus.as_bytes()),
        from_bytes(key.public_exponent.as_bytes()),
        from_bytes(key.private_exponent.as_bytes()),
        crt,
    )?;
    debug!(
        bits = key.bit_length(),
        fingerprint = %key.fingerprint(),
        "loaded private key"
    );
    Ok(key)
}
