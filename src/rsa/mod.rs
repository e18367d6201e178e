// RSA Module - Main module file
// Exports key loading and the RSA-OAEP (SHA-256) primitive

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod keys;
pub mod label;
pub mod padding;

pub use decrypt::{decrypt_bytes, decrypt_oaep};
pub use encrypt::{encrypt_bytes, encrypt_oaep};
pub use keys::{load_private_key, load_public_key, CrtParams, RsaPrivateKey, RsaPublicKey};
pub use label::{LabelPolicy, KNOWN_LABELS, LABEL_V1};
pub use padding::max_message_len;
