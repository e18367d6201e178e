// rsa-files Library
// Bundles files into a JSON payload and encrypts it with one RSA-OAEP (SHA-256)
// operation; decryption restores every bundled file
//
// key.pem -> rsa::keys ----------------------------+
// files   -> util::file_ops -> payload::encode -> rsa::encrypt -> ciphertext

pub mod commands;
pub mod error;
pub mod payload;
pub mod rsa;
pub mod util;

pub use error::{Error, KeyKind, Result};
