// Command Driver
// The encrypt and decrypt commands; both stop at the first error
//
// encrypt writes nothing until the ciphertext exists, decrypt restores
// entries as it goes and does not roll back entries already written

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::{Error, KeyKind, Result};
use crate::payload::{self, FileEntry, Payload};
use crate::rsa::{self, LabelPolicy, RsaPrivateKey, RsaPublicKey};
use crate::util::file_ops::{self, FileConfig};

/// Options of the `encrypt` command
#[derive(Clone, Debug, Default)]
pub struct EncryptOptions {
    /// PEM file holding a "PUBLIC KEY" block
    pub key: String,
    /// Ciphertext destination; stdout when `None`
    pub output: Option<String>,
    pub files: Vec<String>,
    pub labels: LabelPolicy,
}

/// Options of the `decrypt` command
#[derive(Clone, Debug, Default)]
pub struct DecryptOptions {
    /// PEM file holding an "RSA PRIVATE KEY" block
    pub key: String,
    pub files: Vec<String>,
    pub config: FileConfig,
    pub labels: LabelPolicy,
}

/// Read and parse a public key file; every failure is tagged `KeyKind::Public`
pub fn read_public_key(path: &str) -> Result<RsaPublicKey> {
    file_ops::resolve_and_read(path)
        .and_then(|bytes| rsa::load_public_key(&bytes))
        .map_err(|e| Error::for_key(KeyKind::Public, e))
}

/// Read and parse a private key file; every failure is tagged `KeyKind::Private`
pub fn read_private_key(path: &str) -> Result<RsaPrivateKey> {
    file_ops::resolve_and_read(path)
        .and_then(|bytes| rsa::load_private_key(&bytes))
        .map_err(|e| Error::for_key(KeyKind::Private, e))
}

/// Read every file in order into a payload, keeping each path as given
pub fn collect(paths: &[String]) -> Result<Payload> {
    let mut payload = Payload::new();
    for path in paths {
        let body = file_ops::resolve_and_read(path)?;
        debug!(path = %path, bytes = body.len(), "read input file");
        payload.push(FileEntry::new(path.clone(), body));
    }
    Ok(payload)
}

/// Encode and encrypt a payload
pub fn seal(payload: &Payload, key: &RsaPublicKey, labels: &LabelPolicy) -> Result<Vec<u8>> {
    let encoded = payload::encode(payload)?;
    rsa::encrypt_oaep(&encoded, key, labels)
}

/// Decrypt and decode a payload
/// A decryption failure is returned as is, without attempting to decode
pub fn open(ciphertext: &[u8], key: &RsaPrivateKey, labels: &LabelPolicy) -> Result<Payload> {
    let encoded = rsa::decrypt_oaep(ciphertext, key, labels)?;
    payload::decode(&encoded)
}

/// Encrypt `options.files` into one ciphertext, written to `options.output`
/// or to `stdout`
pub fn encrypt<W: Write>(options: &EncryptOptions, stdout: &mut W) -> Result<()> {
    let key = read_public_key(&options.key)?;
    let payload = collect(&options.files)?;
    let ciphertext = seal(&payload, &key, &options.labels)?;

    match &options.output {
        Some(output) => {
            let destination = file_ops::absolute(output)?;
            file_ops::write_file(&destination, &ciphertext, output)?;
        }
        None => {
            stdout
                .write_all(&ciphertext)
                .and_then(|()| stdout.flush())
                .map_err(Error::StdoutFailed)?;
        }
    }

    info!(
        files = payload.len(),
        bytes = ciphertext.len(),
        "encrypted payload"
    );
    Ok(())
}

/// Decrypt each file in `options.files` and restore its entries
/// Returns the absolute paths written, in order
pub fn decrypt(options: &DecryptOptions) -> Result<Vec<PathBuf>> {
    let key = read_private_key(&options.key)?;
    if options.config.allow_unsafe_paths {
        warn!("stored paths are trusted; entries may be written anywhere");
    }

    let mut restored = Vec::new();
    for path in &options.files {
        let ciphertext = file_ops::resolve_and_read(path)?;
        let payload = open(&ciphertext, &key, &options.labels)?;
        debug!(path = %path, entries = payload.len(), "decrypted payload");

        for entry in payload.iter() {
            let written = file_ops::restore(&options.config, &entry.path, &entry.body)?;
            debug!(entry = %entry.path, destination = %written.display(), "restored file");
            restored.push(written);
        }
    }

    info!(
        inputs = options.files.len(),
        files = restored.len(),
        "decrypted payloads"
    );
    Ok(restored)
}
