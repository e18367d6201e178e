// Error Types
// Shared by every stage of the encrypt/decrypt pipeline

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type for rsa-files operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which key a `Error::Key` failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => write!(f, "public"),
            KeyKind::Private => write!(f, "private"),
        }
    }
}

/// Every failure is fatal to the current invocation and renders as a
/// single human-readable line
#[derive(Debug, Error)]
pub enum Error {
    #[error("underlying filesystem didn't provide an absolute path of {path}")]
    PathResolutionFailed { path: String },

    #[error("file ({path}) was not found")]
    FileNotFound { path: String },

    #[error("failed to read your file ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no PEM data is found")]
    NoPemData,

    #[error("failed to parse key: {0}")]
    KeyParseFailed(String),

    #[error("not RSA format data")]
    WrongKeyType,

    /// Any failure while reading or parsing a key file
    #[error("{kind} key: {source}")]
    Key {
        kind: KeyKind,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to encrypt your file(s) by RSA: {0}")]
    EncryptionFailed(String),

    /// Wrong key, corrupted ciphertext and label mismatch are reported
    /// identically
    #[error("failed to decrypt: ciphertext does not match this key")]
    DecryptionFailed,

    #[error("failed to encode payload: {0}")]
    EncodeFailed(#[source] serde_json::Error),

    #[error("failed to decode payload: {0}")]
    DecodeError(#[source] serde_json::Error),

    #[error("failed to output to file ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("refusing to write outside the output directory ({path})")]
    UnsafePath { path: String },

    #[error("failed to output to stdout: {0}")]
    StdoutFailed(#[source] io::Error),
}

impl Error {
    /// Tag an error raised while loading a key
    pub fn for_key(kind: KeyKind, source: Error) -> Self {
        Error::Key {
            kind,
            source: Box::new(source),
        }
    }

    /// The failure behind a `Error::Key`, or the error itself
    pub fn key_cause(&self) -> &Error {
        match self {
            Error::Key { source, .. } => source.key_cause(),
            other => other,
        }
    }
}
