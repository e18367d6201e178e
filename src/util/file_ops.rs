// File Operations for RSA Encryption/Decryption
// Resolves, reads and writes the files bundled into a payload

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};

/// Where decrypted entries are restored, and how far stored paths are trusted
#[derive(Clone, Debug)]
pub struct FileConfig {
    pub output_dir: PathBuf,
    pub allow_unsafe_paths: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            allow_unsafe_paths: false,
        }
    }
}

impl FileConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Write stored paths verbatim, resolved against the working directory
    pub fn with_unsafe_paths(mut self, allow: bool) -> Self {
        self.allow_unsafe_paths = allow;
        self
    }

    /// Absolute destination for a stored entry path
    pub fn destination(&self, stored: &str) -> Result<PathBuf> {
        if self.allow_unsafe_paths {
            return absolute(stored);
        }

        check_contained(stored)?;
        let joined = self.output_dir.join(stored);
        std::path::absolute(&joined).map_err(|_| Error::PathResolutionFailed {
            path: stored.to_string(),
        })
    }
}

/// Reject stored paths that could leave the output directory
fn check_contained(stored: &str) -> Result<()> {
    let mut has_name = false;
    for component in Path::new(stored).components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::UnsafePath {
                    path: stored.to_string(),
                })
            }
        }
    }

    if has_name {
        Ok(())
    } else {
        Err(Error::UnsafePath {
            path: stored.to_string(),
        })
    }
}

/// Resolve `path` to an absolute path without touching the filesystem
pub fn absolute(path: &str) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|_| Error::PathResolutionFailed {
        path: path.to_string(),
    })
}

/// Resolve, check existence, and read the entire file into memory
pub fn resolve_and_read(path: &str) -> Result<Vec<u8>> {
    let resolved = absolute(path)?;
    if !resolved.try_exists().unwrap_or(false) {
        return Err(Error::FileNotFound {
            path: path.to_string(),
        });
    }

    fs::read(&resolved).map_err(|source| Error::ReadFailed {
        path: path.to_string(),
        source,
    })
}

/// Write data to an already-resolved destination, overwriting it
/// `display` is the path reported in errors
pub fn write_file(destination: &Path, data: &[u8], display: &str) -> Result<()> {
    let write_failed = |source| Error::WriteFailed {
        path: display.to_string(),
        source,
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(destination, data).map_err(write_failed)
}

/// Restore one payload entry according to `config`
pub fn restore(config: &FileConfig, stored: &str, data: &[u8]) -> Result<PathBuf> {
    let destination = config.destination(stored)?;
    if config.allow_unsafe_paths && check_contained(stored).is_err() {
        warn!(path = stored, "writing entry outside the working directory");
    }

    write_file(&destination, data, stored)?;
    Ok(destination)
}
