// Utility Module
// Filesystem helpers shared by the encrypt and decrypt commands

pub mod file_ops;

pub use file_ops::{resolve_and_read, restore, FileConfig};
