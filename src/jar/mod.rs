//! Read-only access to the entries of a JAR file.
//!
//! - [`structures`]: fixed-layout records of the ZIP container (EOCD, ZIP64, entries)
//! - [`archive`]: central-directory decoding, entry lookup and extraction
//!
//! Supported: ZIP64 directories, STORED and DEFLATE entries.
//! Not supported: encryption, multi-disk archives, other compression methods.

mod archive;
mod structures;

pub use archive::JarArchive;
pub use structures::{CompressionMethod, JarEntry};

/// Conventional location of the JAR manifest.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
