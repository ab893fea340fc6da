//! # jarversion
//!
//! Reports the `Implementation-Version` and `Specification-Version` recorded in
//! a JAR's `META-INF/MANIFEST.MF`, optionally together with the MD5 of the whole
//! file, for inventory and build-provenance pipelines.
//!
//! ## Features
//!
//! - Reads the manifest straight from the ZIP central directory (STORED, DEFLATE, ZIP64)
//! - Case-insensitive manifest lookup
//! - Plain text, JSON, JSON file and text file output
//! - Fast `--md5` mode that hashes any file without opening it as an archive
//!
//! ## Example
//!
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut out = Vec::new();
//!     jarversion::run(["--json", "app.jar"], &mut out).await?;
//!     print!("{}", String::from_utf8_lossy(&out));
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod error;
pub mod hash;
pub mod io;
pub mod jar;
pub mod logger;
pub mod manifest;
pub mod report;

pub use app::{MANIFEST_NOT_FOUND, run};
pub use cli::Cli;
pub use error::JarVersionError;
pub use io::{LocalFileReader, ReadAt};
pub use jar::{JarArchive, JarEntry};
pub use manifest::VersionRecord;
