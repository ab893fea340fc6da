//! Whole-file content hashing.

use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

const CHUNK_SIZE: usize = 64 * 1024;

/// Lowercase hex MD5 of every byte of the file at `path`.
///
/// The file is opened as a plain byte stream; it does not have to be an archive.
pub async fn md5_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path).await?;
    let mut context = md5::Context::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        context.consume(&buf[..n]);
        total += n as u64;
    }

    debug!(path = %path.display(), bytes = total, "hashed file");
    Ok(format!("{:x}", context.compute()))
}
