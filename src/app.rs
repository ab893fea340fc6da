//! Extraction and reporting for one invocation.

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::cli::{self, Cli};
use crate::error::{JarVersionError, Result};
use crate::hash::md5_file;
use crate::io::LocalFileReader;
use crate::jar::{JarArchive, MANIFEST_PATH};
use crate::manifest::VersionRecord;
use crate::report;

pub const MANIFEST_NOT_FOUND: &str = "MANIFEST.MF not found in JAR file.";

/// Run the tool with `args` (program name excluded), writing the report to `out`.
///
/// Argument errors are written to `out` before being returned.
pub async fn run<I, T, W>(args: I, out: &mut W) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: AsyncWrite + Unpin,
{
    let cli = match Cli::parse_args(args) {
        Ok(cli) => cli,
        Err(err) => {
            let message = err.to_string();
            out.write_all(message.as_bytes()).await?;
            out.flush().await?;
            return Err(JarVersionError::Argument(message.trim_end().to_string()));
        }
    };

    let result = execute(&cli, out).await;
    out.flush().await?;
    result
}

/// Dispatch on already parsed flags.
pub async fn execute<W: AsyncWrite + Unpin>(cli: &Cli, out: &mut W) -> Result<()> {
    if cli.show_help {
        return write_text(out, &cli::usage()).await;
    }

    if cli.show_version {
        return write_line(out, &cli::version_line()).await;
    }

    let Some(jar) = cli.jar.as_deref() else {
        write_line(out, cli::BANNER).await?;
        return write_text(out, &cli::usage()).await;
    };

    if cli.is_md5_only() {
        let digest = hash(jar).await?;
        return write_line(out, &format!("MD5: {digest}")).await;
    }

    let Some(mut record) = read_manifest(jar).await? else {
        return write_line(out, MANIFEST_NOT_FOUND).await;
    };

    if cli.md5 {
        record = record.with_md5(hash(jar).await?);
    }

    render(cli, &record, out).await
}

/// Parse the manifest of `jar`, or `None` if the archive has no manifest.
///
/// The archive handle is dropped before returning.
pub async fn read_manifest(jar: &Path) -> Result<Option<VersionRecord>> {
    let archive_err = |cause| JarVersionError::ArchiveOpen {
        path: jar.to_path_buf(),
        cause,
    };

    let reader = LocalFileReader::open(jar).map_err(archive_err)?;
    let archive = JarArchive::open(Arc::new(reader))
        .await
        .map_err(archive_err)?;

    let Some(entry) = archive.find(MANIFEST_PATH) else {
        info!(jar = %jar.display(), entries = archive.entries().len(), "no manifest entry");
        return Ok(None);
    };
    debug!(entry = %entry.name, size = entry.uncompressed_size, "found manifest");

    let data = archive
        .read_entry(entry)
        .await
        .map_err(|cause| JarVersionError::EntryRead {
            path: jar.to_path_buf(),
            cause,
        })?;

    Ok(Some(VersionRecord::parse(&String::from_utf8_lossy(&data))))
}

async fn hash(jar: &Path) -> Result<String> {
    md5_file(jar)
        .await
        .map_err(|source| JarVersionError::HashCompute {
            path: jar.to_path_buf(),
            source,
        })
}

async fn render<W: AsyncWrite + Unpin>(cli: &Cli, record: &VersionRecord, out: &mut W) -> Result<()> {
    if cli.wants_json() {
        let json = report::to_json(record)?;
        return match &cli.json_file {
            Some(path) => {
                write_file(path, &json).await?;
                write_line(out, &format!("✅ JSON written to {}", path.display())).await
            }
            None => write_line(out, &json).await,
        };
    }

    if let Some(path) = &cli.text_file {
        write_file(path, &report::text_lines(record).join("\n")).await?;
        return write_line(out, &format!("✅ Version info written to {}", path.display())).await;
    }

    for line in report::console_lines(record) {
        write_line(out, &line).await?;
    }
    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    debug!(path = %path.display(), bytes = contents.len(), "writing report file");
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| JarVersionError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    Ok(())
}

async fn write_text<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        out.write_all(b"\n").await?;
    }
    Ok(())
}
