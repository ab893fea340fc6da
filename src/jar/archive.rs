//! Central-directory reader for JAR files.
//!
//! A JAR is a ZIP archive, so it is read from the end:
//! 1. Find the End of Central Directory (EOCD) record
//! 2. Follow the ZIP64 locator if the EOCD fields are saturated
//! 3. Read the whole Central Directory to learn every entry's name and location
//! 4. For a requested entry, read its Local File Header and then its data
//!
//! Only the records needed to find and read a single entry are decoded.

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tracing::debug;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::structures::*;

/// Largest comment the EOCD can announce; bounds the backwards search.
const MAX_COMMENT_SIZE: u64 = u16::MAX as u64;

/// An opened JAR: the reader plus its decoded central directory.
pub struct JarArchive<R: ReadAt> {
    reader: Arc<R>,
    entries: Vec<JarEntry>,
}

impl<R: ReadAt> JarArchive<R> {
    /// Decode the central directory of `reader`.
    ///
    /// # Arguments
    ///
    /// * `reader` - Random access to the raw JAR bytes
    ///
    /// # Returns
    ///
    /// The archive with every central-directory entry decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if no End of Central Directory record is found, the
    /// ZIP64 records it points to are missing, or the central directory is
    /// truncated or lies outside the file.
    pub async fn open(reader: Arc<R>) -> Result<Self> {
        let (eocd, eocd_offset) = find_eocd(reader.as_ref()).await?;

        let (cd_offset, cd_size, total_entries) = if eocd.needs_zip64() {
            let eocd64 = read_zip64_eocd(reader.as_ref(), eocd_offset).await?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.saturating_add(cd_size) > reader.size() {
            bail!("central directory lies outside the archive");
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        reader
            .read_exact_at(cd_offset, &mut cd_data)
            .await
            .context("failed to read central directory")?;

        let mut cursor = Cursor::new(cd_data.as_slice());
        let mut entries = Vec::with_capacity(total_entries.min(u16::MAX as u64) as usize);
        for _ in 0..total_entries {
            entries.push(parse_central_header(&mut cursor)?);
        }
        debug!(entries = entries.len(), "read central directory");

        Ok(Self { reader, entries })
    }

    pub fn entries(&self) -> &[JarEntry] {
        &self.entries
    }

    /// First entry whose name equals `name` ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&JarEntry> {
        self.entries.iter().find(|entry| entry.is_named(name))
    }

    /// Read and, if needed, inflate the full contents of `entry`.
    ///
    /// # Arguments
    ///
    /// * `entry` - An entry of this archive, usually obtained from [`find()`](Self::find)
    ///
    /// # Returns
    ///
    /// The uncompressed entry bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the local file header is invalid, the entry data
    /// extends past the end of the archive, the DEFLATE stream is corrupt, or
    /// the entry uses a compression method other than STORED or DEFLATE.
    pub async fn read_entry(&self, entry: &JarEntry) -> Result<Vec<u8>> {
        let data_offset = self.data_offset(entry).await?;

        match data_offset.checked_add(entry.compressed_size) {
            Some(end) if end <= self.reader.size() => {}
            _ => bail!("data of {} extends past the end of the archive", entry.name),
        }

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.reader
            .read_exact_at(data_offset, &mut raw)
            .await
            .with_context(|| format!("failed to read data of {}", entry.name))?;

        debug!(entry = %entry.name, method = ?entry.compression, "reading entry");
        match entry.compression {
            CompressionMethod::Stored => Ok(raw),
            CompressionMethod::Deflate => {
                // The declared size is untrusted, only use it as a bounded hint.
                let hint = (entry.uncompressed_size as usize).min(raw.len().saturating_mul(4));
                let mut data = Vec::with_capacity(hint);
                DeflateDecoder::new(raw.as_slice())
                    .read_to_end(&mut data)
                    .with_context(|| format!("failed to inflate {}", entry.name))?;
                Ok(data)
            }
            CompressionMethod::Unsupported(method) => {
                bail!("{} uses unsupported compression method {}", entry.name, method)
            }
        }
    }

    /// The local header repeats name and extra field with possibly different
    /// lengths, so the data offset has to be computed from it.
    async fn data_offset(&self, entry: &JarEntry) -> Result<u64> {
        let mut header = [0u8; LOCAL_HEADER_SIZE];
        self.reader
            .read_exact_at(entry.header_offset, &mut header)
            .await
            .with_context(|| format!("failed to read local header of {}", entry.name))?;

        if &header[0..4] != LOCAL_HEADER_SIGNATURE {
            bail!("invalid local file header for {}", entry.name);
        }

        let mut cursor = Cursor::new(&header[26..]);
        let name_len = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_len = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.header_offset + LOCAL_HEADER_SIZE as u64 + name_len + extra_len)
    }
}

async fn find_eocd<R: ReadAt + ?Sized>(reader: &R) -> Result<(EndOfCentralDirectory, u64)> {
    let size = reader.size();
    let record = EndOfCentralDirectory::SIZE as u64;

    // Common case: no archive comment, the record is the last 22 bytes.
    if size >= record {
        let offset = size - record;
        let mut buf = [0u8; EndOfCentralDirectory::SIZE];
        reader.read_exact_at(offset, &mut buf).await?;
        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && buf[20..22] == [0, 0] {
            return Ok((EndOfCentralDirectory::from_bytes(&buf)?, offset));
        }
    }

    let window = (MAX_COMMENT_SIZE + record).min(size);
    let start = size - window;
    let mut buf = vec![0u8; window as usize];
    reader.read_exact_at(start, &mut buf).await?;

    for i in (0..buf.len().saturating_sub(EndOfCentralDirectory::SIZE)).rev() {
        if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
            continue;
        }
        let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
        if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
            let eocd =
                EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
            return Ok((eocd, start + i as u64));
        }
    }

    bail!("not a valid JAR/ZIP file")
}

async fn read_zip64_eocd<R: ReadAt + ?Sized>(
    reader: &R,
    eocd_offset: u64,
) -> Result<Zip64EndOfCentralDirectory> {
    let locator_offset = eocd_offset
        .checked_sub(Zip64Locator::SIZE as u64)
        .context("missing ZIP64 end of central directory locator")?;
    let mut locator = [0u8; Zip64Locator::SIZE];
    reader.read_exact_at(locator_offset, &mut locator).await?;
    let locator = Zip64Locator::from_bytes(&locator)?;

    let mut record = [0u8; Zip64EndOfCentralDirectory::MIN_SIZE];
    reader
        .read_exact_at(locator.eocd64_offset, &mut record)
        .await?;
    Zip64EndOfCentralDirectory::from_bytes(&record)
}

fn parse_central_header(cursor: &mut Cursor<&[u8]>) -> Result<JarEntry> {
    let mut sig = [0u8; 4];
    cursor
        .read_exact(&mut sig)
        .context("truncated central directory")?;
    if sig != CENTRAL_HEADER_SIGNATURE {
        bail!("invalid central directory file header");
    }

    // version made by, version needed, flags
    cursor.set_position(cursor.position() + 6);
    let compression = cursor.read_u16::<LittleEndian>()?;
    // mod time, mod date, crc32
    cursor.set_position(cursor.position() + 8);
    let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let name_len = cursor.read_u16::<LittleEndian>()?;
    let extra_len = cursor.read_u16::<LittleEndian>()?;
    let comment_len = cursor.read_u16::<LittleEndian>()?;
    // disk number start, internal and external attributes
    cursor.set_position(cursor.position() + 8);
    let mut header_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut name = vec![0u8; name_len as usize];
    cursor
        .read_exact(&mut name)
        .context("truncated central directory")?;
    let name = String::from_utf8_lossy(&name).into_owned();

    let extra_end = cursor.position() + extra_len as u64;
    while cursor.position() + 4 <= extra_end {
        let tag = cursor.read_u16::<LittleEndian>()?;
        let len = cursor.read_u16::<LittleEndian>()? as u64;
        let field_end = cursor.position() + len;

        if tag == ZIP64_EXTRA_TAG {
            // Only the saturated header fields are present, in this order.
            if uncompressed_size == u32::MAX as u64 && cursor.position() + 8 <= field_end {
                uncompressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if compressed_size == u32::MAX as u64 && cursor.position() + 8 <= field_end {
                compressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if header_offset == u32::MAX as u64 && cursor.position() + 8 <= field_end {
                header_offset = cursor.read_u64::<LittleEndian>()?;
            }
        }
        cursor.set_position(field_end);
    }
    cursor.set_position(extra_end + comment_len as u64);

    Ok(JarEntry {
        name,
        compression: CompressionMethod::from(compression),
        compressed_size,
        uncompressed_size,
        header_offset,
    })
}
