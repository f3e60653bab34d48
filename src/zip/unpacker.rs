//! Writing archive entries to disk.

use flate2::read::DeflateDecoder;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::error::ArchiveError;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipEntry};

/// Expand a ZIP archive held in memory under `dest`.
///
/// Creates `dest` (and any missing parents) if needed, writes every entry
/// preserving its relative path, and overwrites existing files without
/// prompting. Returns the number of regular files under `dest` after the
/// whole archive has been written; any failure along the way propagates
/// instead, so a partial extraction is never reported as success.
pub async fn unpack(archive: &[u8], dest: &Path) -> Result<usize, ArchiveError> {
    let parser = ZipParser::new(archive);
    let entries = parser.entries()?;

    fs::create_dir_all(dest).await?;

    for entry in &entries {
        let relative = sanitized_path(&entry.name)?;
        let target = dest.join(&relative);

        if entry.is_directory {
            fs::create_dir_all(&target).await?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let data = inflate(parser.entry_data(entry)?, entry)?;
        fs::write(&target, &data).await?;
    }

    count_files(dest)
}

/// Decompress one entry and verify it against the central directory record.
fn inflate(compressed: &[u8], entry: &ZipEntry) -> Result<Vec<u8>, ArchiveError> {
    let data = match entry.method {
        CompressionMethod::Stored => compressed.to_vec(),
        CompressionMethod::Deflate => {
            let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
            DeflateDecoder::new(compressed)
                .read_to_end(&mut out)
                .map_err(|e| {
                    ArchiveError::Corrupt(format!("deflate stream for {:?}: {}", entry.name, e))
                })?;
            out
        }
        CompressionMethod::Unknown(v) => return Err(ArchiveError::UnsupportedMethod(v)),
    };

    if data.len() as u64 != entry.uncompressed_size as u64 {
        return Err(ArchiveError::Corrupt(format!(
            "size mismatch for {:?}: expected {}, got {}",
            entry.name,
            entry.uncompressed_size,
            data.len()
        )));
    }

    let mut crc = flate2::Crc::new();
    crc.update(&data);
    if crc.sum() != entry.crc32 {
        return Err(ArchiveError::Corrupt(format!(
            "CRC mismatch for {:?}",
            entry.name
        )));
    }

    Ok(data)
}

/// Turn an archive entry name into a path that stays inside the destination.
///
/// Rejects absolute paths and any `..` component so a hostile archive cannot
/// write outside the extraction directory.
fn sanitized_path(name: &str) -> Result<PathBuf, ArchiveError> {
    let mut clean = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::UnsafePath(PathBuf::from(name)));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(ArchiveError::UnsafePath(PathBuf::from(name)));
    }

    Ok(clean)
}

/// Count regular files under a directory, recursively. Directories are not
/// counted, matching the reported extraction total.
fn count_files(dir: &Path) -> Result<usize, ArchiveError> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            count += count_files(&entry.path())?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}
