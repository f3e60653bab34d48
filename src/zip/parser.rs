//! Low-level ZIP parsing over an in-memory slice.
//!
//! The parser walks the archive from the end: locate the End of Central
//! Directory, decode the Central Directory it points at, then resolve each
//! entry's data range through its Local File Header. Everything borrows from
//! the slice handed in by the CRX decoder; nothing is copied until an entry
//! is actually inflated.

use std::io::{Cursor, Read};

use crate::error::ArchiveError;

use super::structures::{
    CDFH_SIGNATURE, CompressionMethod, EndOfCentralDirectory, LFH_SIGNATURE, LFH_SIZE, ZipEntry,
    read_u16, read_u32,
};

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// Bounds the backward scan when the EOCD is not at the very end.
const MAX_COMMENT_SIZE: usize = 65535;

/// ZIP archive parser over a borrowed byte slice.
pub struct ZipParser<'a> {
    data: &'a [u8],
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Fast path: an archive without a trailing comment has the EOCD exactly
    /// 22 bytes from the end. Otherwise scan backwards for the signature,
    /// accepting only a candidate whose comment-length field matches the
    /// bytes remaining after it.
    fn find_eocd(&self) -> Result<EndOfCentralDirectory, ArchiveError> {
        let len = self.data.len();

        if len >= EndOfCentralDirectory::SIZE {
            let offset = len - EndOfCentralDirectory::SIZE;
            let tail = &self.data[offset..];
            if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && &tail[20..22] == b"\x00\x00" {
                return EndOfCentralDirectory::from_bytes(tail);
            }

            let search_start = len.saturating_sub(MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE);
            let window = &self.data[search_start..];
            for i in (0..window.len().saturating_sub(EndOfCentralDirectory::SIZE)).rev() {
                if &window[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                    let comment_len = u16::from_le_bytes([window[i + 20], window[i + 21]]) as usize;
                    if comment_len == window.len() - i - EndOfCentralDirectory::SIZE {
                        return EndOfCentralDirectory::from_bytes(&window[i..]);
                    }
                }
            }
        }

        Err(ArchiveError::Corrupt("not a ZIP archive".to_string()))
    }

    /// List all entries recorded in the Central Directory.
    pub fn entries(&self) -> Result<Vec<ZipEntry>, ArchiveError> {
        let eocd = self.find_eocd()?;

        let cd_start = eocd.cd_offset as usize;
        let cd_end = cd_start + eocd.cd_size as usize;
        if cd_end > self.data.len() || cd_start > cd_end {
            return Err(ArchiveError::Corrupt(
                "central directory range out of bounds".to_string(),
            ));
        }

        let mut cursor = Cursor::new(&self.data[cd_start..cd_end]);
        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        for _ in 0..eocd.total_entries {
            entries.push(Self::parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header at the cursor.
    fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipEntry, ArchiveError> {
        let mut sig = [0u8; 4];
        cursor
            .read_exact(&mut sig)
            .map_err(|_| ArchiveError::Corrupt("truncated central directory".to_string()))?;
        if sig != CDFH_SIGNATURE {
            return Err(ArchiveError::Corrupt(
                "invalid central directory file header".to_string(),
            ));
        }

        let _version_made_by = read_u16(cursor)?;
        let _version_needed = read_u16(cursor)?;
        let _flags = read_u16(cursor)?;
        let method = read_u16(cursor)?;
        let _last_mod_time = read_u16(cursor)?;
        let _last_mod_date = read_u16(cursor)?;
        let crc32 = read_u32(cursor)?;
        let compressed_size = read_u32(cursor)?;
        let uncompressed_size = read_u32(cursor)?;
        let name_len = read_u16(cursor)?;
        let extra_len = read_u16(cursor)?;
        let comment_len = read_u16(cursor)?;
        let _disk_number_start = read_u16(cursor)?;
        let _internal_attrs = read_u16(cursor)?;
        let _external_attrs = read_u32(cursor)?;
        let lfh_offset = read_u32(cursor)?;

        if compressed_size == 0xFFFF_FFFF || uncompressed_size == 0xFFFF_FFFF {
            return Err(ArchiveError::Corrupt(
                "ZIP64 entries are not supported".to_string(),
            ));
        }

        let mut name_bytes = vec![0u8; name_len as usize];
        cursor
            .read_exact(&mut name_bytes)
            .map_err(|_| ArchiveError::Corrupt("truncated central directory".to_string()))?;
        // Lossy conversion keeps non-UTF8 names extractable
        let name = String::from_utf8_lossy(&name_bytes).to_string();
        let is_directory = name.ends_with('/');

        // Extra field and comment carry nothing we need
        let skip = extra_len as u64 + comment_len as u64;
        cursor.set_position(cursor.position() + skip);

        Ok(ZipEntry {
            name,
            method: CompressionMethod::from_u16(method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            is_directory,
        })
    }

    /// Compressed bytes for an entry.
    ///
    /// The Local File Header repeats the name and extra field with lengths
    /// that may differ from the Central Directory copy, so the data offset
    /// has to be computed from the LFH itself.
    pub fn entry_data(&self, entry: &ZipEntry) -> Result<&'a [u8], ArchiveError> {
        let lfh_start = entry.lfh_offset as usize;
        let lfh_end = lfh_start + LFH_SIZE;
        if lfh_end > self.data.len() {
            return Err(ArchiveError::Corrupt(
                "local file header out of bounds".to_string(),
            ));
        }

        let lfh = &self.data[lfh_start..lfh_end];
        if &lfh[0..4] != LFH_SIGNATURE {
            return Err(ArchiveError::Corrupt(
                "invalid local file header".to_string(),
            ));
        }

        // Name and extra lengths sit at fixed offsets 26 and 28
        let name_len = u16::from_le_bytes([lfh[26], lfh[27]]) as usize;
        let extra_len = u16::from_le_bytes([lfh[28], lfh[29]]) as usize;

        let data_start = lfh_end + name_len + extra_len;
        let data_end = data_start + entry.compressed_size as usize;
        if data_end > self.data.len() || data_start > data_end {
            return Err(ArchiveError::Corrupt(
                "entry data out of bounds".to_string(),
            ));
        }

        Ok(&self.data[data_start..data_end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::testdata::build_zip;

    #[test]
    fn lists_entries_with_sizes_and_offsets() {
        let zip = build_zip(&[
            ("manifest.json", b"{\"name\":\"demo\"}".as_slice()),
            ("icons/", b""),
            ("icons/128.png", b"\x89PNG fake"),
        ]);

        let parser = ZipParser::new(&zip);
        let entries = parser.entries().unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].name, "manifest.json");
        assert_eq!(entries[0].method, CompressionMethod::Stored);
        assert_eq!(entries[0].uncompressed_size, 15);
        assert!(!entries[0].is_directory);

        assert!(entries[1].is_directory);

        let png = parser.entry_data(&entries[2]).unwrap();
        assert_eq!(png, b"\x89PNG fake");
    }

    #[test]
    fn finds_eocd_behind_a_trailing_comment() {
        let mut zip = build_zip(&[("a.txt", b"hello".as_slice())]);
        let comment = b"archive comment";
        // Patch the comment length field and append the comment
        let comment_len_at = zip.len() - 2;
        zip[comment_len_at..].copy_from_slice(&(comment.len() as u16).to_le_bytes());
        zip.extend_from_slice(comment);

        let entries = ZipParser::new(&zip).entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
    }

    #[test]
    fn rejects_non_zip_bytes() {
        for junk in [&b""[..], b"not a zip", &[0u8; 64]] {
            assert!(matches!(
                ZipParser::new(junk).entries(),
                Err(ArchiveError::Corrupt(_))
            ));
        }
    }

    #[test]
    fn rejects_central_directory_past_end() {
        let mut zip = build_zip(&[("a.txt", b"hello".as_slice())]);
        // Point the EOCD's central directory offset past the buffer
        let cd_offset_at = zip.len() - 6;
        zip[cd_offset_at..cd_offset_at + 4].copy_from_slice(&0xFFFF_FF00u32.to_le_bytes());
        assert!(matches!(
            ZipParser::new(&zip).entries(),
            Err(ArchiveError::Corrupt(_))
        ));
    }

    #[test]
    fn rejects_truncated_entry_data() {
        let zip = build_zip(&[("a.txt", b"hello world".as_slice())]);
        // Drop the tail of the archive but keep a parseable EOCD by
        // rebuilding: instead, corrupt the entry's LFH offset
        let parser = ZipParser::new(&zip);
        let mut entry = parser.entries().unwrap().remove(0);
        entry.lfh_offset = zip.len() as u32 - 4;
        assert!(matches!(
            parser.entry_data(&entry),
            Err(ArchiveError::Corrupt(_))
        ));
    }
}
