use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::ArchiveError;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self, ArchiveError> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ArchiveError::Corrupt(
                "invalid end of central directory record".to_string(),
            ));
        }

        let mut cursor = Cursor::new(&data[4..]);
        let _disk_number = read_u16(&mut cursor)?;
        let _disk_with_cd = read_u16(&mut cursor)?;
        let _disk_entries = read_u16(&mut cursor)?;
        let total_entries = read_u16(&mut cursor)?;
        let cd_size = read_u32(&mut cursor)?;
        let cd_offset = read_u32(&mut cursor)?;

        // ZIP64 archives mark these fields with all-ones sentinels
        if total_entries == 0xFFFF || cd_size == 0xFFFF_FFFF || cd_offset == 0xFFFF_FFFF {
            return Err(ArchiveError::Corrupt(
                "ZIP64 archives are not supported".to_string(),
            ));
        }

        Ok(Self {
            total_entries,
            cd_size,
            cd_offset,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Parsed central directory entry
#[derive(Debug, Clone)]
pub struct ZipEntry {
    pub name: String,
    pub method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub crc32: u32,
    pub lfh_offset: u32,
    pub is_directory: bool,
}

pub(super) fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16, ArchiveError> {
    cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| truncated_header())
}

pub(super) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, ArchiveError> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| truncated_header())
}

fn truncated_header() -> ArchiveError {
    ArchiveError::Corrupt("truncated header record".to_string())
}
