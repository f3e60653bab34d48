use crate::error::FormatError;

/// ASCII signature at the start of every CRX container.
pub const CRX_MAGIC: &[u8] = b"Cr24";

/// Parsed CRX envelope, one variant per supported format version.
///
/// Holds only the declared field values; the key/signature/header bytes
/// themselves are never materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrxHeader {
    /// Version 2: explicit public key and signature lengths at offsets 8 and 12.
    V2 {
        public_key_len: u32,
        signature_len: u32,
    },
    /// Version 3: a single self-sized header block at offset 8.
    V3 { header_size: u32 },
}

impl CrxHeader {
    /// Fixed prefix shared by both versions: magic + version field.
    pub const PREFIX_SIZE: usize = 8;
    /// Minimum container length for a version 2 envelope.
    pub const V2_MIN_SIZE: usize = 16;
    /// Minimum container length for a version 3 envelope.
    pub const V3_MIN_SIZE: usize = 12;

    /// Parse the envelope from the front of a container buffer.
    ///
    /// Checks the magic, reads the version field, and reads the
    /// version-specific length fields. Declared lengths are trusted as-is;
    /// bounds against the actual buffer are checked later when the payload
    /// offset is computed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < CRX_MAGIC.len() || &data[..CRX_MAGIC.len()] != CRX_MAGIC {
            return Err(FormatError::BadMagic);
        }

        if data.len() < Self::PREFIX_SIZE {
            return Err(truncated(Self::PREFIX_SIZE, data.len()));
        }
        let version = read_u32_le(data, 4);

        match version {
            2 => {
                if data.len() < Self::V2_MIN_SIZE {
                    return Err(truncated(Self::V2_MIN_SIZE, data.len()));
                }
                Ok(CrxHeader::V2 {
                    public_key_len: read_u32_le(data, 8),
                    signature_len: read_u32_le(data, 12),
                })
            }
            3 => {
                if data.len() < Self::V3_MIN_SIZE {
                    return Err(truncated(Self::V3_MIN_SIZE, data.len()));
                }
                Ok(CrxHeader::V3 {
                    header_size: read_u32_le(data, 8),
                })
            }
            version => Err(FormatError::UnsupportedVersion { version }),
        }
    }

    /// Byte offset at which the embedded ZIP payload begins.
    ///
    /// Computed from the declared envelope lengths as a `u64` so oversized
    /// declared fields cannot wrap around on 32-bit targets.
    pub fn payload_offset(&self) -> u64 {
        match *self {
            CrxHeader::V2 {
                public_key_len,
                signature_len,
            } => Self::V2_MIN_SIZE as u64 + public_key_len as u64 + signature_len as u64,
            CrxHeader::V3 { header_size } => Self::V3_MIN_SIZE as u64 + header_size as u64,
        }
    }
}

fn truncated(needed: usize, actual: usize) -> FormatError {
    FormatError::Truncated {
        needed: needed as u64,
        actual: actual as u64,
    }
}

/// Read a little-endian u32 at a fixed offset. Caller has verified bounds.
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
