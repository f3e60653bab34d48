//! Locating the ZIP payload inside a CRX container.

use crate::error::FormatError;

use super::header::CrxHeader;

/// Strip the CRX signing envelope and return the embedded ZIP payload.
///
/// Parses the envelope from the front of `container`, computes the payload
/// offset from the declared lengths, and bounds-checks it against the actual
/// buffer before slicing. A container whose declared envelope runs past the
/// end of the buffer fails with [`FormatError::Truncated`] instead of
/// producing an empty or out-of-range slice.
///
/// The returned slice borrows from `container`; no bytes are copied. Whether
/// the payload is actually a well-formed ZIP archive is the expander's
/// problem, not checked here.
///
/// # Example
///
/// ```
/// use crxget::crx::zip_payload;
///
/// let mut container = Vec::new();
/// container.extend_from_slice(b"Cr24");
/// container.extend_from_slice(&3u32.to_le_bytes()); // version
/// container.extend_from_slice(&4u32.to_le_bytes()); // header size
/// container.extend_from_slice(&[0xAA; 4]);          // opaque header block
/// container.extend_from_slice(b"PK\x03\x04");       // payload starts here
///
/// let payload = zip_payload(&container).unwrap();
/// assert_eq!(payload, b"PK\x03\x04");
/// ```
pub fn zip_payload(container: &[u8]) -> Result<&[u8], FormatError> {
    let header = CrxHeader::from_bytes(container)?;
    let offset = header.payload_offset();

    if offset > container.len() as u64 {
        return Err(FormatError::Truncated {
            needed: offset,
            actual: container.len() as u64,
        });
    }

    Ok(&container[offset as usize..])
}
