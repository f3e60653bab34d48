//! Error taxonomy for the download pipeline.
//!
//! Each pipeline stage has its own error type so callers can tell a transport
//! failure from a malformed container from a corrupt archive. [`DownloadError`]
//! is the union returned by the whole pipeline; every variant carries enough
//! context (status code, offending version, underlying cause) to be shown to
//! the user as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while fetching the container from the update service.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The server answered with a non-success, non-redirect status.
    #[error("update service returned HTTP {status}")]
    Status { status: u16 },

    /// Redirect chain exceeded the depth cap.
    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },

    /// A redirect `Location` header could not be resolved into a URL.
    #[error("invalid redirect target {location:?}")]
    BadRedirect { location: String },

    /// Transport-level failure: DNS, connection reset, timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures while decoding the CRX container envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The buffer does not start with the `Cr24` signature.
    #[error("not a CRX container: missing Cr24 magic number")]
    BadMagic,

    /// The version field is neither 2 nor 3.
    #[error("unsupported CRX version: {version}")]
    UnsupportedVersion { version: u32 },

    /// The container ends before the declared archive offset.
    #[error("truncated CRX container: need {needed} bytes, have {actual}")]
    Truncated { needed: u64, actual: u64 },
}

/// Failures while expanding the embedded ZIP archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The payload is not a structurally valid ZIP archive.
    #[error("corrupt ZIP archive: {0}")]
    Corrupt(String),

    /// An entry uses a compression method other than STORED or DEFLATE.
    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u16),

    /// An entry name would escape the destination directory.
    #[error("refusing to extract unsafe path {0:?}")]
    UnsafePath(PathBuf),

    /// Filesystem failure while writing extracted entries.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Union of all pipeline failures, tagged by stage.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download failed: {0}")]
    Network(#[from] NetworkError),

    #[error("invalid CRX container: {0}")]
    Format(#[from] FormatError),

    #[error("extraction failed: {0}")]
    Archive(#[from] ArchiveError),
}
