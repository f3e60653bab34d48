//! # crxget
//!
//! Download Chrome extension CRX packages and unpack them into a directory
//! tree.
//!
//! A CRX file is a ZIP archive wrapped in a signing envelope. This library
//! fetches the container from the vendor update service by extension ID,
//! strips the envelope (supporting both the CRX2 and CRX3 container
//! versions), and expands the embedded ZIP payload onto disk — all from
//! memory, with no temporary file.
//!
//! ## Features
//!
//! - Fetch packages from the update service with manual redirect handling
//! - Decode CRX2 (key/signature pair) and CRX3 (self-sized header) envelopes
//! - In-memory ZIP expansion with STORED and DEFLATE support
//! - Tagged errors that distinguish network, container-format, and archive
//!   failures
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use crxget::{UpdateClient, download_extension};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = UpdateClient::new()?;
//!
//!     let result =
//!         download_extension(&client, "cfhdojbkjhnklbpkdaibdccddilifddb", Path::new(".")).await?;
//!     println!("{} files in {}", result.files_extracted, result.output_dir.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod crx;
pub mod download;
pub mod error;
pub mod fetch;
pub mod zip;

pub use cli::Cli;
pub use download::{ExtractionResult, download_extension};
pub use error::{ArchiveError, DownloadError, FormatError, NetworkError};
pub use fetch::{PackageSource, UpdateClient};
pub use zip::unpack;
