//! CRX container parsing.
//!
//! A CRX file is a ZIP archive wrapped in a signing envelope. The envelope
//! changed shape between format versions:
//!
//! - **CRX2** carries a raw RSA public key and signature, each preceded by an
//!   explicit length field.
//! - **CRX3** replaces the pair with a single self-sized header block
//!   (a protobuf message) that this crate skips without parsing.
//!
//! Both versions share the same prefix:
//!
//! ```text
//! offset 0..4   magic "Cr24"
//! offset 4..8   format version (u32 LE)
//! offset 8..    version-specific envelope, then the ZIP payload
//! ```
//!
//! The decoder's only job is locating the ZIP boundary; it is deliberately
//! agnostic to everything before it. Signatures are not verified.

mod decoder;
mod header;

pub use decoder::zip_payload;
pub use header::{CRX_MAGIC, CrxHeader};
