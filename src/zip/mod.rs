//! ZIP payload expansion.
//!
//! The ZIP slice recovered from a CRX container is parsed and written to disk
//! entirely from memory; no temporary file is involved.
//!
//! ## Architecture
//!
//! - [`structures`]: data structures for the ZIP format elements we touch
//!   (EOCD, central directory entries, compression methods)
//! - [`parser`]: locating and decoding those structures in a byte slice
//! - [`unpacker`]: writing every entry under a destination directory
//!
//! ## Parsing strategy
//!
//! ZIP files are designed to be read from the end: the End of Central
//! Directory (EOCD) record sits at the tail, points at the Central Directory,
//! and the Central Directory in turn points at each entry's local header and
//! data. The parser follows that chain over the in-memory slice.
//!
//! ## Limitations
//!
//! - STORED and DEFLATE entries only
//! - No ZIP64: extension packages are nowhere near 4 GiB
//! - No encryption, no multi-disk archives

mod parser;
mod structures;
mod unpacker;

pub use parser::ZipParser;
pub use structures::{CompressionMethod, ZipEntry};
pub use unpacker::unpack;
