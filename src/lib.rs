// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # Snappy Block Compression
//!
//! This library implements the Snappy block format: a varint length header
//! followed by literal and copy chunks. Blocks produced here are
//! byte-identical to those of the reference Snappy encoder, and any
//! conformant Snappy block can be decoded.
//!
//! The streaming/framing format is not implemented; [`masked_crc32c`] is
//! provided for framing layers built on top of these blocks.
//!
//! ## Example
//!
//! ```rust
//! use minsnappy::{compress, decompress};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!";
//! let compressed = compress(data).expect("compression failed");
//! let decompressed = decompress(&compressed).expect("decompression failed");
//! assert_eq!(data, &decompressed[..]);
//! ```

mod checksum;
mod compress;
mod constants;
mod decompress;
mod error;
mod varint;

pub use checksum::masked_crc32c;
pub use compress::{compress, max_compressed_len, Compressor};
pub use constants::MAX_BLOCK_LEN;
pub use decompress::{decompress, decompressed_len, Decompressor};
pub use error::{Error, Result};
