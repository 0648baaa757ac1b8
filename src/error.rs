// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

use crate::varint::VarintError;

/// Result type for Snappy block operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Snappy compression/decompression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input data is corrupt
    Corrupt,

    /// The decoded block is too large
    TooLarge,

    /// The input uses an encoding this codec does not support
    Unsupported,

    /// Caller-supplied buffer too small
    BufferTooSmall,

    /// Invalid input to the compressor
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Corrupt => write!(f, "snappy: corrupt input"),
            Error::TooLarge => write!(f, "snappy: decoded block is too large"),
            Error::Unsupported => write!(f, "snappy: unsupported input"),
            Error::BufferTooSmall => write!(f, "snappy: buffer too small"),
            Error::InvalidInput(msg) => write!(f, "snappy: invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<VarintError> for Error {
    fn from(_: VarintError) -> Self {
        Error::Corrupt
    }
}
