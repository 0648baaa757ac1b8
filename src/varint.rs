// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

/// Longest encoding of a u64.
pub const MAX_VARINT_LEN: usize = 10;

/// Why a varint could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// Input ended before a terminating byte.
    Truncated,
    /// Value does not fit in 64 bits; `read` bytes were examined.
    Overflow { read: usize },
}

impl fmt::Display for VarintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarintError::Truncated => write!(f, "varint truncated"),
            VarintError::Overflow { read } => {
                write!(f, "varint overflows 64 bits after {} bytes", read)
            }
        }
    }
}

impl std::error::Error for VarintError {}

/// Decode a varint from the beginning of the slice.
/// Returns (value, bytes_read)
pub fn decode_varint(src: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in src.iter().enumerate() {
        if byte < 0x80 {
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(VarintError::Overflow { read: i + 1 });
            }
            value |= (byte as u64) << shift;
            return Ok((value, i + 1));
        }

        if i >= MAX_VARINT_LEN - 1 {
            // a continuation on the 10th byte can only overflow
            return Err(VarintError::Overflow { read: i + 1 });
        }

        value |= ((byte & 0x7f) as u64) << shift;
        shift += 7;
    }

    Err(VarintError::Truncated)
}

/// Encode a varint into the buffer.
/// Returns the number of bytes written.
pub fn encode_varint(dst: &mut [u8], mut value: u64) -> usize {
    let mut i = 0;

    while value >= 0x80 {
        dst[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }

    dst[i] = value as u8;
    i + 1
}
