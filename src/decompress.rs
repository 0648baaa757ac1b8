// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use log::debug;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::varint::decode_varint;

/// Decompressor for Snappy blocks
///
/// A block declares its decoded length up front, and the output buffer is
/// allocated from that number before any chunk is read. When decoding
/// untrusted data, use [`Decompressor::with_max_len`] to bound that
/// allocation.
///
/// # Example
///
/// ```
/// use minsnappy::Decompressor;
///
/// let block = [0x05, 0x10, b'h', b'e', b'l', b'l', b'o'];
/// let decompressor = Decompressor::with_max_len(1 << 20);
/// assert_eq!(decompressor.decompress(&block).unwrap(), b"hello");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decompressor {
    max_len: usize,
}

impl Decompressor {
    /// Create a decompressor accepting any length the format allows
    pub fn new() -> Self {
        Decompressor {
            max_len: MAX_BLOCK_LEN,
        }
    }

    /// Create a decompressor rejecting blocks that declare more than
    /// `max_len` decoded bytes
    pub fn with_max_len(max_len: usize) -> Self {
        Decompressor {
            max_len: max_len.min(MAX_BLOCK_LEN),
        }
    }

    /// The largest decoded length this decompressor accepts
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Decompress a whole block into a newly allocated buffer.
    pub fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        let (dlen, header_len) = self.checked_len(src)?;

        let mut dst = vec![0u8; dlen];
        decode_chunks(&mut dst, &src[header_len..])?;

        Ok(dst)
    }

    /// Decompress into a pre-allocated destination buffer.
    /// Returns the number of bytes written to dst.
    pub fn decompress_into(&self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let (dlen, header_len) = self.checked_len(src)?;

        if dst.len() < dlen {
            return Err(Error::BufferTooSmall);
        }

        decode_chunks(&mut dst[..dlen], &src[header_len..])?;

        Ok(dlen)
    }

    fn checked_len(&self, src: &[u8]) -> Result<(usize, usize)> {
        let (dlen, header_len) = decompressed_len(src)?;

        if dlen > self.max_len {
            debug!(
                "block declares {} decoded bytes, limit is {}",
                dlen, self.max_len
            );
            return Err(Error::TooLarge);
        }

        Ok((dlen, header_len))
    }
}

impl Default for Decompressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decompress returns the decoded form of a Snappy block.
///
/// Fails rather than returning a partial buffer; on success the output is
/// exactly as long as the block header declares.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>> {
    Decompressor::new().decompress(src)
}

/// Returns the length of the decoded block and the number of bytes
/// that the length header occupied.
pub fn decompressed_len(src: &[u8]) -> Result<(usize, usize)> {
    let (v, n) = decode_varint(src).map_err(|e| {
        debug!("invalid block header: {}", e);
        Error::from(e)
    })?;

    if v > MAX_BLOCK_LEN as u64 {
        debug!("block declares {} decoded bytes", v);
        return Err(Error::TooLarge);
    }

    Ok((v as usize, n))
}

/// Replay the chunk stream in src into dst, which must be exactly the
/// declared length.
fn decode_chunks(dst: &mut [u8], src: &[u8]) -> Result<()> {
    let mut d = 0; // destination index
    let mut s = 0; // source index

    while s < src.len() {
        let (length, offset) = match src[s] & 0x03 {
            TAG_LITERAL => {
                let (length, header_len) = decode_literal_length(&src[s..])?;
                s += header_len;

                if length > dst.len() - d || length > src.len() - s {
                    debug!(
                        "literal of {} bytes at src={} overruns block (dst left {}, src left {})",
                        length,
                        s,
                        dst.len() - d,
                        src.len() - s
                    );
                    return Err(Error::Corrupt);
                }

                dst[d..d + length].copy_from_slice(&src[s..s + length]);
                d += length;
                s += length;
                continue;
            }
            TAG_COPY1 => {
                let (length, offset) = decode_copy1(&src[s..])?;
                s += 2;
                (length, offset)
            }
            TAG_COPY2 => {
                let (length, offset) = decode_copy2(&src[s..])?;
                s += 3;
                (length, offset)
            }
            TAG_COPY4 => {
                debug!("legacy copy-4 chunk at src={}", s);
                return Err(Error::Unsupported);
            }
            _ => unreachable!(),
        };

        if offset > d || length > dst.len() - d {
            debug!(
                "copy length={} offset={} at dst={} is out of range (dst len {})",
                length,
                offset,
                d,
                dst.len()
            );
            return Err(Error::Corrupt);
        }

        if offset == 0 {
            // A zero offset reads the bytes it is writing, which start out zeroed.
            dst[d..d + length].fill(0);
        } else {
            copy_within(dst, d, offset, length);
        }
        d += length;
    }

    if d != dst.len() {
        debug!("decoded {} bytes, block declares {}", d, dst.len());
        return Err(Error::Corrupt);
    }

    Ok(())
}

/// Decode the length of a literal chunk
/// Returns (length, bytes_consumed)
fn decode_literal_length(src: &[u8]) -> Result<(usize, usize)> {
    let m = src[0] >> 2;

    let (x, header_len) = match m {
        0..=59 => (m as u32, 1),
        60 => {
            if src.len() < 2 {
                return Err(Error::Corrupt);
            }
            (src[1] as u32, 2)
        }
        61 => {
            if src.len() < 3 {
                return Err(Error::Corrupt);
            }
            (u16::from_le_bytes([src[1], src[2]]) as u32, 3)
        }
        62 => {
            if src.len() < 4 {
                return Err(Error::Corrupt);
            }
            (u32::from_le_bytes([src[1], src[2], src[3], 0]), 4)
        }
        _ => {
            if src.len() < 5 {
                return Err(Error::Corrupt);
            }
            (u32::from_le_bytes([src[1], src[2], src[3], src[4]]), 5)
        }
    };

    // Only reachable on targets where usize is 32 bits wide.
    let length = (x as usize).checked_add(1).ok_or(Error::Unsupported)?;

    Ok((length, header_len))
}

/// Decode a COPY1 tag
/// Returns (length, offset)
fn decode_copy1(src: &[u8]) -> Result<(usize, usize)> {
    if src.len() < 2 {
        return Err(Error::Corrupt);
    }

    let length = MIN_COPY1_LEN + ((src[0] >> 2) & 0x07) as usize;
    let offset = ((src[0] as usize & 0xe0) << 3) | (src[1] as usize);

    Ok((length, offset))
}

/// Decode a COPY2 tag
/// Returns (length, offset)
fn decode_copy2(src: &[u8]) -> Result<(usize, usize)> {
    if src.len() < 3 {
        return Err(Error::Corrupt);
    }

    let length = 1 + (src[0] >> 2) as usize;
    let offset = u16::from_le_bytes([src[1], src[2]]) as usize;

    Ok((length, offset))
}

/// Copy data within the same buffer, handling overlapping regions correctly.
/// Overlapping copies repeat the pattern, so they go byte by byte.
#[inline]
fn copy_within(dst: &mut [u8], d: usize, offset: usize, length: usize) {
    let src_start = d - offset;

    if offset >= length {
        dst.copy_within(src_start..src_start + length, d);
    } else {
        for i in 0..length {
            dst[d + i] = dst[src_start + i];
        }
    }
}
