// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use log::trace;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::varint::encode_varint;

/// Marks a hash table slot that holds no position yet.
const EMPTY_SLOT: u32 = u32::MAX;

/// Compressor for Snappy blocks
///
/// Holds the match-finder hash table so repeated calls can reuse its
/// allocation. Output is identical whether a `Compressor` is reused or a
/// fresh one is used for every block.
///
/// # Example
///
/// ```
/// use minsnappy::{decompress, Compressor};
///
/// let mut compressor = Compressor::new();
/// for msg in [&b"first message"[..], &b"second message"[..]] {
///     let block = compressor.compress(msg).unwrap();
///     assert_eq!(decompress(&block).unwrap(), msg);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    table: Vec<u32>,
}

impl Compressor {
    /// Create a new compressor
    pub fn new() -> Self {
        Compressor { table: Vec::new() }
    }

    /// Compress src into a newly allocated block.
    pub fn compress(&mut self, src: &[u8]) -> Result<Vec<u8>> {
        let mut dst = vec![0u8; max_compressed_len(src.len())?];
        let n = self.compress_into(&mut dst, src)?;
        dst.truncate(n);
        Ok(dst)
    }

    /// Compress src into dst and return the number of bytes written.
    ///
    /// dst must hold at least `max_compressed_len(src.len())` bytes.
    pub fn compress_into(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let max_len = max_compressed_len(src.len())?;
        if dst.len() < max_len {
            return Err(Error::BufferTooSmall);
        }

        // Write the varint-encoded length of the decompressed bytes
        let mut d = encode_varint(dst, src.len() as u64);

        if src.len() <= MIN_MATCH_INPUT {
            if !src.is_empty() {
                d += emit_literal(&mut dst[d..], src)?;
            }
            return Ok(d);
        }

        d += self.encode_block(&mut dst[d..], src)?;

        trace!("compressed {} bytes into {}", src.len(), d);
        Ok(d)
    }

    /// Greedy single-probe match finder. Only the most recent position per
    /// bucket is kept and the first verified 4-byte hit is taken.
    fn encode_block(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let table_bits = table_bits(src.len());
        let shift = 32 - table_bits;

        self.table.clear();
        self.table.resize(1 << table_bits, EMPTY_SLOT);
        let table = &mut self.table[..];

        let mut d = 0;
        let mut lit = 0; // start of pending literal bytes
        let mut s = 0;

        while s + 3 < src.len() {
            let cur = load32(src, s);
            let h = hash(cur, shift);
            let candidate = table[h];
            table[h] = s as u32;

            if candidate == EMPTY_SLOT {
                s += 1;
                continue;
            }

            let mut t = candidate as usize;
            if s - t >= MAX_OFFSET || cur != load32(src, t) {
                s += 1;
                continue;
            }

            if lit != s {
                d += emit_literal(&mut dst[d..], &src[lit..s])?;
            }

            // Extend the match forward
            let base = s;
            s += 4;
            t += 4;
            while s < src.len() && src[s] == src[t] {
                s += 1;
                t += 1;
            }

            d += emit_copy(&mut dst[d..], s - t, s - base);
            lit = s;
        }

        if lit != src.len() {
            d += emit_literal(&mut dst[d..], &src[lit..])?;
        }

        Ok(d)
    }
}

/// Compress returns the encoded form of src as a Snappy block.
///
/// The output is byte-identical to the reference Snappy block encoder.
pub fn compress(src: &[u8]) -> Result<Vec<u8>> {
    Compressor::new().compress(src)
}

/// Returns the maximum length of a compressed block, given its
/// uncompressed length.
pub fn max_compressed_len(src_len: usize) -> Result<usize> {
    if src_len > MAX_BLOCK_LEN {
        return Err(Error::InvalidInput(format!(
            "source length {} exceeds maximum block length {}",
            src_len, MAX_BLOCK_LEN
        )));
    }

    Ok(32 + src_len + src_len / 6)
}

/// log2 of the smallest power of two in [256, 16384] that is >= src_len,
/// capped at 16384.
fn table_bits(src_len: usize) -> u32 {
    let mut bits = MIN_TABLE_BITS;
    while bits < MAX_TABLE_BITS && (1usize << bits) < src_len {
        bits += 1;
    }
    bits
}

#[inline]
fn hash(u: u32, shift: u32) -> usize {
    (u.wrapping_mul(HASH_MUL) >> shift) as usize
}

/// Load a u32 from the slice at the given offset
#[inline]
fn load32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Emit a literal chunk and return the number of bytes written
fn emit_literal(dst: &mut [u8], lit: &[u8]) -> Result<usize> {
    let n = (lit.len() - 1) as u64;

    let i = match n {
        0..=59 => {
            dst[0] = ((n as u8) << 2) | TAG_LITERAL;
            1
        }
        60..=0xff => {
            dst[0] = (60 << 2) | TAG_LITERAL;
            dst[1] = n as u8;
            2
        }
        0x100..=0xffff => {
            dst[0] = (61 << 2) | TAG_LITERAL;
            dst[1..3].copy_from_slice(&(n as u16).to_le_bytes());
            3
        }
        0x1_0000..=0xff_ffff => {
            dst[0] = (62 << 2) | TAG_LITERAL;
            dst[1..4].copy_from_slice(&(n as u32).to_le_bytes()[..3]);
            4
        }
        0x100_0000..=0xffff_ffff => {
            dst[0] = (63 << 2) | TAG_LITERAL;
            dst[1..5].copy_from_slice(&(n as u32).to_le_bytes());
            5
        }
        // max_compressed_len already rejects inputs this long.
        _ => {
            return Err(Error::InvalidInput(format!(
                "literal of {} bytes is too long",
                lit.len()
            )));
        }
    };

    dst[i..i + lit.len()].copy_from_slice(lit);
    Ok(i + lit.len())
}

/// Emit a copy as one or more copy chunks and return the number of bytes
/// written. A tag-1 chunk, when used, is always the last one.
fn emit_copy(dst: &mut [u8], offset: usize, mut length: usize) -> usize {
    let mut i = 0;

    while length > 0 {
        if (MIN_COPY1_LEN..=MAX_COPY1_LEN).contains(&length) && offset < MAX_COPY1_OFFSET {
            dst[i] = ((offset >> 8) << 5 | (length - MIN_COPY1_LEN) << 2) as u8 | TAG_COPY1;
            dst[i + 1] = offset as u8;
            i += 2;
            break;
        }

        let x = length.min(MAX_COPY2_LEN);
        dst[i] = ((x - 1) << 2) as u8 | TAG_COPY2;
        dst[i + 1..i + 3].copy_from_slice(&(offset as u16).to_le_bytes());
        i += 3;
        length -= x;
    }

    i
}
