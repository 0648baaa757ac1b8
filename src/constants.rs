// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

// Each block starts with the varint-encoded decoded length, followed by
// byte-aligned chunks. The low 2 bits of a chunk's first byte are its tag,
// the upper 6 bits (m) parametrize it.
//
// Literal: m < 60 means 1 + m literal bytes follow. Otherwise the next
// m - 59 bytes hold a little-endian n, and 1 + n literal bytes follow.
//
// Copy-1: length is 4 + the low 3 bits of m, the high 3 bits of m are bits
// 8-10 of the offset and the next byte is bits 0-7.
//
// Copy-2: length is 1 + m, offset is the next 2 bytes little-endian.
//
// Copy-4 is a legacy encoding and is rejected.

/// Tag for literal chunks
pub const TAG_LITERAL: u8 = 0x00;

/// Tag for copy with 1-byte offset (11 bits)
pub const TAG_COPY1: u8 = 0x01;

/// Tag for copy with 2-byte offset (16 bits)
pub const TAG_COPY2: u8 = 0x02;

/// Tag for copy with 4-byte offset (legacy, unsupported)
pub const TAG_COPY4: u8 = 0x03;

/// Largest decoded length a block may declare.
pub const MAX_BLOCK_LEN: usize = 0x7fff_ffff;

/// Inputs this short are always emitted as a single literal.
pub const MIN_MATCH_INPUT: usize = 4;

/// Copy back-references never reach further than this, same as the C++ code.
pub const MAX_OFFSET: usize = 1 << 15;

/// Hash table sizing bounds (log2).
pub const MIN_TABLE_BITS: u32 = 8;
pub const MAX_TABLE_BITS: u32 = 14;

/// Multiplier for the 4-byte prefix hash.
pub const HASH_MUL: u32 = 0x1e35_a7bd;

/// Longest copy a single tag-2 chunk can carry.
pub const MAX_COPY2_LEN: usize = 64;

/// Copy-1 covers lengths [4, 12) and offsets [0, 2048).
pub const MIN_COPY1_LEN: usize = 4;
pub const MAX_COPY1_LEN: usize = 11;
pub const MAX_COPY1_OFFSET: usize = 1 << 11;
