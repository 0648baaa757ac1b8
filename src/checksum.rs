// Copyright 2024 Karpeles Lab Inc.
// Based on the Snappy compression format by Google
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Masked CRC-32C checksum for framing layers
//!
//! This implements the checksum specified in section 3 of
//! https://github.com/google/snappy/blob/master/framing_format.txt
//! The block codec itself never checksums anything.

use ::crc::crc32;

/// Added after rotation so that checksums of data containing
/// embedded checksums stay well distributed.
const MASK_DELTA: u32 = 0xa282_ead8;

/// Calculate the masked CRC-32C (Castagnoli) checksum of data
pub fn masked_crc32c(data: &[u8]) -> u32 {
    let c = crc32::checksum_castagnoli(data);
    c.rotate_right(15).wrapping_add(MASK_DELTA)
}
