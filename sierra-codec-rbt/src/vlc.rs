// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The four-bit back-reference length table shared by the RBT LZS decoder and encoder.

use sierra_core::errors::Result;
use sierra_core::io::BitReader;

/// `(bit count, value)` for each of the 16 four-bit codes. Codes 0-11 decode in 2 bits; 12-14 in
/// 4 bits; 15 is an escape, extended by further 4-bit groups.
const LZS_VLC_TABLE: [(u32, u32); 16] = [
    (2, 2),
    (2, 2),
    (2, 2),
    (2, 2),
    (2, 3),
    (2, 3),
    (2, 3),
    (2, 3),
    (2, 4),
    (2, 4),
    (2, 4),
    (2, 4),
    (4, 5),
    (4, 6),
    (4, 7),
    (4, 8),
];

/// Decode a back-reference length: peek four bits to select a table entry, consume its bit
/// count, then if the escape value (8) was hit, keep reading 4-bit groups and accumulating them
/// until a group other than `0xF` appears.
pub fn decode_length(bits: &mut BitReader<'_>) -> Result<u32> {
    let vlc = bits.peek_bits(4)?;
    let (count, mut value) = LZS_VLC_TABLE[vlc as usize];
    bits.read_bits(count)?;

    if value == 8 {
        let mut group = vlc;
        while group == 0xF {
            group = bits.read_bits(4)?;
            value += group;
        }
    }

    Ok(value)
}

/// Encode a back-reference length using the same table, in reverse.
pub fn encode_length(writer: &mut sierra_core::io::BitWriter, length: u32) {
    match length {
        2..=4 => writer.put_bits(length - 2, 2),
        5..=7 => writer.put_bits(length + 7, 4),
        n => {
            writer.put_bits(0xF, 4);
            let mut remaining = n - 8;
            loop {
                if remaining < 0xF {
                    writer.put_bits(remaining, 4);
                    break;
                }
                writer.put_bits(0xF, 4);
                remaining -= 0xF;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sierra_core::io::BitWriter;

    #[test]
    fn round_trips_short_lengths() {
        for length in 2..=7u32 {
            let mut w = BitWriter::new();
            encode_length(&mut w, length);
            let bytes = w.into_bytes();
            let mut r = BitReader::new(&bytes);
            assert_eq!(decode_length(&mut r).unwrap(), length);
        }
    }

    #[test]
    fn round_trips_escaped_lengths() {
        for length in [8u32, 9, 22, 23, 37, 100] {
            let mut w = BitWriter::new();
            encode_length(&mut w, length);
            let bytes = w.into_bytes();
            let mut r = BitReader::new(&bytes);
            assert_eq!(decode_length(&mut r).unwrap(), length);
        }
    }
}
