// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The RBT video encoder: a single-pass run-length coder over a palette-index plane, packed into
//! the 24-byte frame header plus one LZS fragment.

use sierra_core::errors::{decode_error, Result};
use sierra_core::io::BitWriter;
use sierra_core::packet::Packet;

use crate::vlc::encode_length;

const VIDEO_HEADER_LEN: usize = 24;
const FRAGMENT_HEADER_LEN: usize = 10;

pub struct RbtEncoder {
    width: usize,
    height: usize,
}

impl RbtEncoder {
    pub fn new(width: usize, height: usize) -> Self {
        RbtEncoder { width, height }
    }

    fn compress(indices: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::new();
        let mut i = 0;
        while i < indices.len() {
            let value = indices[i];
            let mut run = 1;
            while i + run < indices.len() && indices[i + run] == value {
                run += 1;
            }

            match run {
                1 => {
                    writer.put_bit(0);
                    writer.put_bits(value as u32, 8);
                }
                2 => {
                    writer.put_bit(0);
                    writer.put_bits(value as u32, 8);
                    writer.put_bit(0);
                    writer.put_bits(value as u32, 8);
                }
                _ => {
                    writer.put_bit(0);
                    writer.put_bits(value as u32, 8);
                    writer.put_bit(1); // back-reference
                    writer.put_bit(1); // offset_type = 1 -> 7-bit offset
                    writer.put_bits(1, 7); // offset = 1
                    encode_length(&mut writer, (run - 1) as u32);
                }
            }

            i += run;
        }
        writer.into_bytes()
    }

    /// Encode one full-frame palette-index plane as a single-fragment RBT video frame.
    pub fn encode_indices(&self, indices: &[u8]) -> Result<Packet> {
        if indices.len() != self.width * self.height {
            return decode_error("RBT encoder input is not width * height indices");
        }

        let payload = Self::compress(indices);

        let mut out = Vec::with_capacity(VIDEO_HEADER_LEN + FRAGMENT_HEADER_LEN + payload.len());

        let mut header = [0u8; VIDEO_HEADER_LEN];
        header[3] = 0; // scale
        header[4..6].copy_from_slice(&(self.width as u16).to_le_bytes());
        header[6..8].copy_from_slice(&(self.height as u16).to_le_bytes());
        header[12..14].copy_from_slice(&0u16.to_le_bytes()); // origin x
        header[14..16].copy_from_slice(&0u16.to_le_bytes()); // origin y
        header[16..18].copy_from_slice(&(payload.len() as u16).to_le_bytes());
        header[18..20].copy_from_slice(&1u16.to_le_bytes()); // fragment count
        out.extend_from_slice(&header);

        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(indices.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // compression type 0
        out.extend_from_slice(&payload);

        Ok(Packet::new(0, out.into_boxed_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::RbtDecoder;
    use sierra_core::codec::VideoDecoder;
    use sierra_core::palette::Palette;

    #[test]
    fn round_trips_through_decoder() {
        let indices = [1u8, 1, 1, 1, 2, 3, 3, 9, 9, 9, 9, 9];
        let encoder = RbtEncoder::new(4, 3);
        let packet = encoder.encode_indices(&indices).unwrap();

        let mut decoder = RbtDecoder::new(Palette::black());
        let frame = decoder.decode(&packet).unwrap();
        assert_eq!(frame.plane.data(), &indices);
    }

    #[test]
    fn rejects_mismatched_length() {
        let encoder = RbtEncoder::new(2, 2);
        assert!(encoder.encode_indices(&[0u8; 3]).is_err());
    }
}
