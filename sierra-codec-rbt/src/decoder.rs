// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The RBT video decoder: 24-byte frame header, fragment headers, and the LZS back-reference
//! bitstream.

use sierra_core::errors::{decode_error, Result};
use sierra_core::io::{BitReader, BufReader, ReadBytes};
use sierra_core::packet::Packet;
use sierra_core::palette::Palette;
use sierra_core::plane::Plane;

use crate::vlc::decode_length;

const VIDEO_HEADER_LEN: usize = 24;
const FRAGMENT_HEADER_LEN: usize = 10;

/// Decodes RBT video frames. Unlike VMD, each frame is fully self-contained: the reference
/// decoder allocates a fresh output buffer per frame and never references a previous frame's
/// pixels, so this decoder carries no cross-frame plane state.
pub struct RbtDecoder {
    palette: Palette,
}

impl RbtDecoder {
    pub fn new(palette: Palette) -> Self {
        RbtDecoder { palette }
    }

    fn decode_fragment_lzs(bits: &mut BitReader<'_>, decoded: &mut Vec<u8>, target_len: usize) -> Result<()> {
        while decoded.len() < target_len {
            let is_back_ref = bits.read_bit()?;
            if is_back_ref != 0 {
                let offset_type = bits.read_bit()?;
                let offset_bits = if offset_type != 0 { 7 } else { 11 };
                let offset = bits.read_bits(offset_bits)? as usize;
                let length = decode_length(bits)? as usize;

                if offset == 0 || offset > decoded.len() {
                    return decode_error("RBT back-reference offset precedes start of frame");
                }
                let start = decoded.len() - offset;
                for j in 0..length {
                    let b = decoded[start + j];
                    decoded.push(b);
                }
            } else {
                let b = bits.read_bits(8)? as u8;
                decoded.push(b);
            }
        }
        Ok(())
    }
}

impl sierra_core::codec::VideoDecoder for RbtDecoder {
    fn decode(&mut self, packet: &Packet) -> Result<sierra_core::codec::VideoFrame> {
        let buf = packet.buf();
        if buf.len() < VIDEO_HEADER_LEN {
            return decode_error("RBT frame shorter than its 24-byte header");
        }

        let mut r = BufReader::new(&buf[..VIDEO_HEADER_LEN]);
        r.ignore_bytes(3)?;
        let _scale = r.read_byte()?;
        let width = r.read_u16le()? as usize;
        let height = r.read_u16le()? as usize;
        r.ignore_bytes(4)?; // bytes 8..12: unaccounted reference fields
        let _x = r.read_u16le()?;
        let _y = r.read_u16le()?;
        let _compressed_size = r.read_u16le()?;
        let fragment_count = r.read_u16le()? as usize;

        let mut decoded = Vec::with_capacity(width * height);
        let mut pos = VIDEO_HEADER_LEN;

        for _ in 0..fragment_count {
            if pos + FRAGMENT_HEADER_LEN > buf.len() {
                return decode_error("RBT fragment header truncated");
            }
            let mut fh = BufReader::new(&buf[pos..pos + FRAGMENT_HEADER_LEN]);
            let fragment_compressed_size = fh.read_u32le()? as usize;
            let fragment_decompressed_size = fh.read_u32le()? as usize;
            let compression_type = fh.read_u16le()?;
            pos += FRAGMENT_HEADER_LEN;

            if pos + fragment_compressed_size > buf.len() {
                return decode_error("RBT fragment payload truncated");
            }
            let payload = &buf[pos..pos + fragment_compressed_size];

            let target_len = decoded.len() + fragment_decompressed_size;
            if compression_type == 0 {
                let mut bits = BitReader::new(payload);
                Self::decode_fragment_lzs(&mut bits, &mut decoded, target_len)?;
            } else {
                if payload.len() < fragment_decompressed_size {
                    return decode_error("RBT uncompressed fragment shorter than declared size");
                }
                decoded.extend_from_slice(&payload[..fragment_decompressed_size]);
            }

            pos += fragment_compressed_size;
        }

        if decoded.len() != width * height {
            return decode_error("RBT frame decoded to an unexpected pixel count");
        }

        let mut plane = Plane::new(width, height);
        plane.data_mut().copy_from_slice(&decoded);

        Ok(sierra_core::codec::VideoFrame { plane, palette: self.palette.clone() })
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use sierra_core::codec::VideoDecoder;
    use sierra_core::io::BitWriter;

    fn frame_with_fragment(width: u16, height: u16, fragment_payload: Vec<u8>, decompressed_size: u32) -> Vec<u8> {
        let mut buf = vec![0u8; VIDEO_HEADER_LEN];
        buf[3] = 0; // scale
        buf[4..6].copy_from_slice(&width.to_le_bytes());
        buf[6..8].copy_from_slice(&height.to_le_bytes());
        buf[16..18].copy_from_slice(&(fragment_payload.len() as u16).to_le_bytes());
        buf[18..20].copy_from_slice(&1u16.to_le_bytes()); // fragment_count = 1

        buf.extend_from_slice(&(fragment_payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&decompressed_size.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // compression type 0
        buf.extend_from_slice(&fragment_payload);
        buf
    }

    #[test]
    fn decodes_all_literal_fragment() {
        let mut w = BitWriter::new();
        for b in [1u32, 2, 3, 4] {
            w.put_bit(0);
            w.put_bits(b, 8);
        }
        let payload = w.into_bytes();

        let buf = frame_with_fragment(2, 2, payload, 4);
        let mut decoder = RbtDecoder::new(Palette::black());
        let frame = decoder.decode(&Packet::new(0, buf.into_boxed_slice())).unwrap();
        assert_eq!(frame.plane.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn decodes_back_reference_run() {
        let mut w = BitWriter::new();
        w.put_bit(0);
        w.put_bits(0x55, 8); // literal byte
                             // back-reference: type=1 (7-bit offset), offset=1, length=3
        w.put_bit(1);
        w.put_bit(1);
        w.put_bits(1, 7);
        crate::vlc::encode_length(&mut w, 3);
        let payload = w.into_bytes();

        let buf = frame_with_fragment(2, 2, payload, 4);
        let mut decoder = RbtDecoder::new(Palette::black());
        let frame = decoder.decode(&Packet::new(0, buf.into_boxed_slice())).unwrap();
        assert_eq!(frame.plane.data(), &[0x55, 0x55, 0x55, 0x55]);
    }
}
