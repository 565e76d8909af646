// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The VMD video encoder: palette quantization and method-2 (raw) frame emission.

use sierra_core::errors::{decode_error, Result};
use sierra_core::packet::{Packet, VmdSideData};
use sierra_core::palette::{scale_8_to_6, PaletteBuilder, PALETTE_COLORS};

/// Quantizes 24-bit BGR frames into palette-index planes and emits them as method-2 (raw) VMD
/// packets carrying a full side-data prefix.
///
/// Always emits raw, uncompressed frame payloads: the reference overlay tooling is the only
/// producer of the more elaborate method-1 interframe coding, and that logic lives with it in
/// `sierra-tool-subtitle` rather than in this general-purpose encoder.
pub struct VmdEncoder {
    width: usize,
    height: usize,
    palette: PaletteBuilder,
    first_frame: bool,
}

impl VmdEncoder {
    pub fn new(width: usize, height: usize) -> Self {
        VmdEncoder { width, height, palette: PaletteBuilder::new(), first_frame: true }
    }

    fn quantize(&mut self, bgr: &[u8]) -> Result<(Vec<u8>, bool, u8)> {
        let pixel_count = self.width * self.height;
        if bgr.len() != pixel_count * 3 {
            return decode_error("input frame is not width * height * 3 bytes of BGR");
        }

        let before = self.palette.len();
        let mut indices = vec![0u8; pixel_count];
        let mut overflowed = false;

        for (i, chunk) in bgr.chunks_exact(3).enumerate() {
            let (b, g, r) = (chunk[0], chunk[1], chunk[2]);
            let key =
                PaletteBuilder::key(scale_8_to_6(r), scale_8_to_6(g), scale_8_to_6(b));
            match self.palette.lookup_or_insert(key) {
                Some(index) => indices[i] = index,
                None => {
                    overflowed = true;
                    break;
                }
            }
        }

        if overflowed {
            self.palette.reset();
            for (i, chunk) in bgr.chunks_exact(3).enumerate() {
                let (b, g, r) = (chunk[0], chunk[1], chunk[2]);
                let key =
                    PaletteBuilder::key(scale_8_to_6(r), scale_8_to_6(g), scale_8_to_6(b));
                indices[i] = self
                    .palette
                    .lookup_or_insert(key)
                    .expect("palette was just reset to empty, cannot overflow immediately");
            }
            return Ok((indices, true, self.palette.len() as u8));
        }

        let after = self.palette.len();
        let new_entries = (after - before) as u8;
        Ok((indices, new_entries > 0, new_entries))
    }
}

impl sierra_core::codec::VideoEncoder for VmdEncoder {
    fn encode_bgr(&mut self, bgr: &[u8]) -> Result<Packet> {
        let (indices, new_palette, new_palette_entries) = self.quantize(bgr)?;

        let mut palette6 = [0u8; PALETTE_COLORS * 3];
        palette6.copy_from_slice(&self.palette.to_6bit_rgb());

        let side = VmdSideData {
            left: 0,
            top: 0,
            right: (self.width - 1) as u16,
            bottom: (self.height - 1) as u16,
            new_palette,
            new_palette_entries,
            palette6,
        };

        let mut out = Vec::with_capacity(VmdSideData::SIZE + 1 + indices.len());
        side.write_to(&mut out);
        out.push(2); // method 2: raw
        out.extend_from_slice(&indices);

        self.first_frame = false;
        Ok(Packet::new(0, out.into_boxed_slice()))
    }

    fn reset(&mut self) {
        self.palette.reset();
        self.first_frame = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sierra_core::codec::VideoEncoder;

    #[test]
    fn encodes_first_frame_as_raw_with_full_palette() {
        let mut encoder = VmdEncoder::new(2, 1);
        let bgr = [0, 0, 0, /* px1 bgr */ 255, 0, 0];
        let packet = encoder.encode_bgr(&bgr).unwrap();
        let (side, payload) = VmdSideData::read_from(packet.buf()).unwrap();
        assert!(side.new_palette);
        assert_eq!(payload[0], 2); // method byte
        assert_eq!(payload.len(), 1 + 2);
    }

    #[test]
    fn repeated_colors_do_not_grow_palette() {
        let mut encoder = VmdEncoder::new(1, 1);
        encoder.encode_bgr(&[10, 20, 30]).unwrap();
        let packet = encoder.encode_bgr(&[10, 20, 30]).unwrap();
        let (side, _) = VmdSideData::read_from(packet.buf()).unwrap();
        assert!(!side.new_palette);
        assert_eq!(side.new_palette_entries, 0);
    }

    #[test]
    fn rejects_wrong_sized_input() {
        let mut encoder = VmdEncoder::new(2, 2);
        assert!(encoder.encode_bgr(&[0, 0, 0]).is_err());
    }
}
