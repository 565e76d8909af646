// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `packet` module defines the packet structure passed between a codec and a container
//! muxer/demuxer, and the VMD-specific side-data prefix that travels alongside it.

use crate::errors::{decode_error, Result};
use crate::io::{BufReader, ReadBytes};
use crate::palette::PALETTE_COLORS;

/// A `Packet` contains one discrete, encoded frame's worth of data for a single stream.
#[derive(Clone)]
pub struct Packet {
    track_id: u32,
    data: Box<[u8]>,
}

impl Packet {
    /// Create a new packet for the given track.
    pub fn new(track_id: u32, data: impl Into<Box<[u8]>>) -> Self {
        Packet { track_id, data: data.into() }
    }

    /// The track identifier of the track this packet belongs to.
    #[inline]
    pub const fn track_id(&self) -> u32 {
        self.track_id
    }

    /// An immutable view of the packet's data buffer.
    #[inline]
    pub fn buf(&self) -> &[u8] {
        &self.data
    }

    /// A `BufReader` over the packet's data buffer.
    #[inline]
    pub fn as_buf_reader(&self) -> BufReader<'_> {
        BufReader::new(&self.data)
    }
}

/// The fixed-size side-data prefix a VMD encoder attaches to every video packet ahead of the
/// compressed payload, consumed by the VMD container muxer.
///
/// Coordinates are serialized big-endian, reproducing the reference encoder bit-exact; every
/// other field here is little-endian or a raw byte run.
#[derive(Clone)]
pub struct VmdSideData {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub new_palette: bool,
    pub new_palette_entries: u8,
    /// 768 bytes of 6-bit RGB triples, in palette index order.
    pub palette6: [u8; PALETTE_COLORS * 3],
}

impl VmdSideData {
    /// Size, in bytes, of the serialized side-data prefix.
    pub const SIZE: usize = 2 * 4 + 1 + 1 + PALETTE_COLORS * 3;

    /// Serialize the side-data prefix, appending it to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.left.to_be_bytes());
        out.extend_from_slice(&self.top.to_be_bytes());
        out.extend_from_slice(&self.right.to_be_bytes());
        out.extend_from_slice(&self.bottom.to_be_bytes());
        out.push(self.new_palette as u8);
        out.push(self.new_palette_entries);
        out.extend_from_slice(&self.palette6);
    }

    /// Parse the side-data prefix from the front of `buf`, returning it along with the remaining
    /// (compressed payload) bytes.
    pub fn read_from(buf: &[u8]) -> Result<(VmdSideData, &[u8])> {
        if buf.len() < Self::SIZE {
            return decode_error("packet shorter than VMD side-data prefix");
        }
        let mut r = BufReader::new(&buf[..Self::SIZE]);
        let left = r.read_u16be()?;
        let top = r.read_u16be()?;
        let right = r.read_u16be()?;
        let bottom = r.read_u16be()?;
        let new_palette = r.read_byte()? != 0;
        let new_palette_entries = r.read_byte()?;
        let mut palette6 = [0u8; PALETTE_COLORS * 3];
        r.read_buf_exact(&mut palette6)?;
        let side =
            VmdSideData { left, top, right, bottom, new_palette, new_palette_entries, palette6 };
        Ok((side, &buf[Self::SIZE..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_data_round_trips() {
        let side = VmdSideData {
            left: 1,
            top: 2,
            right: 3,
            bottom: 4,
            new_palette: true,
            new_palette_entries: 5,
            palette6: [0u8; PALETTE_COLORS * 3],
        };
        let mut buf = Vec::new();
        side.write_to(&mut buf);
        buf.extend_from_slice(b"payload");

        let (parsed, rest) = VmdSideData::read_from(&buf).unwrap();
        assert_eq!(parsed.left, 1);
        assert_eq!(parsed.bottom, 4);
        assert!(parsed.new_palette);
        assert_eq!(parsed.new_palette_entries, 5);
        assert_eq!(rest, b"payload");
    }
}
