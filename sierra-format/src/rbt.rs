// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The RBT container: a 60-byte header, an unknown chunk, a palette chunk, two frame-size
//! tables, an unknown table, and padding out to a 0x800 boundary.

use std::io::{Read, Seek, SeekFrom};

use sierra_core::errors::Result;
use sierra_core::io::{BufReader, ReadBytes};
use sierra_core::packet::Packet;
use sierra_core::palette::{scale_6_to_8, Palette};

const HEADER_LEN: usize = 60;
const UNKNOWN_TABLE_SIZE: i64 = 1024 + 512;
const SECTOR_SIZE: u64 = 0x800;

/// Reads an RBT container's header, palette chunk, and frame-size table, exposing each frame's
/// raw (audio + video) payload by index.
pub struct RbtReader<R> {
    src: R,
    pub frame_count: usize,
    pub palette: Palette,
    frame_sizes: Vec<u16>,
    frame_offsets: Vec<u64>,
}

impl<R: Read + Seek> RbtReader<R> {
    pub fn open(mut src: R) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        src.read_exact(&mut header)?;

        let mut r = BufReader::new(&header);
        r.ignore_bytes(6)?;
        let _version = r.read_u16le()?;
        let _audio_chunk_size = r.read_u16le()?;
        r.ignore_bytes(4)?; // offsets 10..14
        let frame_count = r.read_u16le()? as usize;
        let palette_data_size = r.read_u16le()? as usize;
        let unknown_chunk_size = r.read_u16le()? as usize;

        if unknown_chunk_size > 0 {
            src.seek(SeekFrom::Current(unknown_chunk_size as i64))?;
        }

        let mut palette_chunk = vec![0u8; palette_data_size];
        src.read_exact(&mut palette_chunk)?;
        let palette = parse_palette_chunk(&palette_chunk)?;

        // The reference reader loads both frame-size tables into the same buffer and only the
        // second (actual per-frame byte size) survives; the first is skipped outright.
        src.seek(SeekFrom::Current((frame_count * 2) as i64))?;

        let mut frame_table = vec![0u8; frame_count * 2];
        src.read_exact(&mut frame_table)?;
        let frame_sizes: Vec<u16> =
            frame_table.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();

        src.seek(SeekFrom::Current(UNKNOWN_TABLE_SIZE))?;

        let pos = src.stream_position()?;
        let padding = (SECTOR_SIZE - (pos % SECTOR_SIZE)) % SECTOR_SIZE;
        src.seek(SeekFrom::Current(padding as i64))?;

        let mut frame_offsets = Vec::with_capacity(frame_count);
        let mut offset = src.stream_position()?;
        for &size in &frame_sizes {
            frame_offsets.push(offset);
            offset += size as u64;
        }

        Ok(RbtReader { src, frame_count, palette, frame_sizes, frame_offsets })
    }

    pub fn frame_size(&self, index: usize) -> usize {
        self.frame_sizes[index] as usize
    }

    /// Read one frame's entire raw payload (audio and video interleaved, as laid out on disk).
    pub fn read_frame(&mut self, index: usize) -> Result<Packet> {
        let offset = self.frame_offsets[index];
        let size = self.frame_sizes[index] as usize;
        self.src.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; size];
        self.src.read_exact(&mut buf)?;
        Ok(Packet::new(0, buf.into_boxed_slice()))
    }
}

fn parse_palette_chunk(chunk: &[u8]) -> Result<Palette> {
    let first_palette_index = chunk[25] as usize;
    let palette_count = u16::from_le_bytes([chunk[29], chunk[30]]) as usize;
    let palette_type = chunk[32];
    let mut index = if palette_type == 0 { 38 } else { 37 };

    let mut palette = Palette::black();
    for i in first_palette_index..first_palette_index + palette_count {
        let r = chunk[index];
        let g = chunk[index + 1];
        let b = chunk[index + 2];
        index += 3;
        palette.set_entry(i as u8, scale_6_to_8(r), scale_6_to_8(g), scale_6_to_8(b));
    }

    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_rbt(frame_payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[14..16].copy_from_slice(&1u16.to_le_bytes()); // frame_count = 1
        buf[16..18].copy_from_slice(&41u16.to_le_bytes()); // palette_data_size
        buf[18..20].copy_from_slice(&0u16.to_le_bytes()); // unknown_chunk_size

        let mut palette_chunk = vec![0u8; 41];
        palette_chunk[25] = 0; // first_palette_index
        palette_chunk[29..31].copy_from_slice(&1u16.to_le_bytes()); // palette_count = 1
        palette_chunk[32] = 0; // palette_type = 0 -> data starts at 38
        palette_chunk[38] = 10;
        palette_chunk[39] = 20;
        palette_chunk[40] = 30;
        buf.extend_from_slice(&palette_chunk);

        // first frame-size table (discarded by the reader)
        buf.extend_from_slice(&[0u8, 0]);
        // second frame-size table (used)
        buf.extend_from_slice(&(frame_payload.len() as u16).to_le_bytes());

        buf.extend_from_slice(&[0u8; UNKNOWN_TABLE_SIZE as usize]);

        let padding = (SECTOR_SIZE - (buf.len() as u64 % SECTOR_SIZE)) % SECTOR_SIZE;
        buf.extend(std::iter::repeat(0u8).take(padding as usize));

        buf.extend_from_slice(frame_payload);
        buf
    }

    #[test]
    fn reads_header_palette_and_frame_payload() {
        let raw = sample_rbt(&[1, 2, 3, 4]);
        let mut reader = RbtReader::open(Cursor::new(raw)).unwrap();
        assert_eq!(reader.frame_count, 1);
        assert_eq!(reader.frame_size(0), 4);

        let packet = reader.read_frame(0).unwrap();
        assert_eq!(packet.buf(), &[1, 2, 3, 4]);
    }
}
