// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The VMD container: a fixed header, a palette region patched in place as new colors arrive, a
//! table of contents, and the frame records it describes.

use std::io::{Read, Seek, SeekFrom, Write};

use sierra_core::errors::Result;
use sierra_core::io::{BufReader, ReadBytes, WriteBytes};
use sierra_core::packet::{Packet, VmdSideData};
use sierra_core::palette::Palette;

const HEADER_LEN: usize = 0x330;
const PALETTE_OFFSET: u64 = 28;
const FRAME_TABLE_GROWTH: usize = 100;
const MUXER_FLAGS: u16 = 0x4081;

/// One parsed 16-byte frame-info record, with the absolute file offset of its payload resolved
/// from the block table's base offset plus the running sum of preceding frames' lengths.
#[derive(Clone, Copy, Debug)]
pub struct VmdFrameInfo {
    pub frame_type: u8,
    pub length: u32,
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub flags: u8,
    pub offset: u64,
}

/// Reads a VMD container's header and table of contents, exposing frame records in table order
/// without loading the whole file into memory.
pub struct VmdReader<R> {
    src: R,
    pub width: usize,
    pub height: usize,
    pub palette: Palette,
    pub load_buffer_size: usize,
    pub decode_buffer_size: usize,
    frames: Vec<VmdFrameInfo>,
}

impl<R: Read + Seek> VmdReader<R> {
    pub fn open(mut src: R) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        src.read_exact(&mut header)?;

        let mut r = BufReader::new(&header);
        let _header_size = r.read_u16le()?;
        let _handle = r.read_u16le()?;
        let _unknown4 = r.read_u16le()?;
        let block_count = r.read_u16le()? as usize;
        let _frame_top = r.read_u16le()?;
        let _frame_left = r.read_u16le()?;
        let width = r.read_u16le()? as usize;
        let height = r.read_u16le()? as usize;
        let _flags = r.read_u16le()?;
        let frames_per_block = r.read_u16le()? as usize;
        let _data_offset = r.read_u32le()?;
        r.ignore_bytes(4)?; // offsets 24-27: opaque constants written by the muxer
        let mut palette6 = [0u8; 768];
        r.read_buf_exact(&mut palette6)?;
        let palette = Palette::from_6bit_rgb(&palette6)?;
        let load_buffer_size = r.read_u32le()? as usize;
        let decode_buffer_size = r.read_u32le()? as usize;
        r.ignore_bytes(2 + 2 + 2 + 2)?;
        let toc_offset = r.read_u32le()? as u64;

        src.seek(SeekFrom::Start(toc_offset))?;
        let mut block_table = vec![0u8; block_count * 6];
        src.read_exact(&mut block_table)?;
        let mut block_offsets = Vec::with_capacity(block_count);
        {
            let mut br = BufReader::new(&block_table);
            for _ in 0..block_count {
                let _unknown = br.read_u16le()?;
                block_offsets.push(br.read_u32le()? as u64);
            }
        }

        let frame_record_count = block_count * frames_per_block;
        let mut frame_table = vec![0u8; frame_record_count * 16];
        src.read_exact(&mut frame_table)?;

        let mut frames = Vec::with_capacity(frame_record_count);
        let mut fr = BufReader::new(&frame_table);
        for &base_offset in &block_offsets {
            let mut running_offset = base_offset;
            for _ in 0..frames_per_block {
                let frame_type = fr.read_byte()?;
                let _unknown1 = fr.read_byte()?;
                let length = fr.read_u32le()?;
                let left = fr.read_u16le()?;
                let top = fr.read_u16le()?;
                let right = fr.read_u16le()?;
                let bottom = fr.read_u16le()?;
                let _unknown14 = fr.read_byte()?;
                let flags = fr.read_byte()?;
                frames.push(VmdFrameInfo {
                    frame_type,
                    length,
                    left,
                    top,
                    right,
                    bottom,
                    flags,
                    offset: running_offset,
                });
                running_offset += length as u64;
            }
        }

        Ok(VmdReader { src, width, height, palette, load_buffer_size, decode_buffer_size, frames })
    }

    /// All frame records, in table order.
    pub fn frames(&self) -> &[VmdFrameInfo] {
        &self.frames
    }

    /// Read one frame's payload, reassembling the 16-byte record prefix the video codec expects
    /// ahead of the compressed bytes.
    pub fn read_frame_payload(&mut self, info: &VmdFrameInfo) -> Result<Packet> {
        self.src.seek(SeekFrom::Start(info.offset))?;

        let mut buf = vec![0u8; 16 + info.length as usize];
        buf[0] = info.frame_type;
        buf[1] = 0;
        buf[2..6].copy_from_slice(&info.length.to_le_bytes());
        buf[6..8].copy_from_slice(&info.left.to_le_bytes());
        buf[8..10].copy_from_slice(&info.top.to_le_bytes());
        buf[10..12].copy_from_slice(&info.right.to_le_bytes());
        buf[12..14].copy_from_slice(&info.bottom.to_le_bytes());
        buf[14] = 0;
        buf[15] = info.flags;
        self.src.read_exact(&mut buf[16..])?;

        Ok(Packet::new(0, buf.into_boxed_slice()))
    }
}

struct FrameTableEntry {
    offset: u64,
    size: u32,
    width: u16,
    height: u16,
}

/// Writes a VMD container: header first (with placeholder palette and ToC offset), then frame
/// payloads as they arrive, then a trailing table of contents with the header patched in place.
pub struct VmdWriter<W> {
    dst: W,
    width: u16,
    height: u16,
    entries_written: usize,
    frames: Vec<FrameTableEntry>,
}

impl<W: Write + Seek> VmdWriter<W> {
    pub fn new(mut dst: W, width: u16, height: u16) -> Result<Self> {
        let mut header = [0u8; HEADER_LEN];
        header[0..2].copy_from_slice(&((HEADER_LEN as u16) - 2).to_le_bytes());
        header[12..14].copy_from_slice(&width.to_le_bytes());
        header[14..16].copy_from_slice(&height.to_le_bytes());
        header[16..18].copy_from_slice(&MUXER_FLAGS.to_le_bytes());
        header[18..20].copy_from_slice(&1u16.to_le_bytes()); // frames per block
        header[26] = 0xf7;
        header[27] = 0x23;
        dst.write_all(&header)?;

        Ok(VmdWriter {
            dst,
            width,
            height,
            entries_written: 0,
            frames: Vec::with_capacity(FRAME_TABLE_GROWTH),
        })
    }

    /// Write one encoded video packet (side-data prefix + payload), patching in any newly
    /// appended palette entries ahead of it.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        let (side, payload) = VmdSideData::read_from(packet.buf())?;

        if side.new_palette {
            if (side.new_palette_entries as usize) < self.entries_written {
                // The palette was reset and rebuilt from scratch; restart the write cursor.
                self.entries_written = 0;
            }
            let n = side.new_palette_entries as usize * 3;
            if n > 0 {
                let start = PALETTE_OFFSET + (self.entries_written * 3) as u64;
                let resume_at = self.dst.stream_position()?;
                self.dst.seek(SeekFrom::Start(start))?;
                self.dst.write_all(&side.palette6[self.entries_written * 3..self.entries_written * 3 + n])?;
                self.dst.seek(SeekFrom::Start(resume_at))?;
                self.entries_written += side.new_palette_entries as usize;
            }
        }

        if self.frames.len() == self.frames.capacity() {
            self.frames.reserve(FRAME_TABLE_GROWTH);
        }

        let offset = self.dst.stream_position()?;
        self.dst.write_all(payload)?;
        self.frames.push(FrameTableEntry {
            offset,
            size: payload.len() as u32,
            width: self.width,
            height: self.height,
        });

        Ok(())
    }

    /// Write the block table, frame table, and patch the header's frame count and ToC offset.
    pub fn finish(mut self) -> Result<()> {
        let toc_offset = self.dst.stream_position()?;

        for f in &self.frames {
            self.dst.write_u16le(0)?;
            self.dst.write_u32le(f.offset as u32)?;
        }

        for f in &self.frames {
            self.dst.write_u8(2)?;
            self.dst.write_u8(0)?;
            self.dst.write_u32le(f.size)?;
            self.dst.write_u16le(0)?;
            self.dst.write_u16le(0)?;
            self.dst.write_u16le(f.width - 1)?;
            self.dst.write_u16le(f.height - 1)?;
            self.dst.write_u8(0)?;
            self.dst.write_u8(0)?;

            self.dst.write_u8(1)?;
            self.dst.write_all(&[0u8; 15])?;
        }

        self.dst.seek(SeekFrom::Start(6))?;
        self.dst.write_u16le(self.frames.len() as u16)?;

        self.dst.seek(SeekFrom::Start(812))?;
        self.dst.write_u32le(toc_offset as u32)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn write_then_read_round_trips_dimensions_and_frames() {
        let mut storage = Cursor::new(Vec::new());
        {
            let mut writer = VmdWriter::new(&mut storage, 4, 2).unwrap();
            let mut side = VmdSideData {
                left: 0,
                top: 0,
                right: 3,
                bottom: 1,
                new_palette: true,
                new_palette_entries: 1,
                palette6: [0u8; 768],
            };
            side.palette6[0..3].copy_from_slice(&[10, 20, 30]);
            let mut buf = Vec::new();
            side.write_to(&mut buf);
            buf.push(2); // method 2
            buf.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
            writer.write_packet(&Packet::new(0, buf.into_boxed_slice())).unwrap();

            side.new_palette = false;
            side.new_palette_entries = 0;
            let mut buf2 = Vec::new();
            side.write_to(&mut buf2);
            buf2.push(2);
            buf2.extend_from_slice(&[7, 6, 5, 4, 3, 2, 1, 0]);
            writer.write_packet(&Packet::new(0, buf2.into_boxed_slice())).unwrap();

            writer.finish().unwrap();
        }

        storage.set_position(0);
        let mut reader = VmdReader::open(storage).unwrap();
        assert_eq!(reader.width, 4);
        assert_eq!(reader.height, 2);
        assert_eq!(reader.palette.entries()[0], [10 << 2 | 10 >> 4, 20 << 2 | 20 >> 4, 30 << 2 | 30 >> 4, 0xFF]);
        assert_eq!(reader.frames().len(), 2);

        let infos: Vec<VmdFrameInfo> = reader.frames().to_vec();
        let packet = reader.read_frame_payload(&infos[0]).unwrap();
        assert_eq!(packet.buf()[0], 2); // video frame type
    }
}
