// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The RBT overlay pipeline: same decode-from-sidecar, composite, re-encode shape as the VMD
//! tool, grounded symmetrically since no RBT-specific reference overlay source composites
//! subtitles (the reference `subtitle-rbt` tool decodes each frame only to print debug output
//! and writes the original bytes back unmodified).
//!
//! `sierra_format` only exposes an RBT *reader* (§4.6c is explicitly a read-side supplement), so
//! this module assembles the output container directly, mirroring the reader's chunk layout
//! rather than a `RbtWriter` type.

use std::fs::File;
use std::io::{BufReader as IoBufReader, BufWriter, Write};
use std::path::Path;

use sierra_codec_rbt::RbtEncoder;
use sierra_core::errors::Result;
use sierra_core::palette::{scale_8_to_6, Palette, PALETTE_COLORS};
use sierra_core::plane::Plane;
use sierra_format::RbtReader;

use crate::overlay::paint_caption_bar;
use crate::raw_frames::RawFrameReader;
use crate::subtitle::{is_active, Cue};

const HEADER_LEN: usize = 60;
const UNKNOWN_TABLE_SIZE: usize = 1024 + 512;
const SECTOR_SIZE: usize = 0x800;
const PALETTE_CHUNK_LEN: usize = 38 + PALETTE_COLORS * 3;
const MS_PER_FRAME: u64 = 100;

pub fn run(
    cues: &[Cue],
    input_path: &Path,
    raw_frames_path: &Path,
    output_path: &Path,
) -> Result<()> {
    let input = RbtReader::open(IoBufReader::new(File::open(input_path)?))?;
    let mut raw = RawFrameReader::open(IoBufReader::new(File::open(raw_frames_path)?))?;
    let palette = input.palette.clone();

    let encoder = RbtEncoder::new(raw.width, raw.height);
    let mut payloads = Vec::with_capacity(raw.frame_count);

    for index in 0..raw.frame_count.min(input.frame_count) {
        let indices = raw.next_frame()?;
        let mut plane = Plane::new(raw.width, raw.height);
        plane.data_mut().copy_from_slice(&indices);

        let timestamp_ms = index as u64 * MS_PER_FRAME;
        if is_active(cues, timestamp_ms) {
            paint_caption_bar(&mut plane, &palette);
        }

        let packet = encoder.encode_indices(plane.data())?;
        payloads.push(packet.buf().to_vec());
    }

    write_container(output_path, &palette, &payloads)?;
    log::info!("overlaid {} video frame(s) into {}", payloads.len(), output_path.display());
    Ok(())
}

fn write_container(output_path: &Path, palette: &Palette, payloads: &[Vec<u8>]) -> Result<()> {
    let mut dst = BufWriter::new(File::create(output_path)?);

    let frame_count = payloads.len();
    let mut header = [0u8; HEADER_LEN];
    header[14..16].copy_from_slice(&(frame_count as u16).to_le_bytes());
    header[16..18].copy_from_slice(&(PALETTE_CHUNK_LEN as u16).to_le_bytes());
    header[18..20].copy_from_slice(&0u16.to_le_bytes()); // no unknown chunk
    dst.write_all(&header)?;

    dst.write_all(&palette_chunk(palette))?;

    // Both frame-size tables carry the same value: this pipeline drops the original audio
    // payload entirely, so there is no separate video-only size to report.
    for _ in 0..2 {
        for payload in payloads {
            dst.write_all(&(payload.len() as u16).to_le_bytes())?;
        }
    }

    dst.write_all(&[0u8; UNKNOWN_TABLE_SIZE])?;

    let written_before_padding = HEADER_LEN + PALETTE_CHUNK_LEN + frame_count * 4 + UNKNOWN_TABLE_SIZE;
    let padding = (SECTOR_SIZE - (written_before_padding % SECTOR_SIZE)) % SECTOR_SIZE;
    dst.write_all(&vec![0u8; padding])?;

    for payload in payloads {
        dst.write_all(payload)?;
    }

    Ok(())
}

fn palette_chunk(palette: &Palette) -> [u8; PALETTE_CHUNK_LEN] {
    let mut chunk = [0u8; PALETTE_CHUNK_LEN];
    chunk[25] = 0; // first_palette_index
    chunk[29..31].copy_from_slice(&(PALETTE_COLORS as u16).to_le_bytes());
    chunk[32] = 0; // palette_type 0 -> data starts at byte 38

    let mut pos = 38;
    for entry in palette.entries() {
        chunk[pos] = scale_8_to_6(entry[0]);
        chunk[pos + 1] = scale_8_to_6(entry[1]);
        chunk[pos + 2] = scale_8_to_6(entry[2]);
        pos += 3;
    }

    chunk
}
