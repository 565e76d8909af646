// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The VMD overlay pipeline: decode from the raw-frame sidecar, composite the caption bar, then
//! re-encode with method-1 interframe compression (falling back to method-2 raw) and remux.
//!
//! The reference tool duplicates the input file's header and ToC bytes in place and patches only
//! the video frame lengths, preserving audio frames untouched. This workspace's container writer
//! (`sierra_format::VmdWriter`) models the general from-scratch muxer instead, so this pipeline
//! reconstructs a fresh VMD around the overlaid video frames rather than patching the original
//! file byte-for-byte; the original file's audio frame records are not carried through. See
//! DESIGN.md for this deviation.

use std::fs::File;
use std::io::{BufReader as IoBufReader, BufWriter};
use std::path::Path;

use sierra_core::errors::Result;
use sierra_core::packet::{Packet, VmdSideData};
use sierra_core::palette::{scale_8_to_6, Palette, PALETTE_COLORS};
use sierra_core::plane::Plane;
use sierra_format::{VmdReader, VmdWriter};

use crate::overlay::paint_caption_bar;
use crate::raw_frames::RawFrameReader;
use crate::subtitle::{is_active, Cue};

const VIDEO_FRAME_TYPE: u8 = 2;
const MS_PER_BLOCK: u64 = 100;

pub fn run(
    cues: &[Cue],
    input_path: &Path,
    raw_frames_path: &Path,
    output_path: &Path,
) -> Result<()> {
    let input = VmdReader::open(IoBufReader::new(File::open(input_path)?))?;
    let mut raw = RawFrameReader::open(IoBufReader::new(File::open(raw_frames_path)?))?;

    let mut writer =
        VmdWriter::new(BufWriter::new(File::create(output_path)?), input.width as u16, input.height as u16)?;

    let palette = input.palette.clone();
    let mut prev: Option<Plane> = None;
    let mut video_index = 0usize;

    for info in input.frames() {
        if info.frame_type != VIDEO_FRAME_TYPE {
            continue;
        }

        let raw_indices = raw.next_frame()?;
        let mut plane = Plane::new(input.width, input.height);
        plane.data_mut().copy_from_slice(&raw_indices);

        let timestamp_ms = video_index as u64 * MS_PER_BLOCK;
        if is_active(cues, timestamp_ms) {
            paint_caption_bar(&mut plane, &palette);
        }

        let packet = encode_frame(&plane, prev.as_ref(), &palette, video_index == 0)?;
        writer.write_packet(&packet)?;

        prev = Some(plane);
        video_index += 1;
    }

    log::info!("overlaid {} video frame(s) into {}", video_index, output_path.display());
    writer.finish()
}

fn encode_frame(
    plane: &Plane,
    prev: Option<&Plane>,
    palette: &Palette,
    include_palette: bool,
) -> Result<Packet> {
    let raw_payload = plane.data().to_vec();

    let method1_payload = prev.map(|p| encode_method1(plane, p));
    let (method, payload) = match method1_payload {
        Some(m1) if m1.len() < raw_payload.len() => (1u8, m1),
        _ => (2u8, raw_payload),
    };

    let mut palette6 = [0u8; PALETTE_COLORS * 3];
    for (i, entry) in palette.entries().iter().enumerate() {
        palette6[i * 3] = scale_8_to_6(entry[0]);
        palette6[i * 3 + 1] = scale_8_to_6(entry[1]);
        palette6[i * 3 + 2] = scale_8_to_6(entry[2]);
    }

    let side = VmdSideData {
        left: 0,
        top: 0,
        right: (plane.width() - 1) as u16,
        bottom: (plane.height() - 1) as u16,
        new_palette: include_palette,
        new_palette_entries: if include_palette { PALETTE_COLORS as u8 } else { 0 },
        palette6,
    };

    let mut buf = Vec::with_capacity(VmdSideData::SIZE + 1 + payload.len());
    side.write_to(&mut buf);
    buf.push(method);
    buf.extend_from_slice(&payload);

    Ok(Packet::new(0, buf.into_boxed_slice()))
}

/// Row-wise interframe/literal run coder matching the VMD method-1 payload format, without the
/// method-3 secondary RLE extension.
fn encode_method1(cur: &Plane, prev: &Plane) -> Vec<u8> {
    let width = cur.width();
    let mut out = Vec::new();

    for y in 0..cur.height() {
        let cur_row = cur.row(y).expect("row within plane bounds");
        let prev_row = prev.row(y).expect("row within plane bounds");
        let mut col = 0usize;

        while col < width {
            let matches = cur_row[col] == prev_row[col];
            let mut run = 1usize;
            while col + run < width && run < 128 && (cur_row[col + run] == prev_row[col + run]) == matches
            {
                run += 1;
            }

            if matches {
                out.push((run - 1) as u8);
            } else {
                out.push(0x80 | (run - 1) as u8);
                out.extend_from_slice(&cur_row[col..col + run]);
            }
            col += run;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method1_encode_decode_round_trips() {
        let mut prev = Plane::new(4, 2);
        prev.data_mut().copy_from_slice(&[1, 1, 1, 1, 2, 2, 2, 2]);
        let mut cur = Plane::new(4, 2);
        cur.data_mut().copy_from_slice(&[1, 1, 9, 9, 2, 2, 2, 2]);

        let payload = encode_method1(&cur, &prev);

        let mut decoded = Plane::new(4, 2);
        decode_method1_for_test(&payload, &mut decoded, &prev);
        assert_eq!(decoded.data(), cur.data());
    }

    /// Mirrors the decoder crate's method-1 row loop with the secondary RLE extension disabled,
    /// kept local since that function is private to its own crate.
    fn decode_method1_for_test(payload: &[u8], plane: &mut Plane, prev: &Plane) {
        let width = plane.width();
        let mut pos = 0usize;
        for y in 0..plane.height() {
            let mut col = 0usize;
            while col < width {
                let len = payload[pos];
                pos += 1;
                if len & 0x80 != 0 {
                    let count = (len & 0x7F) as usize + 1;
                    for i in 0..count {
                        plane.set(col + i, y, payload[pos + i]).unwrap();
                    }
                    pos += count;
                    col += count;
                } else {
                    let count = len as usize + 1;
                    for i in 0..count {
                        let b = prev.get(col + i, y).unwrap();
                        plane.set(col + i, y, b).unwrap();
                    }
                    col += count;
                }
            }
        }
    }
}
