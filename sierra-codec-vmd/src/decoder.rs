// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The VMD video decoder: frame-record parsing, the three row-coding methods, and the outer
//! LZ-unwrap dispatch.

use sierra_core::errors::{decode_error, Result};
use sierra_core::io::{BufReader, ReadBytes};
use sierra_core::packet::Packet;
use sierra_core::palette::Palette;
use sierra_core::plane::{Plane, Rect};

use crate::rle::rle_unpack;

const FRAME_RECORD_LEN: usize = 16;
const VIDEO_FRAME_TYPE: u8 = 2;
const FLAG_NEW_PALETTE: u8 = 0x02;

/// Decodes a sequence of VMD video packets into palette-indexed frames.
///
/// Holds the previous decoded frame and the currently active palette across calls, exactly the
/// cross-frame state the reference decoder keeps in its private context.
pub struct VmdDecoder {
    frame_width: usize,
    frame_height: usize,
    decode_buf_len: usize,
    prev: Option<Plane>,
    palette: Palette,
    x_off: usize,
    y_off: usize,
}

impl VmdDecoder {
    /// Create a decoder for a stream of `frame_width x frame_height` frames. `decode_buf_len`
    /// bounds the scratch buffer used to unwrap LZ-compressed payloads, taken from the container
    /// header's declared decode buffer size.
    pub fn new(frame_width: usize, frame_height: usize, decode_buf_len: usize) -> Self {
        VmdDecoder {
            frame_width,
            frame_height,
            decode_buf_len,
            prev: None,
            palette: Palette::black(),
            x_off: 0,
            y_off: 0,
        }
    }

    fn decode_rect(&mut self, buf: &[u8], flags: u8, rect: Rect) -> Result<Plane> {
        let mut plane = Plane::new(self.frame_width, self.frame_height);
        if !rect.is_full_frame(self.frame_width, self.frame_height) {
            match &self.prev {
                Some(prev) => plane.copy_from(prev)?,
                None => return decode_error("sub-rectangle frame arrived before any keyframe"),
            }
        }

        let mut pos = FRAME_RECORD_LEN;
        if flags & FLAG_NEW_PALETTE != 0 {
            if buf.len() < pos + 2 + 768 {
                return decode_error("truncated VMD palette delta payload");
            }
            pos += 2;
            self.palette = Palette::from_6bit_rgb(&buf[pos..pos + 768])?;
            pos += 768;
        }

        if pos >= buf.len() {
            return decode_error("VMD frame payload missing method byte");
        }
        let method_byte = buf[pos];
        pos += 1;
        let lz_wrapped = method_byte & 0x80 != 0;
        let method = method_byte & 0x7F;

        let owned;
        let payload: &[u8] = if lz_wrapped {
            owned = crate::unwrap_lz(&buf[pos..], self.decode_buf_len)?;
            &owned
        } else {
            &buf[pos..]
        };

        match method {
            2 => decode_method2(payload, &mut plane, rect)?,
            1 => decode_method1(payload, &mut plane, self.prev.as_ref(), rect, false)?,
            3 => decode_method1(payload, &mut plane, self.prev.as_ref(), rect, true)?,
            _ => return decode_error("unrecognized VMD frame method"),
        }

        Ok(plane)
    }
}

impl sierra_core::codec::VideoDecoder for VmdDecoder {
    fn decode(&mut self, packet: &Packet) -> Result<sierra_core::codec::VideoFrame> {
        let buf = packet.buf();
        if buf.len() < FRAME_RECORD_LEN {
            return decode_error("VMD frame record shorter than 16 bytes");
        }

        let mut r = BufReader::new(&buf[..FRAME_RECORD_LEN]);
        let frame_type = r.read_byte()?;
        let _unknown0 = r.read_byte()?;
        let _length = r.read_u32le()?;
        let left = r.read_u16le()? as usize;
        let top = r.read_u16le()? as usize;
        let right = r.read_u16le()? as usize;
        let bottom = r.read_u16le()? as usize;
        let _unknown14 = r.read_byte()?;
        let flags = r.read_byte()?;

        if frame_type != VIDEO_FRAME_TYPE {
            return decode_error("VmdDecoder given a non-video frame record");
        }

        if left > right || top > bottom {
            return decode_error("VMD frame rectangle has left/top past right/bottom");
        }

        // If this frame covers the full frame but its origin is nonzero, the stream is using a
        // shifted coordinate space for every subsequent frame; adopt it once and keep applying it.
        let is_full_frame =
            right + 1 - left == self.frame_width && bottom + 1 - top == self.frame_height;
        if is_full_frame && (left != 0 || top != 0) {
            self.x_off = left;
            self.y_off = top;
        }

        if left < self.x_off || top < self.y_off {
            return decode_error("VMD frame rectangle precedes the adopted frame offset");
        }
        let rect = Rect {
            left: left - self.x_off,
            top: top - self.y_off,
            right: right - self.x_off,
            bottom: bottom - self.y_off,
        };
        rect.validate(self.frame_width, self.frame_height)?;

        let plane = self.decode_rect(buf, flags, rect)?;
        self.prev = Some(plane.clone());

        Ok(sierra_core::codec::VideoFrame { plane, palette: self.palette.clone() })
    }

    fn reset(&mut self) {
        self.prev = None;
        self.palette = Palette::black();
        self.x_off = 0;
        self.y_off = 0;
    }
}

fn decode_method2(payload: &[u8], plane: &mut Plane, rect: Rect) -> Result<()> {
    let rect_width = rect.width();
    let mut pos = 0usize;
    for y in rect.top..=rect.bottom {
        if pos + rect_width > payload.len() {
            return decode_error("method 2: payload truncated");
        }
        let row = plane.row_mut(y)?;
        row[rect.left..=rect.right].copy_from_slice(&payload[pos..pos + rect_width]);
        pos += rect_width;
    }
    Ok(())
}

/// Shared implementation for methods 1 and 3; `secondary_rle` enables the method-3 extension that
/// nests a pair-encoded RLE run inside a literal branch marked with a trailing `0xFF`.
fn decode_method1(
    payload: &[u8],
    plane: &mut Plane,
    prev: Option<&Plane>,
    rect: Rect,
    secondary_rle: bool,
) -> Result<()> {
    let rect_width = rect.width();
    let mut pos = 0usize;

    for y in rect.top..=rect.bottom {
        let mut col = 0usize;
        while col < rect_width {
            if pos >= payload.len() {
                return decode_error("method 1/3: payload truncated before row complete");
            }
            let len = payload[pos];
            pos += 1;

            if len & 0x80 != 0 {
                let count = (len & 0x7F) as usize + 1;

                if secondary_rle && pos < payload.len() && payload[pos] == 0xFF {
                    pos += 1;
                    let dest_cap = rect_width - col;
                    let (bytes, consumed) = rle_unpack(&payload[pos..], count, dest_cap);
                    for (i, &b) in bytes.iter().enumerate() {
                        plane.set(rect.left + col + i, y, b)?;
                    }
                    pos += consumed;
                    col += bytes.len();
                } else {
                    if col + count > rect_width {
                        return decode_error("method 1/3: literal run exceeds row width");
                    }
                    if pos + count > payload.len() {
                        return decode_error("method 1/3: literal run truncated");
                    }
                    for i in 0..count {
                        plane.set(rect.left + col + i, y, payload[pos + i])?;
                    }
                    pos += count;
                    col += count;
                }
            } else {
                let count = len as usize + 1;
                if col + count > rect_width {
                    return decode_error("method 1/3: interframe copy exceeds row width");
                }
                let prev_plane = match prev {
                    Some(p) => p,
                    None => return decode_error("method 1/3: interframe copy with no previous frame"),
                };
                for i in 0..count {
                    let b = prev_plane.get(rect.left + col + i, y)?;
                    plane.set(rect.left + col + i, y, b)?;
                }
                col += count;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sierra_core::codec::VideoDecoder;

    fn frame_record(left: u16, top: u16, right: u16, bottom: u16, flags: u8) -> Vec<u8> {
        let mut rec = vec![2u8, 0, 0, 0, 0, 0];
        rec.extend_from_slice(&left.to_le_bytes());
        rec.extend_from_slice(&top.to_le_bytes());
        rec.extend_from_slice(&right.to_le_bytes());
        rec.extend_from_slice(&bottom.to_le_bytes());
        rec.push(0);
        rec.push(flags);
        rec
    }

    #[test]
    fn decodes_method_2_raw_frame() {
        let mut decoder = VmdDecoder::new(4, 2, 1024);
        let mut buf = frame_record(0, 0, 3, 1, 0);
        buf.push(2); // method 2, no LZ wrap
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let packet = Packet::new(0, buf.into_boxed_slice());
        let frame = decoder.decode(&packet).unwrap();
        assert_eq!(frame.plane.get(0, 0).unwrap(), 1);
        assert_eq!(frame.plane.get(3, 1).unwrap(), 8);
    }

    #[test]
    fn method_1_copies_unchanged_pixels_from_previous_frame() {
        let mut decoder = VmdDecoder::new(4, 1, 1024);

        let mut first = frame_record(0, 0, 3, 0, 0);
        first.push(2);
        first.extend_from_slice(&[9, 9, 9, 9]);
        decoder.decode(&Packet::new(0, first.into_boxed_slice())).unwrap();

        // Method 1: one interframe-copy run of all 4 pixels (len = 3 -> count = 4).
        let mut second = frame_record(0, 0, 3, 0, 0);
        second.push(1);
        second.push(3);
        let frame = decoder.decode(&Packet::new(0, second.into_boxed_slice())).unwrap();
        assert_eq!(frame.plane.data(), &[9, 9, 9, 9]);
    }

    #[test]
    fn method_3_secondary_rle_expands_literal_run() {
        let mut decoder = VmdDecoder::new(4, 1, 1024);

        let mut buf = frame_record(0, 0, 3, 0, 0);
        buf.push(3); // method 3, no LZ wrap
                     // Literal branch: len = 0x83 -> count = 4 (src_count for the inner RLE), then 0xFF marker.
        buf.push(0x83);
        buf.push(0xFF);
        // Inner RLE: src_count = 4 (even), one run pair byte 0x02 writing [7, 7] twice = 4 bytes.
        buf.push(0x02);
        buf.push(7);
        buf.push(7);

        let frame = decoder.decode(&Packet::new(0, buf.into_boxed_slice())).unwrap();
        assert_eq!(frame.plane.data(), &[7, 7, 7, 7]);
    }

    #[test]
    fn adopts_nonzero_origin_on_full_frame_and_applies_it_to_later_frames() {
        let mut decoder = VmdDecoder::new(2, 2, 1024);

        // Full-frame rect at a nonzero origin: adopt (5, 5) as the persistent frame offset.
        let mut first = frame_record(5, 5, 6, 6, 0);
        first.push(2);
        first.extend_from_slice(&[1, 2, 3, 4]);
        let frame = decoder.decode(&Packet::new(0, first.into_boxed_slice())).unwrap();
        assert_eq!(frame.plane.data(), &[1, 2, 3, 4]);

        // A later sub-rectangle is expressed in the same shifted coordinate space; after
        // subtracting the adopted offset it lands at local (1, 0).
        let mut second = frame_record(6, 5, 6, 5, 0);
        second.push(2);
        second.push(9);
        let frame = decoder.decode(&Packet::new(0, second.into_boxed_slice())).unwrap();
        assert_eq!(frame.plane.data(), &[1, 9, 3, 4]);
    }

    #[test]
    fn rejects_sub_rectangle_before_first_frame() {
        let mut decoder = VmdDecoder::new(4, 4, 1024);
        let mut buf = frame_record(1, 1, 2, 2, 0);
        buf.push(2);
        buf.extend_from_slice(&[1, 2, 3, 4]);
        assert!(decoder.decode(&Packet::new(0, buf.into_boxed_slice())).is_err());
    }
}
