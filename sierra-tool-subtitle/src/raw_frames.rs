// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The pre-decoded raw-frame sidecar the overlay tool composites onto, in place of decoding the
//! container's own (possibly LZ-wrapped) video payloads.

use std::io::Read;

use sierra_core::errors::{decode_error, Result};
use sierra_core::io::{BufReader, ReadBytes};

/// Sequential reader over a sidecar file of `frame_count` raw `width x height` palette-index
/// frames, preceded by a 6-byte LE16 header.
pub struct RawFrameReader<R> {
    src: R,
    pub frame_count: usize,
    pub width: usize,
    pub height: usize,
    next_index: usize,
}

impl<R: Read> RawFrameReader<R> {
    pub fn open(mut src: R) -> Result<Self> {
        let mut header = [0u8; 6];
        src.read_exact(&mut header)?;
        let mut r = BufReader::new(&header);
        let frame_count = r.read_u16le()? as usize;
        let width = r.read_u16le()? as usize;
        let height = r.read_u16le()? as usize;

        Ok(RawFrameReader { src, frame_count, width, height, next_index: 0 })
    }

    /// Read the next raw frame's `width * height` palette-index bytes.
    pub fn next_frame(&mut self) -> Result<Vec<u8>> {
        if self.next_index >= self.frame_count {
            return decode_error("raw-frame sidecar exhausted before all video frames were read");
        }
        let mut buf = vec![0u8; self.width * self.height];
        self.src.read_exact(&mut buf)?;
        self.next_index += 1;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample(frames: &[[u8; 4]]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(frames.len() as u16).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        for frame in frames {
            buf.extend_from_slice(frame);
        }
        buf
    }

    #[test]
    fn reads_frames_in_order() {
        let raw = sample(&[[1, 2, 3, 4], [5, 6, 7, 8]]);
        let mut reader = RawFrameReader::open(Cursor::new(raw)).unwrap();
        assert_eq!(reader.frame_count, 2);
        assert_eq!(reader.next_frame().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(reader.next_frame().unwrap(), vec![5, 6, 7, 8]);
        assert!(reader.next_frame().is_err());
    }
}
