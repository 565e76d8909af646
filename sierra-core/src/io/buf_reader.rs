// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{underrun_error, ReadBytes};
use crate::errors::Result;

/// A `BufReader` reads bytes from a borrowed byte slice, tracking position and remaining length.
pub struct BufReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufReader<'a> {
    /// Instantiate a new `BufReader` over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        BufReader { buf, pos: 0 }
    }

    /// Returns a reference to the next `len` bytes without copying, advancing the cursor.
    pub fn read_buf_bytes_ref(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.buf.len() - self.pos < len {
            return underrun_error();
        }
        self.pos += len;
        Ok(&self.buf[self.pos - len..self.pos])
    }

    /// Returns a reference to the remaining bytes without copying, advancing the cursor to the
    /// end.
    pub fn read_buf_bytes_available_ref(&mut self) -> &'a [u8] {
        let pos = self.pos;
        self.pos = self.buf.len();
        &self.buf[pos..]
    }
}

impl ReadBytes for BufReader<'_> {
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        if self.buf.len() - self.pos < 1 {
            return underrun_error();
        }
        self.pos += 1;
        Ok(self.buf[self.pos - 1])
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        if self.buf.len() - self.pos < len {
            return underrun_error();
        }
        buf.copy_from_slice(&self.buf[self.pos..self.pos + len]);
        self.pos += len;
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_integers() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut r = BufReader::new(&data);
        assert_eq!(r.read_u16le().unwrap(), 0x1234);
        assert_eq!(r.read_u32le().unwrap(), 0x1234_5678);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn underrun_is_invalid_data() {
        let data = [0u8; 1];
        let mut r = BufReader::new(&data);
        assert!(r.read_u16le().is_err());
    }
}
