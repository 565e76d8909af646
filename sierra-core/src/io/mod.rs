// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Little-endian byte I/O and MSB-first bit I/O primitives shared by the codec and container
//! crates.

mod bit;
mod buf_reader;

pub use bit::{BitReader, BitWriter};
pub use buf_reader::BufReader;

use std::io;

use crate::errors::{decode_error, Result};

/// `ReadBytes` reads little-endian integers and raw byte runs from a bounded, in-memory byte
/// stream, reporting the number of bytes remaining.
pub trait ReadBytes {
    /// Read a single byte.
    fn read_byte(&mut self) -> Result<u8>;

    /// Read `buf.len()` bytes into `buf`.
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// The current position, in bytes, from the start of the stream.
    fn pos(&self) -> usize;

    /// The number of bytes left unread.
    fn remaining(&self) -> usize;

    /// Skip `count` bytes.
    fn ignore_bytes(&mut self, count: usize) -> Result<()> {
        let mut buf = [0u8; 64];
        let mut left = count;
        while left > 0 {
            let n = left.min(buf.len());
            self.read_buf_exact(&mut buf[..n])?;
            left -= n;
        }
        Ok(())
    }

    /// Read a little-endian `u16`.
    fn read_u16le(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_buf_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32`.
    fn read_u32le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_buf_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a big-endian `u16`.
    fn read_u16be(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_buf_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

/// `WriteBytes` writes little-endian integers to any [`std::io::Write`] sink, translating I/O
/// failures into [`crate::errors::SierraError::IoError`].
pub trait WriteBytes: io::Write {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])?;
        Ok(())
    }

    fn write_u16le(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_u32le(&mut self, value: u32) -> Result<()> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn write_u16be(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_be_bytes())?;
        Ok(())
    }
}

impl<W: io::Write + ?Sized> WriteBytes for W {}

#[inline(always)]
pub(crate) fn underrun_error<T>() -> Result<T> {
    decode_error("buffer underrun")
}
