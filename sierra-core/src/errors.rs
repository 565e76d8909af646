// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type shared by every codec and container crate
//! in this workspace.

use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::result;

/// `SierraError` enumerates all possible errors reported while decoding, encoding, or muxing
/// Sierra VMD/RBT media.
#[derive(Debug)]
pub enum SierraError {
    /// The stream contained malformed data: a bad header, an out-of-range rectangle, a truncated
    /// stream, or an impossible opcode.
    InvalidData(&'static str),
    /// Allocation failed during initialization or dynamic table growth.
    OutOfMemory(&'static str),
    /// A seek, read, or write on the underlying stream failed.
    IoError(Box<dyn StdError + Send + Sync>),
    /// The encoder was given pixel data that isn't 24-bit BGR.
    UnsupportedPixelFormat(&'static str),
}

impl fmt::Display for SierraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SierraError::InvalidData(desc) => write!(f, "invalid data: {}", desc),
            SierraError::OutOfMemory(desc) => write!(f, "out of memory: {}", desc),
            SierraError::IoError(ref err) => write!(f, "io error: {}", err),
            SierraError::UnsupportedPixelFormat(desc) => {
                write!(f, "unsupported pixel format: {}", desc)
            }
        }
    }
}

impl StdError for SierraError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            SierraError::IoError(ref err) => Some(err.deref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SierraError {
    fn from(err: std::io::Error) -> SierraError {
        SierraError::IoError(Box::new(err))
    }
}

pub type Result<T> = result::Result<T, SierraError>;

/// Convenience function to create an invalid data error.
pub fn decode_error<T>(desc: &'static str) -> Result<T> {
    Err(SierraError::InvalidData(desc))
}

/// Convenience function to create an out-of-memory error.
pub fn memory_error<T>(desc: &'static str) -> Result<T> {
    Err(SierraError::OutOfMemory(desc))
}

/// Convenience function to create an unsupported pixel format error.
pub fn unsupported_format_error<T>(desc: &'static str) -> Result<T> {
    Err(SierraError::UnsupportedPixelFormat(desc))
}
