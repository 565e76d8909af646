// Sierra
// Copyright (c) 2019-2026 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Sierra VMD video codec: the two-layer decoder (outer LZ unwrap plus three row-coding methods)
//! and the raw-frame encoder.

mod decoder;
mod encoder;
mod rle;

pub use decoder::VmdDecoder;
pub use encoder::VmdEncoder;

use sierra_core::errors::Result;

/// Unwrap an LZ-compressed frame payload through [`sierra_lz::lz_unpack`].
pub(crate) fn unwrap_lz(input: &[u8], dest_len: usize) -> Result<Vec<u8>> {
    sierra_lz::lz_unpack(input, dest_len)
}
